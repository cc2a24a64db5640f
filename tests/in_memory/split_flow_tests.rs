//! In-memory integration tests for partial-quantity hand-off.

use std::collections::HashMap;

use caliper::job::{
    domain::{JobDomainError, JobFilter, Stage},
    services::JobServiceError,
};
use eyre::{OptionExt, ensure};
use rstest::rstest;

use super::helpers::{request_pair, request_single, tracker};
use crate::test_helpers::{Tracker, staff};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_four_of_ten_leaves_six_behind(tracker: Tracker) -> eyre::Result<()> {
    let job = request_single(&tracker, "GR-1180", 10).await?;
    tracker
        .lifecycle()
        .advance_stage(&[job.id()], Stage::Waiting, staff("김철수")?)
        .await?;

    let outcome = tracker
        .splitter()
        .split_one(job.id(), 4, Stage::AssemblyWait, staff("이영희")?)
        .await?;

    let piece = outcome.piece.as_ref().ok_or_eyre("partial move creates a piece")?;
    ensure!(outcome.original.quantity() == 6);
    ensure!(outcome.original.current_stage() == Stage::Waiting);
    ensure!(piece.quantity() == 4);
    ensure!(piece.current_stage() == Stage::AssemblyWait);
    ensure!(outcome.total_quantity() == 10);
    ensure!(piece.model() == job.model() && piece.code() == job.code());

    let listed = tracker.lifecycle().list_jobs().await?;
    ensure!(listed.len() == 2);
    ensure!(listed.iter().map(|item| item.quantity()).sum::<u32>() == 10);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pair_split_keeps_pieces_paired(tracker: Tracker) -> eyre::Result<()> {
    let (left, right) = request_pair(&tracker, "HB-2210", 5).await?;
    let quantities = HashMap::from([(left.id(), 2), (right.id(), 3)]);

    let outcomes = tracker
        .splitter()
        .split_job(&[left.id(), right.id()], &quantities, Stage::Disassembly, staff("김철수")?)
        .await?;

    ensure!(outcomes.len() == 2);
    let moved = tracker
        .lifecycle()
        .list_groups(JobFilter::AtStage(Stage::Disassembly))
        .await?;
    let [group] = moved.as_slice() else {
        eyre::bail!("expected one moved group, got {}", moved.len());
    };
    ensure!(group.items().len() == 2);
    ensure!(group.total_quantity() == 5);

    let waiting = tracker.lifecycle().list_groups(JobFilter::New).await?;
    let [remaining] = waiting.as_slice() else {
        eyre::bail!("expected the original pair to stay together");
    };
    ensure!(remaining.key() == left.group_key());
    ensure!(remaining.total_quantity() == 5);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn oversized_move_changes_nothing(tracker: Tracker) -> eyre::Result<()> {
    let job = request_single(&tracker, "GR-1180", 3).await?;

    let result = tracker
        .splitter()
        .split_one(job.id(), 4, Stage::Disassembly, staff("김철수")?)
        .await;

    ensure!(matches!(
        result,
        Err(JobServiceError::Domain(JobDomainError::InvalidQuantity {
            requested: 4,
            available: 3,
            ..
        }))
    ));
    let listed = tracker.lifecycle().list_jobs().await?;
    ensure!(listed == vec![job]);
    Ok(())
}
