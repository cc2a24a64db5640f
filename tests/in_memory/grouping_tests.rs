//! In-memory integration tests for paired requests and group aggregation.

use caliper::job::{
    domain::{GroupKey, JobFilter, Stage},
    services::JobServiceError,
};
use eyre::{OptionExt, ensure};
use rstest::rstest;

use super::helpers::{request_pair, request_single, tracker};
use crate::test_helpers::{Tracker, staff};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn less_advanced_half_determines_group_stage(tracker: Tracker) -> eyre::Result<()> {
    let (left, right) = request_pair(&tracker, "HB-2210", 2).await?;
    let service = tracker.lifecycle();
    service
        .advance_stage(&[left.id(), right.id()], Stage::Waiting, staff("김철수")?)
        .await?;
    service
        .advance_to_next(&[right.id()], staff("이영희")?)
        .await?;

    let groups = service.list_groups(JobFilter::Active).await?;

    let [group] = groups.as_slice() else {
        eyre::bail!("expected one group, got {}", groups.len());
    };
    ensure!(group.base() == "Door handle");
    ensure!(group.items().len() == 2);
    ensure!(group.current_stage() == Stage::Waiting);
    ensure!(group.total_quantity() == 4);
    ensure!(!group.is_complete());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn advancing_a_group_catches_up_the_lagging_half(tracker: Tracker) -> eyre::Result<()> {
    let (left, right) = request_pair(&tracker, "TL-0410", 1).await?;
    let group_id = left.group_id().ok_or_eyre("paired request is grouped")?;
    let service = tracker.lifecycle();
    service
        .advance_stage(&[right.id()], Stage::PlatingRelease, staff("김철수")?)
        .await?;

    let moved = service
        .advance_group(GroupKey::Group(group_id), Stage::PlatingRelease, staff("홍길동")?)
        .await?;

    ensure!(moved.iter().map(|job| job.id()).collect::<Vec<_>>() == vec![left.id()]);
    let groups = service.list_groups(JobFilter::AtStage(Stage::PlatingRelease)).await?;
    let group = groups.first().ok_or_eyre("group at plating release")?;
    ensure!(group.current_stage() == Stage::PlatingRelease);
    ensure!(group.items().len() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_group_moves_to_finished_list(tracker: Tracker) -> eyre::Result<()> {
    let (left, right) = request_pair(&tracker, "HB-2210", 1).await?;
    let single = request_single(&tracker, "GR-1180", 3).await?;
    let service = tracker.lifecycle();

    service
        .advance_stage(&[left.id(), right.id()], Stage::Complete, staff("이영희")?)
        .await?;

    let finished = service.list_groups(JobFilter::Finished).await?;
    let active = service.list_groups(JobFilter::Active).await?;
    let [done] = finished.as_slice() else {
        eyre::bail!("expected one finished group, got {}", finished.len());
    };
    ensure!(done.is_complete());
    ensure!(done.items().len() == 2);
    ensure!(active.len() == 1);
    ensure!(active.iter().all(|group| group.key() == GroupKey::Job(single.id())));

    let summary = service.dashboard_summary().await?;
    ensure!(summary.completed == 1);
    ensure!(summary.active == 1);
    ensure!(summary.at_stage(Stage::NewAdded) == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn complete_job_cannot_move_again(tracker: Tracker) -> eyre::Result<()> {
    let job = request_single(&tracker, "GR-1180", 1).await?;
    let service = tracker.lifecycle();
    service
        .advance_stage(&[job.id()], Stage::Complete, staff("이영희")?)
        .await?;

    let result = service.advance_to_next(&[job.id()], staff("이영희")?).await;

    ensure!(matches!(result, Err(JobServiceError::Domain(_))));
    let stored = service.find_job(job.id()).await?.ok_or_eyre("job stays")?;
    ensure!(stored.current_stage() == Stage::Complete);
    Ok(())
}
