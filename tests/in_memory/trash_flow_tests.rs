//! In-memory integration tests for the trash and its retention window.

use caliper::job::{
    domain::{JobFilter, Stage},
    ports::{Collection, JobStore},
    services::JobServiceError,
};
use chrono::TimeDelta;
use eyre::{OptionExt, ensure};
use mockable::Clock;
use rstest::rstest;

use super::helpers::{request_pair, request_single, tracker};
use crate::test_helpers::{Tracker, staff};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_deletion_expires_on_its_own_clock(tracker: Tracker) -> eyre::Result<()> {
    let job = request_single(&tracker, "GR-1180", 2).await?;
    let trash = tracker.trash();

    trash.soft_delete_jobs(&[job.id()], staff("홍길동")?).await?;
    trash.restore_job(job.id()).await?;
    tracker.clock.advance(TimeDelta::days(11));
    trash.soft_delete_jobs(&[job.id()], staff("김철수")?).await?;

    let listed = trash.list_trash().await?;
    let [entry] = listed.as_slice() else {
        eyre::bail!("expected one trash entry, got {}", listed.len());
    };
    let deletion = entry.deletion().ok_or_eyre("trash entry carries a deletion mark")?;
    ensure!(deletion.deleted_by.as_str() == "김철수");
    ensure!(deletion.deleted_at == tracker.clock.utc());

    tracker.clock.advance(TimeDelta::days(10));
    ensure!(trash.list_trash().await?.len() == 1);

    tracker.clock.advance(TimeDelta::hours(1));
    ensure!(trash.list_trash().await?.is_empty());
    ensure!(tracker.store.get(Collection::Trash, job.id()).await?.is_none());
    ensure!(matches!(
        trash.restore_job(job.id()).await,
        Err(JobServiceError::NotInTrash(_))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restored_pair_rejoins_its_group(tracker: Tracker) -> eyre::Result<()> {
    let (left, right) = request_pair(&tracker, "HB-2210", 1).await?;
    tracker
        .lifecycle()
        .advance_stage(&[left.id(), right.id()], Stage::Disassembly, staff("김철수")?)
        .await?;
    let trash = tracker.trash();

    trash
        .soft_delete_jobs(&[left.id(), right.id()], staff("홍길동")?)
        .await?;
    ensure!(tracker.lifecycle().list_jobs().await?.is_empty());
    ensure!(trash.list_trash().await?.len() == 2);

    trash.restore_job(left.id()).await?;
    trash.restore_job(right.id()).await?;

    let groups = tracker.lifecycle().list_groups(JobFilter::Active).await?;
    let [group] = groups.as_slice() else {
        eyre::bail!("expected the pair to regroup, got {}", groups.len());
    };
    ensure!(group.key() == left.group_key());
    ensure!(group.current_stage() == Stage::Disassembly);
    ensure!(trash.list_trash().await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clearing_the_trash_leaves_active_jobs(tracker: Tracker) -> eyre::Result<()> {
    let kept = request_single(&tracker, "GR-1180", 1).await?;
    let dropped = request_single(&tracker, "HB-2210", 1).await?;
    let trash = tracker.trash();
    trash.soft_delete_jobs(&[dropped.id()], staff("홍길동")?).await?;

    trash.clear_trash().await?;

    ensure!(trash.list_trash().await?.is_empty());
    let active = tracker.lifecycle().list_jobs().await?;
    ensure!(active.iter().map(|job| job.id()).collect::<Vec<_>>() == vec![kept.id()]);
    Ok(())
}
