//! Then steps for trash retention BDD scenarios.

use super::world::{TrashWorld, run_async};
use caliper::job::{domain::Stage, services::JobServiceError};
use rstest_bdd_macros::then;

#[then(r#"the job is active at stage "{stage}""#)]
fn job_is_active_at(world: &TrashWorld, stage: String) -> Result<(), eyre::Report> {
    let expected = Stage::try_from(stage.as_str())
        .map_err(|err| eyre::eyre!("invalid expected stage in scenario: {err}"))?;
    let job_id = world.job()?.id();

    let found = run_async(world.tracker.lifecycle().find_job(job_id))?
        .ok_or_else(|| eyre::eyre!("job {job_id} is not active"))?;

    if found.current_stage() != expected {
        return Err(eyre::eyre!(
            "expected stage {}, found {}",
            expected.as_str(),
            found.current_stage().as_str()
        ));
    }
    Ok(())
}

#[then("the trash is empty")]
fn trash_is_empty(world: &TrashWorld) -> Result<(), eyre::Report> {
    let listed = run_async(world.tracker.trash().list_trash())?;
    eyre::ensure!(listed.is_empty(), "expected empty trash, found {}", listed.len());
    Ok(())
}

#[then(r#"the trash lists the job deleted by "{name}""#)]
fn trash_lists_job(world: &TrashWorld, name: String) -> Result<(), eyre::Report> {
    let job_id = world.job()?.id();
    let listed = run_async(world.tracker.trash().list_trash())?;

    let [entry] = listed.as_slice() else {
        return Err(eyre::eyre!("expected one trash entry, found {}", listed.len()));
    };
    let deletion = entry
        .deletion()
        .ok_or_else(|| eyre::eyre!("trash entry has no deletion mark"))?;
    eyre::ensure!(entry.id() == job_id, "unexpected job in trash");
    eyre::ensure!(
        deletion.deleted_by.as_str() == name,
        "expected deletion by {name}, found {}",
        deletion.deleted_by
    );
    Ok(())
}

#[then("the job can no longer be restored")]
fn job_cannot_be_restored(world: &TrashWorld) -> Result<(), eyre::Report> {
    let job_id = world.job()?.id();
    let result = run_async(world.tracker.trash().restore_job(job_id));
    if !matches!(result, Err(JobServiceError::NotInTrash(id)) if id == job_id) {
        return Err(eyre::eyre!("expected NotInTrash, got {result:?}"));
    }
    Ok(())
}
