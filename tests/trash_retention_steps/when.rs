//! When steps for trash retention BDD scenarios.

use super::world::{TrashWorld, run_async};
use caliper::job::domain::StaffName;
use chrono::TimeDelta;
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#""{name}" deletes the job"#)]
fn delete_job(world: &mut TrashWorld, name: String) -> Result<(), eyre::Report> {
    let job_id = world.job()?.id();
    let actor = StaffName::new(name)?;
    run_async(world.tracker.trash().soft_delete_jobs(&[job_id], actor))
        .wrap_err("soft delete job")?;
    Ok(())
}

#[when("the job is restored")]
fn restore_job(world: &mut TrashWorld) -> Result<(), eyre::Report> {
    let job_id = world.job()?.id();
    let restored =
        run_async(world.tracker.trash().restore_job(job_id)).wrap_err("restore job")?;
    world.job = Some(restored);
    Ok(())
}

#[when("{days:u32} days pass")]
fn days_pass(world: &mut TrashWorld, days: u32) {
    world.tracker.clock.advance(TimeDelta::days(i64::from(days)));
}

#[when("{hours:u32} hours pass")]
fn hours_pass(world: &mut TrashWorld, hours: u32) {
    world.tracker.clock.advance(TimeDelta::hours(i64::from(hours)));
}
