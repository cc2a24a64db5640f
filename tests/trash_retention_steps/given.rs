//! Given steps for trash retention BDD scenarios.

use super::world::{TrashWorld, run_async};
use caliper::job::services::JobRequest;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a requested job for product "{code}" with quantity {quantity:u32}"#)]
fn requested_job(world: &mut TrashWorld, code: String, quantity: u32) -> Result<(), eyre::Report> {
    let jobs = run_async(
        world
            .tracker
            .requests()
            .request_job(JobRequest::new(code, quantity).with_author("홍길동")),
    )
    .wrap_err("request job for trash scenario")?;
    let job = jobs
        .into_iter()
        .next()
        .ok_or_else(|| eyre::eyre!("request produced no job"))?;
    world.job = Some(job);
    Ok(())
}
