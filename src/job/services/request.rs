//! Service layer for requesting new jobs, single or as mirrored pairs.

use super::{
    JobServiceError, JobServiceResult,
    support::{BatchProgress, load_active},
};
use crate::config::TrackerConfig;
use crate::job::{
    domain::{GroupId, Job, JobDraft, JobId, Side, StaffName, mirror_model, pair_models},
    ports::{Collection, JobStore, ProductCatalog},
};
use mockable::Clock;
use std::sync::Arc;

/// Request payload for new production jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    code: String,
    quantity: u32,
    model: Option<String>,
    side: Option<Side>,
    urgent: bool,
    memo: String,
    author: Option<String>,
    paired: bool,
    group_id: Option<GroupId>,
}

impl JobRequest {
    /// Creates a request for `quantity` units of the product with `code`.
    #[must_use]
    pub fn new(code: impl Into<String>, quantity: u32) -> Self {
        Self {
            code: code.into(),
            quantity,
            model: None,
            side: None,
            urgent: false,
            memo: String::new(),
            author: None,
            paired: false,
            group_id: None,
        }
    }

    /// Sets the model name, skipping the catalog lookup.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the side of a single job.
    #[must_use]
    pub const fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// Flags the request urgent.
    #[must_use]
    pub const fn urgent(mut self) -> Self {
        self.urgent = true;
        self
    }

    /// Sets the memo.
    #[must_use]
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Sets the requester.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Requests both the left-hand and right-hand item as one group.
    #[must_use]
    pub const fn paired(mut self) -> Self {
        self.paired = true;
        self
    }

    /// Adds the requested jobs to an existing group.
    #[must_use]
    pub const fn joining(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }
}

/// Job request orchestration service.
#[derive(Clone)]
pub struct JobRequestService<S, P, C>
where
    S: JobStore,
    P: ProductCatalog,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    catalog: Arc<P>,
    clock: Arc<C>,
    config: Arc<TrackerConfig>,
}

impl<S, P, C> JobRequestService<S, P, C>
where
    S: JobStore,
    P: ProductCatalog,
    C: Clock + Send + Sync,
{
    /// Creates a new job request service.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        catalog: Arc<P>,
        clock: Arc<C>,
        config: Arc<TrackerConfig>,
    ) -> Self {
        Self {
            store,
            catalog,
            clock,
            config,
        }
    }

    /// Creates the jobs described by `request`.
    ///
    /// A paired request creates a left-hand and a right-hand job sharing the
    /// request's group, or a fresh one. Without an explicit model the model
    /// is looked up by product code.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::UnknownProduct`] when the code is not in
    /// the catalog, a wrapped domain error for an incomplete request, and a
    /// store error (or [`JobServiceError::PartialBatch`] for the second job
    /// of a pair) when a write fails.
    pub async fn request_job(&self, request: JobRequest) -> JobServiceResult<Vec<Job>> {
        let model = self.resolve_model(&request).await?;
        let requested_by = self.requester(request.author.as_deref());

        let drafts = if request.paired {
            let group_id = request.group_id.unwrap_or_else(GroupId::new);
            pair_models(&model)
                .into_iter()
                .map(|(paired_model, side)| {
                    let mut draft = base_draft(&request, paired_model);
                    draft.side = Some(side);
                    draft.group_id = Some(group_id);
                    draft
                })
                .collect()
        } else {
            let mut draft = base_draft(&request, model);
            draft.side = request.side.or_else(|| Side::from_model(&draft.model));
            draft.group_id = request.group_id;
            vec![draft]
        };

        let jobs = drafts
            .into_iter()
            .map(|draft| Job::new(draft, requested_by.clone(), &*self.clock))
            .collect::<Result<Vec<_>, _>>()?;

        let mut progress = BatchProgress::new("request_job");
        for job in &jobs {
            if let Err(err) = self.store.set(Collection::Active, job).await {
                return Err(progress.fail(job.id(), err));
            }
            progress.record(job.id());
            tracing::info!(
                job_id = %job.id(),
                code = job.code(),
                model = job.model(),
                quantity = job.quantity(),
                "requested job"
            );
        }
        Ok(jobs)
    }

    /// Creates the mirrored counterpart of an existing job in the same
    /// group, grouping the original first when it stands alone.
    ///
    /// Returns the original (as written) and the new counterpart.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::NotFound`] for an unknown job, and a store
    /// error such as a revision conflict when a write fails.
    pub async fn request_opposite(
        &self,
        job_id: JobId,
        requested_by: StaffName,
    ) -> JobServiceResult<(Job, Job)> {
        let stored = load_active(&*self.store, job_id).await?;
        let mut original = stored.job;
        let group_id = original.group_id().unwrap_or_else(GroupId::new);

        let (model, side) = mirror_model(original.model(), original.side());
        let draft = JobDraft {
            code: original.code().to_owned(),
            model,
            side: Some(side),
            quantity: original.quantity(),
            urgent: original.is_urgent(),
            memo: original.memo().to_owned(),
            author: original.author().map(str::to_owned),
            group_id: Some(group_id),
        };
        let counterpart = Job::new(draft, requested_by, &*self.clock)?;

        if original.group_id().is_none() {
            original.assign_group(group_id, &*self.clock);
            self.store
                .update(Collection::Active, &original, stored.revision)
                .await?;
        }
        self.store.set(Collection::Active, &counterpart).await?;
        tracing::info!(
            job_id = %job_id,
            counterpart_id = %counterpart.id(),
            group = %group_id,
            "requested opposite side"
        );
        Ok((original, counterpart))
    }

    async fn resolve_model(&self, request: &JobRequest) -> JobServiceResult<String> {
        if let Some(explicit) = request.model.as_deref()
            && !explicit.trim().is_empty()
        {
            return Ok(explicit.to_owned());
        }
        let code = request.code.trim();
        let product = self
            .catalog
            .find_by_code(code)
            .await?
            .ok_or_else(|| JobServiceError::UnknownProduct(code.to_owned()))?;
        Ok(product.model)
    }

    fn requester(&self, author: Option<&str>) -> StaffName {
        author
            .and_then(|name| StaffName::new(name).ok())
            .unwrap_or_else(|| self.config.system_staff_name())
    }
}

fn base_draft(request: &JobRequest, model: String) -> JobDraft {
    JobDraft {
        code: request.code.clone(),
        model,
        side: None,
        quantity: request.quantity,
        urgent: request.urgent,
        memo: request.memo.clone(),
        author: request.author.clone(),
        group_id: None,
    }
}
