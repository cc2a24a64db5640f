//! Partial-quantity hand-off between stages.

use super::{GroupId, HistoryEntry, Job, JobDomainError, Stage, StaffName};
use mockable::Clock;
use std::collections::{HashMap, HashSet};

/// Result of splitting one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutcome {
    /// The original job: reduced to the remainder, or advanced in place when
    /// every unit moved.
    pub original: Job,
    /// The newly created record carrying the moved units, if any.
    pub piece: Option<Job>,
}

impl SplitOutcome {
    /// Returns the quantity held by both records together.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.original
            .quantity()
            .saturating_add(self.piece.as_ref().map_or(0, Job::quantity))
    }
}

/// Checks the split preconditions without building anything.
///
/// # Errors
///
/// Returns [`JobDomainError::InvalidQuantity`] unless
/// `1 <= move_quantity <= job.quantity()`, and the errors of
/// [`Job::ensure_can_advance`] for an unreachable `target`.
pub fn validate_split(job: &Job, move_quantity: u32, target: Stage) -> Result<(), JobDomainError> {
    if move_quantity == 0 || move_quantity > job.quantity() {
        return Err(JobDomainError::InvalidQuantity {
            job_id: job.id(),
            requested: move_quantity,
            available: job.quantity(),
        });
    }
    job.ensure_can_advance(target)
}

/// Moves `move_quantity` units of `job` to `target`.
///
/// When every unit moves, the job is advanced in place and no new record is
/// produced. Otherwise the original keeps the remainder at its stage and a
/// new record linked to `piece_group` is advanced to `target`, inheriting the
/// original history plus one split entry.
///
/// # Errors
///
/// See [`validate_split`].
pub fn split(
    job: &Job,
    move_quantity: u32,
    target: Stage,
    piece_group: Option<GroupId>,
    actor: StaffName,
    clock: &impl Clock,
) -> Result<SplitOutcome, JobDomainError> {
    validate_split(job, move_quantity, target)?;

    let mut original = job.clone();
    if move_quantity == job.quantity() {
        original.advance(target, actor, clock)?;
        return Ok(SplitOutcome {
            original,
            piece: None,
        });
    }

    let timestamp = clock.utc();
    let entry = HistoryEntry::new(target, actor, timestamp).with_note(format!(
        "split {move_quantity} of {} from {}",
        job.quantity(),
        job.id()
    ));
    original.reduce_quantity(move_quantity, timestamp);
    let piece = job.split_piece(move_quantity, piece_group, entry);
    Ok(SplitOutcome {
        original,
        piece: Some(piece),
    })
}

/// Splits several jobs to `target` in one hand-off.
///
/// Pieces split from members of one group share a fresh group, one per
/// source group, so mirrored pieces keep aggregating with each other and
/// never with unrelated jobs. A member of such a group that moved in full is
/// relinked to the same fresh group. Standalone sources yield standalone
/// pieces. Outcomes are returned in input order.
///
/// # Errors
///
/// Returns the first error of [`split`]; nothing is built on error.
pub fn split_batch<'a>(
    moves: impl IntoIterator<Item = (&'a Job, u32)>,
    target: Stage,
    actor: &StaffName,
    clock: &impl Clock,
) -> Result<Vec<SplitOutcome>, JobDomainError> {
    let selected: Vec<(&Job, u32)> = moves.into_iter().collect();
    let mut piece_groups: HashMap<GroupId, GroupId> = HashMap::new();
    for (job, _) in &selected {
        if let Some(source_group) = job.group_id() {
            piece_groups.entry(source_group).or_insert_with(GroupId::new);
        }
    }

    let mut outcomes = Vec::with_capacity(selected.len());
    let mut groups_with_pieces = HashSet::new();
    for (job, move_quantity) in selected {
        let piece_group = job
            .group_id()
            .and_then(|source_group| piece_groups.get(&source_group).copied());
        let outcome = split(job, move_quantity, target, piece_group, actor.clone(), clock)?;
        if outcome.piece.is_some()
            && let Some(source_group) = job.group_id()
        {
            groups_with_pieces.insert(source_group);
        }
        outcomes.push(outcome);
    }

    for outcome in &mut outcomes {
        if outcome.piece.is_some() {
            continue;
        }
        if let Some(source_group) = outcome.original.group_id()
            && groups_with_pieces.contains(&source_group)
            && let Some(piece_group) = piece_groups.get(&source_group).copied()
        {
            outcome.original.assign_group(piece_group, clock);
        }
    }
    Ok(outcomes)
}
