//! Production stage sequence and the stored completion-flag encoding.

use super::ParseStageError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Production stage of a job.
///
/// Variants are declared in production order, so the derived [`Ord`] ranks
/// a less advanced stage below a more advanced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Job has been requested but no stage has been confirmed.
    NewAdded,
    /// Items have arrived and wait for disassembly.
    Waiting,
    /// Disassembly has finished.
    Disassembly,
    /// Parts have been released to the plating subcontractor.
    PlatingRelease,
    /// Plated parts are back and wait for assembly.
    AssemblyWait,
    /// Production has finished.
    Complete,
}

impl Stage {
    /// Non-terminal stages in production order.
    pub const ORDERED: [Self; 4] = [
        Self::Waiting,
        Self::Disassembly,
        Self::PlatingRelease,
        Self::AssemblyWait,
    ];

    /// Every stage, initial and terminal included, in production order.
    pub const ALL: [Self; 6] = [
        Self::NewAdded,
        Self::Waiting,
        Self::Disassembly,
        Self::PlatingRelease,
        Self::AssemblyWait,
        Self::Complete,
    ];

    /// Returns the canonical storage key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewAdded => "new_added",
            Self::Waiting => "waiting",
            Self::Disassembly => "disassembly",
            Self::PlatingRelease => "plating_release",
            Self::AssemblyWait => "assembly_wait",
            Self::Complete => "complete",
        }
    }

    /// Returns the human-readable label shown to operators.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NewAdded => "New request",
            Self::Waiting => "Awaiting disassembly",
            Self::Disassembly => "Disassembled",
            Self::PlatingRelease => "Released to plating",
            Self::AssemblyWait => "Awaiting assembly",
            Self::Complete => "Production complete",
        }
    }

    /// Returns the stage that follows this one, or `None` for
    /// [`Stage::Complete`].
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::NewAdded => Some(Self::Waiting),
            Self::Waiting => Some(Self::Disassembly),
            Self::Disassembly => Some(Self::PlatingRelease),
            Self::PlatingRelease => Some(Self::AssemblyWait),
            Self::AssemblyWait => Some(Self::Complete),
            Self::Complete => None,
        }
    }

    /// Returns whether this is the terminal stage.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Returns whether a job at this stage may be moved to `target`.
    ///
    /// Any stage strictly ahead is reachable: the next stage as well as a
    /// deliberate skip-ahead.
    #[must_use]
    pub fn can_advance_to(self, target: Self) -> bool {
        !self.is_terminal() && target > self
    }
}

impl TryFrom<&str> for Stage {
    type Error = ParseStageError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == normalized)
            .ok_or_else(|| ParseStageError(value.to_owned()))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored completion flags, one per non-terminal stage plus `complete`.
///
/// Jobs written by this crate always hold a prefix of `true` flags. Documents
/// written elsewhere may not, which is why [`StatusFlags::current_stage`]
/// only looks at the most advanced flag that is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlags {
    /// Arrived and awaiting disassembly.
    #[serde(default)]
    pub waiting: bool,
    /// Disassembly finished.
    #[serde(default)]
    pub disassembly: bool,
    /// Released to plating.
    #[serde(default)]
    pub plating_release: bool,
    /// Awaiting assembly.
    #[serde(default)]
    pub assembly_wait: bool,
    /// Production complete.
    #[serde(default)]
    pub complete: bool,
}

impl StatusFlags {
    /// Returns the forward-filled flags for a job at `stage`.
    #[must_use]
    pub fn for_stage(stage: Stage) -> Self {
        Self {
            waiting: stage >= Stage::Waiting,
            disassembly: stage >= Stage::Disassembly,
            plating_release: stage >= Stage::PlatingRelease,
            assembly_wait: stage >= Stage::AssemblyWait,
            complete: stage.is_terminal(),
        }
    }

    /// Returns the raw flag for `stage`. [`Stage::NewAdded`] has no flag and
    /// always reads as `false`.
    #[must_use]
    pub const fn is_set(&self, stage: Stage) -> bool {
        match stage {
            Stage::NewAdded => false,
            Stage::Waiting => self.waiting,
            Stage::Disassembly => self.disassembly,
            Stage::PlatingRelease => self.plating_release,
            Stage::AssemblyWait => self.assembly_wait,
            Stage::Complete => self.complete,
        }
    }

    /// Derives the current stage: `complete` when that flag is set, else the
    /// most advanced ordered stage whose flag is set, else `new_added`.
    #[must_use]
    pub fn current_stage(&self) -> Stage {
        if self.complete {
            return Stage::Complete;
        }
        Stage::ORDERED
            .into_iter()
            .rev()
            .find(|stage| self.is_set(*stage))
            .unwrap_or(Stage::NewAdded)
    }

    /// Returns whether the set flags form a prefix of the stage order.
    #[must_use]
    pub fn is_prefix(&self) -> bool {
        *self == Self::for_stage(self.current_stage())
    }
}
