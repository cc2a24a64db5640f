//! Left/right tags for mirrored items and the model naming rules around them.

use super::ParseSideError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a mirrored item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Left-hand item.
    #[serde(rename = "LH")]
    Lh,
    /// Right-hand item.
    #[serde(rename = "RH")]
    Rh,
}

impl Side {
    /// Returns the canonical tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lh => "LH",
            Self::Rh => "RH",
        }
    }

    /// Returns the mirrored side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Lh => Self::Rh,
            Self::Rh => Self::Lh,
        }
    }

    /// Detects the side named in a model, if any.
    #[must_use]
    pub fn from_model(model: &str) -> Option<Self> {
        if model.contains(Self::Lh.as_str()) {
            Some(Self::Lh)
        } else if model.contains(Self::Rh.as_str()) {
            Some(Self::Rh)
        } else {
            None
        }
    }
}

impl TryFrom<&str> for Side {
    type Error = ParseSideError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim();
        if normalized.eq_ignore_ascii_case("lh") {
            Ok(Self::Lh)
        } else if normalized.eq_ignore_ascii_case("rh") {
            Ok(Self::Rh)
        } else {
            Err(ParseSideError(value.to_owned()))
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strips a trailing side token (`LH`, `RH`, `(LH)` or `(RH)`) from a model
/// name, ignoring case.
///
/// A bare token only counts when it is separated from the rest of the name
/// by whitespace, so `"ARCH"` stays intact.
#[must_use]
pub fn strip_side_suffix(model: &str) -> &str {
    let trimmed = model.trim();
    for side in [Side::Lh, Side::Rh] {
        let token = side.as_str();
        if let Some(rest) = strip_suffix_ignore_case(trimmed, &format!("({token})")) {
            return rest.trim();
        }
        if let Some(rest) = strip_suffix_ignore_case(trimmed, token)
            && rest.ends_with(char::is_whitespace)
        {
            return rest.trim();
        }
    }
    trimmed
}

/// Derives the two model names and sides of a mirrored pair from one
/// catalog model.
///
/// A model naming one side is paired with the same name for the other side;
/// a side-neutral model gets both tags appended.
#[must_use]
pub fn pair_models(model: &str) -> [(String, Side); 2] {
    match Side::from_model(model) {
        Some(side) => {
            let mirrored = model.replace(side.as_str(), side.opposite().as_str());
            [(model.to_owned(), side), (mirrored, side.opposite())]
        }
        None => [
            (format!("{model} ({})", Side::Lh), Side::Lh),
            (format!("{model} ({})", Side::Rh), Side::Rh),
        ],
    }
}

/// Derives the model name and side of the mirrored counterpart of a job.
///
/// Without a known side the counterpart is taken to be the right-hand item.
#[must_use]
pub fn mirror_model(model: &str, side: Option<Side>) -> (String, Side) {
    match side.or_else(|| Side::from_model(model)) {
        Some(side) if model.contains(side.as_str()) => (
            model.replace(side.as_str(), side.opposite().as_str()),
            side.opposite(),
        ),
        Some(side) => (
            format!("{} ({})", strip_side_suffix(model), side.opposite()),
            side.opposite(),
        ),
        None => (format!("{model} ({})", Side::Rh), Side::Rh),
    }
}

fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    let split = value.len().checked_sub(suffix.len())?;
    if !value.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = value.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}
