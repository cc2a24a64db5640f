//! Staff directory port.

use crate::job::domain::StaffName;

/// Read-only, ordered list of people transitions can be attributed to.
#[cfg_attr(test, mockall::automock)]
pub trait StaffDirectory: Send + Sync {
    /// Returns the display names in directory order.
    fn names(&self) -> Vec<StaffName>;

    /// Returns whether `name` is listed.
    fn contains(&self, name: &StaffName) -> bool {
        self.names().iter().any(|listed| listed == name)
    }
}
