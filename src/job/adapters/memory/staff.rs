//! Fixed staff directory.

use crate::job::{
    domain::{JobDomainError, StaffName},
    ports::StaffDirectory,
};

/// Staff directory backed by a fixed list of names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticStaffDirectory {
    names: Vec<StaffName>,
}

impl StaticStaffDirectory {
    /// Creates a directory from display names, dropping duplicates while
    /// keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::EmptyStaffName`] when a name is blank.
    pub fn new<I, S>(names: I) -> Result<Self, JobDomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut validated: Vec<StaffName> = Vec::new();
        for name in names {
            let staff_name = StaffName::new(name)?;
            if !validated.contains(&staff_name) {
                validated.push(staff_name);
            }
        }
        Ok(Self { names: validated })
    }
}

impl StaffDirectory for StaticStaffDirectory {
    fn names(&self) -> Vec<StaffName> {
        self.names.clone()
    }
}
