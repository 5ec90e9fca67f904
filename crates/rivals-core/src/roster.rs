use crate::error::AppError;

/// Admission decision for a project's competitor roster.
///
/// Pure: the caller supplies the current active count. The authoritative
/// check happens again inside the store's capped insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterGuard {
    max: u32,
}

impl RosterGuard {
    pub fn new(max: u32) -> Self {
        Self { max }
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Admit iff `current_count < max`.
    pub fn admit(&self, current_count: u64) -> Result<(), AppError> {
        if current_count < u64::from(self.max) {
            Ok(())
        } else {
            Err(AppError::MaxCompetitorsReached { limit: self.max })
        }
    }
}
