//! Outcome of an insert guarded by a uniqueness constraint.

/// Result of inserting a record whose key must be unique.
///
/// Stores report `AlreadyExists` instead of failing when the uniqueness
/// constraint rejects the row (e.g. `ON CONFLICT DO NOTHING` affected zero
/// rows). This is the authoritative duplicate guard; any lookup done before
/// the insert is only a fast path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// The record was newly inserted.
    Inserted,
    /// A record with the same unique key already existed; nothing was written.
    AlreadyExists,
}

impl SaveResult {
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows == 0 {
            SaveResult::AlreadyExists
        } else {
            SaveResult::Inserted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rows_means_conflict() {
        assert_eq!(SaveResult::from_rows_affected(0), SaveResult::AlreadyExists);
        assert_eq!(SaveResult::from_rows_affected(1), SaveResult::Inserted);
    }
}
