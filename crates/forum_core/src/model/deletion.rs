//! Soft-delete state shared by posts, comments and categories.

use serde::{Deserialize, Serialize};

/// Lifecycle marker for soft-deletable rows.
///
/// Storage keeps a nullable epoch-seconds `deleted_at` column where `NULL`
/// and `0` both mean "live".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "at")]
pub enum DeletionState {
    #[default]
    Active,
    /// Epoch seconds at which the row was tombstoned.
    DeletedAt(i64),
}

impl DeletionState {
    /// Decodes the raw `deleted_at` column value.
    pub fn from_marker(marker: Option<i64>) -> Self {
        match marker {
            None | Some(0) => Self::Active,
            Some(at) => Self::DeletedAt(at),
        }
    }

    /// Encodes this state back into the `deleted_at` column value.
    pub fn marker(self) -> i64 {
        match self {
            Self::Active => 0,
            Self::DeletedAt(at) => at,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::DeletionState;

    #[test]
    fn null_and_zero_markers_are_active() {
        assert_eq!(DeletionState::from_marker(None), DeletionState::Active);
        assert_eq!(DeletionState::from_marker(Some(0)), DeletionState::Active);
        assert!(DeletionState::from_marker(Some(0)).is_active());
    }

    #[test]
    fn nonzero_marker_round_trips() {
        let state = DeletionState::from_marker(Some(1_700_000_000));
        assert_eq!(state, DeletionState::DeletedAt(1_700_000_000));
        assert!(!state.is_active());
        assert_eq!(state.marker(), 1_700_000_000);
    }
}
