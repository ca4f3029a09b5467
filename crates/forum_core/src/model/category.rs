//! Category lookup entity.

use super::deletion::DeletionState;
use serde::{Deserialize, Serialize};

pub type CategoryId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
    pub deletion: DeletionState,
    pub updated_at: i64,
}
