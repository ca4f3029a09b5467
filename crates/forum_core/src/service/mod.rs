//! Use-case services.
//!
//! # Responsibility
//! - Assign fresh ids to new entities.
//! - Normalize raw tag input before it reaches the post aggregate store.
//! - Keep callers (RPC/gateway layers) decoupled from scope handling.

pub mod category_service;
pub mod comment_service;
pub mod post_service;
pub mod tag_input;
pub mod tag_service;

use crate::repo::error::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    /// Raw tag input does not match the `#word, #word` format.
    InvalidTags(String),
    Store(StoreError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_not_found())
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTags(value) => write!(f, "invalid tags: `{value}`"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTags(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
