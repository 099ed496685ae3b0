use thiserror::Error;

use crate::ids::{ColumnId, EntityId};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid id: {0:?}")]
    InvalidId(String),
    #[error("invalid cell id: {0:?}")]
    InvalidCellId(String),
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),
    #[error("duplicate entity id {0}")]
    DuplicateEntity(EntityId),
    #[error("duplicate column id {0}")]
    DuplicateColumn(ColumnId),
    #[error("unknown entity id {0}")]
    UnknownEntity(EntityId),
    #[error("unknown column id {0}")]
    UnknownColumn(ColumnId),
}

pub type Result<T> = std::result::Result<T, ModelError>;
