/// Recoverable failures of store mutations. None of them is fatal: the
/// controller turns each one into a message for the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{field} must not be empty")]
    EmptyInput { field: &'static str },

    #[error("a category named \"{name}\" already exists")]
    DuplicateName { name: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("select a category before adding a link")]
    NoCategorySelected,

    #[error("failed to persist snapshot: {0}")]
    Persistence(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::EmptyInput { .. } => "EmptyInput",
            StoreError::DuplicateName { .. } => "DuplicateName",
            StoreError::NotFound { .. } => "NotFound",
            StoreError::NoCategorySelected => "NoCategorySelected",
            StoreError::Persistence(_) => "PersistenceFailed",
        }
    }

    pub(crate) fn category_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: "category",
            id: id.into(),
        }
    }

    pub(crate) fn link_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: "link",
            id: id.into(),
        }
    }
}
