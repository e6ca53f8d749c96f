use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Dish not found: {0}")]
    DishNotFound(String),

    #[error("Resident not found: {0}")]
    ResidentNotFound(String),

    #[error("Menu not found: {0}")]
    MenuNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EngineError {
    /// Missing upstream data, as opposed to bad input or I/O failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::DishNotFound(_)
                | EngineError::ResidentNotFound(_)
                | EngineError::MenuNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
