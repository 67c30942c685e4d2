pub mod task_service;
pub mod user_service;

pub use task_service::TaskService;
pub use user_service::UserService;

/// Failure taxonomy shared by the service layer. Every kind maps to exactly
/// one transport status code at the handler boundary (see `error.rs`).
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    InvalidPassword(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    RoleViolation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("password hash error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}
