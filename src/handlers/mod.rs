pub mod orders;
pub mod users;

use actix_web::web;

use crate::domain::errors::DomainError;
use crate::errors::AppError;

/// Runs storage-bound work on actix's blocking thread pool.
async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    web::block(work)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::from)
}
