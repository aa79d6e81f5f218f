//! Error bridging
//!
//! Re-exports the unified error system from `shared` and converts
//! repository errors into it so services can use `?` on store calls.

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use crate::db::repository::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) | RepoError::Conflict(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_repo_error_status_mapping() {
        let cases = [
            (RepoError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (RepoError::Duplicate("x".into()), StatusCode::CONFLICT),
            (RepoError::Conflict("x".into()), StatusCode::CONFLICT),
            (RepoError::Validation("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (RepoError::Database("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (repo_err, status) in cases {
            assert_eq!(AppError::from(repo_err).http_status(), status);
        }
    }
}
