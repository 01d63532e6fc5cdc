use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(SqlxError),

    #[error("Not found")]
    NotFound,
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => RepositoryError::NotFound,
            other => RepositoryError::Sqlx(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_collapses_to_not_found() {
        let err = RepositoryError::from(SqlxError::RowNotFound);
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn other_sqlx_errors_are_kept() {
        let err = RepositoryError::from(SqlxError::PoolTimedOut);
        assert!(matches!(err, RepositoryError::Sqlx(SqlxError::PoolTimedOut)));
    }
}
