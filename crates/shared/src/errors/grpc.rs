use crate::errors::{repository::RepositoryError, service::ServiceError};
use thiserror::Error;
use tonic::Status;

#[derive(Debug, Error)]
pub enum AppErrorGrpc {
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

impl From<AppErrorGrpc> for Status {
    fn from(err: AppErrorGrpc) -> Self {
        match err {
            AppErrorGrpc::Service(service_err) => match service_err {
                err @ (ServiceError::NotFound { .. } | ServiceError::BatchNotFound { .. }) => {
                    Status::not_found(err.to_string())
                }

                ServiceError::Validation(errors) => {
                    Status::invalid_argument(format!("Validation failed: {}", errors.join(", ")))
                }

                ServiceError::Repo(repo_err) => match repo_err {
                    RepositoryError::NotFound => Status::not_found("Not found"),
                    RepositoryError::Sqlx(_) => Status::internal("Database error"),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    fn to_status(err: ServiceError) -> Status {
        Status::from(AppErrorGrpc::from(err))
    }

    #[test]
    fn not_found_maps_to_not_found_with_message() {
        let status = to_status(ServiceError::NotFound {
            entity: "Product",
            id: 7,
        });
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "Product with id: #7 not found");
    }

    #[test]
    fn batch_not_found_maps_to_not_found() {
        let status = to_status(ServiceError::BatchNotFound { entity: "products" });
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "Some products were not found");
    }

    #[test]
    fn validation_maps_to_invalid_argument() {
        let status = to_status(ServiceError::Validation(vec!["page: too small".into()]));
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "Validation failed: page: too small");
    }

    #[test]
    fn database_errors_are_not_leaked() {
        let status = to_status(ServiceError::Repo(RepositoryError::Sqlx(
            sqlx::Error::PoolTimedOut,
        )));
        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), "Database error");
    }
}
