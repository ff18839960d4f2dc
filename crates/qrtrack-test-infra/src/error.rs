use thiserror::Error;

pub type Result<T> = std::result::Result<T, TestInfraError>;

/// Failure to start or inspect a disposable Postgres container.
#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("postgres container failed: {0}")]
    Container(#[from] testcontainers::TestcontainersError),
}
