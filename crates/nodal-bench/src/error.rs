use thiserror::Error;

pub type Result<T> = std::result::Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl BenchError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        1
    }
}
