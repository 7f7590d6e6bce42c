#[derive(Debug, thiserror::Error)]
pub enum XunitArgsError {
    #[error("{0} is not supported on .NET Core")]
    UnsupportedOption(String),

    #[error("cannot derive a report name from project path: {0}")]
    ProjectPath(String),

    #[error("invalid trait filter (expected NAME=VALUE): {0}")]
    InvalidTrait(String),

    #[error("invalid parallelism option: {0}")]
    InvalidParallelism(String),
}

pub type Result<T> = std::result::Result<T, XunitArgsError>;
