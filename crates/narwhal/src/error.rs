use narwhal_lgraph::GraphError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid graph state: {0}")]
    InvalidGraph(#[from] GraphError),

    #[error("invalid crossing minimization options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
