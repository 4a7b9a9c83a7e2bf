use shapecast_transform::TransformError;

/// Errors from [`JobBoard::refresh`](crate::JobBoard::refresh).
#[derive(Debug, thiserror::Error)]
pub enum JobBoardError {
    #[error("job search for {query:?} failed: {source}")]
    Source {
        query: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("job search response does not match JobSearchResponse: {0}")]
    Decode(#[from] TransformError),
}

/// Errors from moving tasks in and out of their external form.
#[derive(Debug, thiserror::Error)]
pub enum TaskStoreError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("task id {0:?} is not a UUID")]
    InvalidId(String),

    #[error("task serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
