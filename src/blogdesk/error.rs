use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlogError {
    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Endpoint answered HTTP {0}")]
    HttpStatus(u16),

    #[error("Render error: {0}")]
    Render(#[from] minijinja::Error),

    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("Invalid tag '{name}': {reason}")]
    InvalidTag { name: String, reason: String },

    #[error("Not authenticated: set BLOGDESK_TOKEN or pass --token")]
    Unauthenticated,

    #[error("Failed to submit post, please try again ({0})")]
    SubmissionFailed(Box<BlogError>),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl BlogError {
    /// Wraps a store failure into the single signal surfaced to the user.
    pub fn submission(source: BlogError) -> Self {
        match source {
            already @ BlogError::SubmissionFailed(_) => already,
            other => BlogError::SubmissionFailed(Box::new(other)),
        }
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;
