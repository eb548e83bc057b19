use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("Invalid matcher: expected an action type or a list of action types, got {0}")]
    InvalidSpec(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
