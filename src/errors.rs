use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoachError {
    #[error("configuration error: {0}")] Config(String),
    #[error("request failed: {0}")] Request(String),
    #[error("parse error: {0}")] Parse(String),
    #[error("frame error: {0}")] Frame(String),
    #[error("request cancelled before its reply was committed")] Cancelled,
}

pub type CoachResult<T> = Result<T, CoachError>;
