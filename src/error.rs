use std::result;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("Missing \"{0}\" in challenge")]
    MissingRequired(&'static str),
}

pub type Result<T> = result::Result<T, Error>;
