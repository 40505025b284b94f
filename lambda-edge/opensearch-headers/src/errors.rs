use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdgeError {
    #[error("Event contains no CloudFront records")]
    MissingRecord,

    #[error("CloudFront record has no response; is the function attached to an origin-response trigger?")]
    MissingResponse,
}

pub type EdgeResult<T> = Result<T, EdgeError>;
