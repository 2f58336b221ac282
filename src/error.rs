use log::{error, warn};
use mongodb::{bson::de::Error as BsonDeError, error::Error as DbError};
use rocket::{http::Status, response::Responder, Request};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Store failures; always fatal to the request.
    #[error(transparent)]
    Db(#[from] DbError),
    /// A stored record did not have the expected shape.
    #[error(transparent)]
    BsonDe(#[from] BsonDeError),
    /// The requested record does not exist, or is not visible to the caller.
    #[error("Not found: {0}")]
    NotFound(String),
    /// A vote named no choice, or a choice belonging to another question.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
    #[error("{1}")]
    Status(Status, String),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn bad_request(why: impl Into<String>) -> Self {
        Self::Status(Status::BadRequest, why.into())
    }

    /// The HTTP status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            Self::Db(_) | Self::BsonDe(_) => Status::InternalServerError,
            Self::NotFound(_) => Status::NotFound,
            Self::InvalidSelection(_) => Status::UnprocessableEntity,
            Self::Status(status, _) => *status,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        if status.class().is_server_error() {
            error!("{self}");
        } else {
            warn!("{self}");
        }
        Err(status)
    }
}
