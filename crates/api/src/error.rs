use core::fmt::{self, Display};
use hyper::StatusCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Malformed or policy-violating request.
    InvalidInput(&'static str),
    /// The referenced quiz, question, or answer does not exist.
    NotFound(&'static str),
    /// Persistence failure on our end.
    Internal,
}

impl Error {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<model::error::Error> for Error {
    fn from(err: model::error::Error) -> Self {
        if err.is_not_found() {
            Self::NotFound(err.as_str())
        } else {
            Self::InvalidInput(err.as_str())
        }
    }
}

impl From<db::error::Error> for Error {
    fn from(err: db::error::Error) -> Self {
        use db::error::Error as Db;
        match err {
            Db::BadInput => Self::InvalidInput("The values were rejected by the store."),
            Db::NotFound => Self::NotFound("Resource not found."),
            Db::Fatal => Self::Internal,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InvalidInput(reason) | Self::NotFound(reason) => reason,
            Self::Internal => "Oops! We have encountered an unrecoverable error on our end.",
        })
    }
}

pub type Result<T> = core::result::Result<T, Error>;
