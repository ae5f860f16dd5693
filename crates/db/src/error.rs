use core::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The store rejected the values (e.g. a violated check constraint).
    BadInput,
    /// No row or document matched.
    NotFound,
    /// Unrecoverable error.
    Fatal,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BadInput => "Unacceptable input.",
            Self::NotFound => "Resource not found.",
            Self::Fatal => "Unexpected storage failure.",
        })
    }
}

pub type Result<T> = core::result::Result<T, Error>;
