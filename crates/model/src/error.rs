use core::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The question has no answers to operate on.
    NoAnswers,
    /// The number of given answer IDs differs from the number of answers.
    CountMismatch,
    /// The reorder request does not list every answer exactly once.
    NotPermutation,
    EmptyAnswerId,
    UnknownAnswer,
    /// The placement anchor is not a sibling of the question.
    UnknownAnchor,
    /// A question cannot be placed relative to itself.
    SelfAnchor,
    UnknownDifficulty,
}

impl Error {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoAnswers => "The question has no answers.",
            Self::CountMismatch => "The number of answer IDs does not match the number of answers.",
            Self::NotPermutation => "Answer IDs must list every existing answer exactly once.",
            Self::EmptyAnswerId => "The answer ID is empty.",
            Self::UnknownAnswer => "Answer not found.",
            Self::UnknownAnchor => "The anchor question is not part of the same quiz.",
            Self::SelfAnchor => "A question cannot be placed relative to itself.",
            Self::UnknownDifficulty => "Unknown difficulty level.",
        }
    }

    /// Whether the error refers to something that does not exist (as opposed to
    /// a malformed request).
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownAnswer | Self::UnknownAnchor)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Result<T> = core::result::Result<T, Error>;
