#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod answers;
pub mod error;
pub mod question;
pub mod quiz;
pub mod reorder;
pub mod score;

use alloc::string::String;

pub use question::{Answer, AnswerDraft, Difficulty, Question, QuestionDraft, QuestionPatch};
pub use quiz::{Audit, Pagination, Quiz, QuizDraft, QuizPatch};
pub use reorder::{Placement, Reorder};
pub use score::{AnswerResult, Submission, Validation};

/// Source of fresh identifiers for newly created answers. Implementations must
/// never hand out the same identifier twice.
pub trait IdGenerator {
    fn generate(&self) -> String;
}

impl<F> IdGenerator for F
where
    F: Fn() -> String,
{
    fn generate(&self) -> String {
        self()
    }
}
