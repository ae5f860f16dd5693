//! Persistence contracts consumed by the service layer. Implementations are
//! free to lock internally but offer no version checks: concurrent updates of
//! the same entity follow "last write wins".

use crate::error::Result;
use alloc::vec::Vec;
use core::future::Future;
use model::{Pagination, Question, Quiz};

pub trait QuizRepo {
    /// Inserts a new quiz. The `id` and timestamps of the argument are ignored;
    /// the stored quiz is returned with its assigned identifier.
    fn save_quiz(&self, quiz: &Quiz) -> impl Future<Output = Result<Quiz>> + Send;
    fn get_quiz(&self, id: &str) -> impl Future<Output = Result<Quiz>> + Send;
    fn list_quizzes(&self, page: Pagination) -> impl Future<Output = Result<Vec<Quiz>>> + Send;
    /// Overwrites the mutable fields of an existing quiz. Fails with
    /// [`NotFound`](crate::error::Error::NotFound) if nothing was modified.
    fn update_quiz(&self, quiz: &Quiz) -> impl Future<Output = Result<Quiz>> + Send;
    /// Removes the quiz along with its questions. Returns the removed quiz.
    fn delete_quiz(&self, id: &str) -> impl Future<Output = Result<Quiz>> + Send;
    /// Case-insensitive match of `keyword` against titles and descriptions.
    fn search_quizzes(&self, keyword: &str, page: Pagination) -> impl Future<Output = Result<Vec<Quiz>>> + Send;
}

pub trait QuestionRepo {
    /// Inserts a new question along with its answers. Fails with
    /// [`NotFound`](crate::error::Error::NotFound) if the parent quiz does not exist.
    fn save_question(&self, question: &Question) -> impl Future<Output = Result<Question>> + Send;
    fn get_question(&self, id: &str) -> impl Future<Output = Result<Question>> + Send;
    /// One page of the questions of a quiz, sorted by their order.
    fn list_questions(&self, quiz_id: &str, page: Pagination) -> impl Future<Output = Result<Vec<Question>>> + Send;
    /// Every question of a quiz, sorted by their order.
    fn questions_of(&self, quiz_id: &str) -> impl Future<Output = Result<Vec<Question>>> + Send;
    /// Overwrites an existing question, answers included.
    fn update_question(&self, question: &Question) -> impl Future<Output = Result<Question>> + Send;
    fn delete_question(&self, id: &str) -> impl Future<Output = Result<Question>> + Send;
}
