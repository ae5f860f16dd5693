use model::{Answer, AnswerResult};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AnswerReply {
    pub question_id: String,
    pub quiz_id: String,
    pub answer: Answer,
}

#[derive(Debug, Serialize)]
pub struct DeletedAnswer {
    pub question_id: String,
    pub quiz_id: String,
    pub answer_id: String,
}

#[derive(Debug, Serialize)]
pub struct ReorderedAnswers {
    pub question_id: String,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Serialize)]
pub struct ValidationReply {
    pub question_id: String,
    pub results: Vec<AnswerResult>,
    pub score: f32,
}
