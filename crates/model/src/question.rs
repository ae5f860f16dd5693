use crate::{
    error::{Error, Result},
    quiz::Audit,
    IdGenerator,
};
use alloc::{string::String, vec::Vec};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Expert,
}

impl From<Difficulty> for i16 {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
            Difficulty::Expert => 3,
        }
    }
}

impl TryFrom<i16> for Difficulty {
    type Error = Error;

    fn try_from(level: i16) -> Result<Self> {
        Ok(match level {
            0 => Self::Easy,
            1 => Self::Medium,
            2 => Self::Hard,
            3 => Self::Expert,
            _ => return Err(Error::UnknownDifficulty),
        })
    }
}

/// One selectable option of a [`Question`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Answer {
    pub id: String,
    pub text: String,
    /// Authoritative correctness flag. Never taken from the quiz-taker.
    pub is_correct: bool,
    /// Shown to the quiz-taker after validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Acceptable schema for new answers. The identifier is assigned on creation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnswerDraft {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl AnswerDraft {
    pub fn into_answer(self, id: String) -> Answer {
        let Self { text, is_correct, explanation } = self;
        Answer { id, text, is_correct, explanation }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub quiz_id: String,
    pub question: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Position among the other questions of the same quiz.
    #[serde(default)]
    pub order: f64,
    #[serde(default)]
    pub hint: Option<String>,
    /// Presentation order. Validation results follow this order as well.
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub audit: Audit,
}

/// Acceptable schema for new questions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuestionDraft {
    pub quiz_id: String,
    pub question: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub order: f64,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub answers: Vec<AnswerDraft>,
}

impl QuestionDraft {
    /// Builds an unsaved question. Every answer receives a fresh identifier; the
    /// question identifier itself is left empty for the store to assign.
    pub fn into_question<G>(self, ids: &G) -> Question
    where
        G: IdGenerator + ?Sized,
    {
        let Self { quiz_id, question, difficulty, order, hint, answers } = self;
        let answers = answers.into_iter().map(|draft| draft.into_answer(ids.generate())).collect();
        Question { id: String::new(), quiz_id, question, difficulty, order, hint, answers, audit: Audit::default() }
    }
}

/// Partial update of a question. Absent fields keep their stored values.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct QuestionPatch {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub order: Option<f64>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl QuestionPatch {
    pub fn apply(self, target: &mut Question) {
        let Self { question, difficulty, order, hint } = self;
        if let Some(question) = question {
            target.question = question;
        }
        if let Some(difficulty) = difficulty {
            target.difficulty = difficulty;
        }
        if let Some(order) = order {
            target.order = order;
        }
        if hint.is_some() {
            target.hint = hint;
        }
    }
}
