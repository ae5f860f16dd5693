use crate::{
    error::{Error, Result},
    question::Answer,
};
use alloc::{collections::BTreeMap, string::String, vec::Vec};
use serde::{Deserialize, Serialize};

/// A quiz-taker's selection for one answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Submission {
    pub answer_id: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnswerResult {
    pub answer_id: String,
    pub is_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Validation {
    /// One entry per stored answer, in stored order.
    pub results: Vec<AnswerResult>,
    /// Percentage of correctly judged answers, between `0` and `100`.
    pub score: f32,
}

/// Compares the submitted selections against the stored correctness flags.
///
/// Exactly one submission per stored answer is required. A submission whose
/// identifier matches no stored answer does not fail the whole batch; the stored
/// answer it was meant for is simply judged invalid. If the same identifier is
/// submitted more than once, the last submission wins.
pub fn validate(answers: &[Answer], submissions: &[Submission]) -> Result<Validation> {
    if answers.is_empty() {
        return Err(Error::NoAnswers);
    }

    if answers.len() != submissions.len() {
        return Err(Error::CountMismatch);
    }

    let checked: BTreeMap<_, _> = submissions.iter().map(|sub| (sub.answer_id.as_str(), sub.checked)).collect();
    let results: Vec<_> = answers
        .iter()
        .map(|answer| {
            let is_valid = checked.get(answer.id.as_str()).is_some_and(|&checked| checked == answer.is_correct);
            AnswerResult { answer_id: answer.id.clone(), is_valid }
        })
        .collect();

    let valid = results.iter().filter(|result| result.is_valid).count();
    let score = valid as f32 / answers.len() as f32 * 100.0;
    Ok(Validation { results, score })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(id: &str, is_correct: bool) -> Answer {
        Answer { id: id.into(), text: String::new(), is_correct, explanation: None }
    }

    fn sub(answer_id: &str, checked: bool) -> Submission {
        Submission { answer_id: answer_id.into(), checked }
    }

    fn result(answer_id: &str, is_valid: bool) -> AnswerResult {
        AnswerResult { answer_id: answer_id.into(), is_valid }
    }

    #[test]
    fn scores_half_correct_selection() {
        let answers = [answer("a1", true), answer("a2", false)];
        let validation = validate(&answers, &[sub("a1", true), sub("a2", true)]).unwrap();
        assert_eq!(validation.results, [result("a1", true), result("a2", false)]);
        assert_eq!(validation.score, 50.0);
    }

    #[test]
    fn perfect_selection_scores_hundred() {
        let answers = [answer("a1", false), answer("a2", true), answer("a3", false)];
        let validation = validate(&answers, &[sub("a3", false), sub("a1", false), sub("a2", true)]).unwrap();
        assert!(validation.results.iter().all(|result| result.is_valid));
        assert_eq!(validation.score, 100.0);
    }

    #[test]
    fn results_follow_stored_order() {
        let answers = [answer("a1", true), answer("a2", false), answer("a3", true)];
        let validation = validate(&answers, &[sub("a3", false), sub("a2", false), sub("a1", true)]).unwrap();
        let order: Vec<_> = validation.results.iter().map(|result| result.answer_id.as_str()).collect();
        assert_eq!(order, ["a1", "a2", "a3"]);
    }

    #[test]
    fn rejects_cardinality_mismatch() {
        let answers = [answer("a1", true), answer("a2", false)];
        assert_eq!(validate(&answers, &[sub("a1", true)]).unwrap_err(), Error::CountMismatch);
        assert_eq!(validate(&answers, &[]).unwrap_err(), Error::CountMismatch);
        let too_many = [sub("a1", true), sub("a2", false), sub("a3", false)];
        assert_eq!(validate(&answers, &too_many).unwrap_err(), Error::CountMismatch);
    }

    #[test]
    fn rejects_answerless_question() {
        assert_eq!(validate(&[], &[]).unwrap_err(), Error::NoAnswers);
    }

    #[test]
    fn unmatched_submission_only_degrades_its_answer() {
        let answers = [answer("a1", true), answer("a2", false)];
        let validation = validate(&answers, &[sub("a1", true), sub("zz", false)]).unwrap();
        assert_eq!(validation.results, [result("a1", true), result("a2", false)]);
        assert_eq!(validation.score, 50.0);
    }

    #[test]
    fn score_stays_within_bounds() {
        let answers: Vec<_> = (0..7).map(|i| answer(&format!("a{i}"), i % 3 == 0)).collect();
        for mask in 0u32..(1 << answers.len()) {
            let subs: Vec<_> =
                answers.iter().enumerate().map(|(i, a)| sub(&a.id, mask & (1 << i) != 0)).collect();
            let Validation { results, score } = validate(&answers, &subs).unwrap();
            assert!((0.0..=100.0).contains(&score));
            assert_eq!(score == 100.0, results.iter().all(|result| result.is_valid));
        }
    }

    #[test]
    fn last_duplicate_submission_wins() {
        let answers = [answer("a1", true), answer("a2", false)];
        let validation = validate(&answers, &[sub("a1", false), sub("a1", true)]).unwrap();
        assert_eq!(validation.results, [result("a1", true), result("a2", false)]);
        assert_eq!(validation.score, 50.0);

        let validation = validate(&answers, &[sub("a1", true), sub("a1", false)]).unwrap();
        assert_eq!(validation.results, [result("a1", false), result("a2", false)]);
        assert_eq!(validation.score, 0.0);
    }
}
