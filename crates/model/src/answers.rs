//! In-memory mutations of a question's answer collection. Each operation checks
//! its preconditions before touching the collection so that a failure leaves
//! the question exactly as it was. Persisting the result is up to the caller.

use crate::{
    error::{Error, Result},
    question::{Answer, AnswerDraft, Question},
    IdGenerator,
};
use alloc::{collections::BTreeMap, vec::Vec};

impl Question {
    /// Appends a new answer with a freshly generated identifier.
    pub fn add_answer<G>(&mut self, draft: AnswerDraft, ids: &G) -> Answer
    where
        G: IdGenerator + ?Sized,
    {
        let answer = draft.into_answer(ids.generate());
        self.answers.push(answer.clone());
        answer
    }

    /// Overwrites the contents of an existing answer without moving it.
    pub fn override_answer(&mut self, answer_id: &str, draft: AnswerDraft) -> Result<&Answer> {
        if answer_id.is_empty() {
            return Err(Error::EmptyAnswerId);
        }

        let answer = self.answers.iter_mut().find(|answer| answer.id == answer_id).ok_or(Error::UnknownAnswer)?;
        let AnswerDraft { text, is_correct, explanation } = draft;
        answer.text = text;
        answer.is_correct = is_correct;
        answer.explanation = explanation;
        Ok(answer)
    }

    /// Removes the answer with the given identifier. Deleting an identifier that
    /// is not present is a no-op, in which case `None` is returned.
    pub fn delete_answer(&mut self, answer_id: &str) -> Result<Option<Answer>> {
        if self.answers.is_empty() {
            return Err(Error::NoAnswers);
        }

        let Some(index) = self.answers.iter().position(|answer| answer.id == answer_id) else {
            return Ok(None);
        };

        Ok(Some(self.answers.remove(index)))
    }

    /// Discards every existing answer and rebuilds the collection from scratch.
    /// None of the previous identifiers survive.
    pub fn put_answers<G>(&mut self, drafts: Vec<AnswerDraft>, ids: &G) -> &[Answer]
    where
        G: IdGenerator + ?Sized,
    {
        self.answers = drafts.into_iter().map(|draft| draft.into_answer(ids.generate())).collect();
        &self.answers
    }

    /// Rearranges the answers to follow `order`, which must be a permutation of
    /// the current answer identifiers.
    pub fn reorder_answers<S>(&mut self, order: &[S]) -> Result<&[Answer]>
    where
        S: AsRef<str>,
    {
        if order.len() != self.answers.len() {
            return Err(Error::CountMismatch);
        }

        let mut lookup: BTreeMap<_, _> =
            self.answers.iter().enumerate().map(|(index, answer)| (answer.id.as_str(), index)).collect();

        // Removing from the lookup rejects repeated identifiers as well as unknown ones.
        let positions = order
            .iter()
            .map(|id| lookup.remove(id.as_ref()).ok_or(Error::NotPermutation))
            .collect::<Result<Vec<_>>>()?;
        drop(lookup);

        let mut slots: Vec<_> = core::mem::take(&mut self.answers).into_iter().map(Some).collect();
        self.answers = positions.into_iter().filter_map(|index| slots[index].take()).collect();
        Ok(&self.answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::QuestionDraft;
    use core::cell::Cell;

    struct Counter(Cell<u32>);

    impl IdGenerator for Counter {
        fn generate(&self) -> String {
            let next = self.0.get() + 1;
            self.0.set(next);
            format!("n{next}")
        }
    }

    fn answer(id: &str, is_correct: bool) -> Answer {
        Answer { id: id.into(), text: id.to_uppercase(), is_correct, explanation: None }
    }

    fn question(answers: Vec<Answer>) -> Question {
        let mut question = QuestionDraft {
            quiz_id: "quiz".into(),
            question: "Pick one".into(),
            difficulty: Default::default(),
            order: 0.0,
            hint: None,
            answers: Vec::new(),
        }
        .into_question(&|| String::new());
        question.id = "q".into();
        question.answers = answers;
        question
    }

    fn ids(question: &Question) -> Vec<&str> {
        question.answers.iter().map(|answer| answer.id.as_str()).collect()
    }

    fn draft(text: &str, is_correct: bool) -> AnswerDraft {
        AnswerDraft { text: text.into(), is_correct, explanation: None }
    }

    #[test]
    fn add_appends_with_fresh_id() {
        let counter = Counter(Cell::new(0));
        let mut q = question(vec![answer("a1", true)]);
        let added = q.add_answer(draft("Venus", false), &counter);
        assert_eq!(added.id, "n1");
        assert_eq!(ids(&q), ["a1", "n1"]);
        assert_eq!(q.answers[1], added);

        q.add_answer(draft("Mars", false), &counter);
        assert_eq!(ids(&q), ["a1", "n1", "n2"]);
    }

    #[test]
    fn override_preserves_position() {
        let mut q = question(vec![answer("a1", true), answer("a2", false)]);
        let draft = AnswerDraft { text: "X".into(), is_correct: true, explanation: Some("E".into()) };
        let updated = q.override_answer("a2", draft).unwrap().clone();

        assert_eq!(updated, Answer { id: "a2".into(), text: "X".into(), is_correct: true, explanation: Some("E".into()) });
        assert_eq!(q.answers[0], answer("a1", true));
        assert_eq!(q.answers[1], updated);
    }

    #[test]
    fn override_rejects_empty_and_unknown_ids() {
        let mut q = question(vec![answer("a1", true), answer("a2", false)]);
        assert_eq!(q.override_answer("", draft("X", true)).unwrap_err(), Error::EmptyAnswerId);
        assert_eq!(q.override_answer("a3", draft("X", true)).unwrap_err(), Error::UnknownAnswer);
        assert_eq!(q.answers, [answer("a1", true), answer("a2", false)]);

        let mut empty = question(Vec::new());
        assert_eq!(empty.override_answer("a1", draft("X", true)).unwrap_err(), Error::UnknownAnswer);
    }

    #[test]
    fn delete_is_idempotent() {
        let mut q = question(vec![answer("a1", true), answer("a2", false)]);
        assert_eq!(q.delete_answer("a1").unwrap(), Some(answer("a1", true)));
        assert_eq!(ids(&q), ["a2"]);
        assert_eq!(q.delete_answer("a1").unwrap(), None);
        assert_eq!(ids(&q), ["a2"]);
    }

    #[test]
    fn delete_requires_answers() {
        let mut q = question(Vec::new());
        assert_eq!(q.delete_answer("a1").unwrap_err(), Error::NoAnswers);
    }

    #[test]
    fn put_is_destructive() {
        let counter = Counter(Cell::new(0));
        let mut q = question(vec![answer("a1", true), answer("a2", false)]);
        let answers = q.put_answers(vec![draft("A", false), draft("B", true), draft("C", false)], &counter);
        assert_eq!(answers.len(), 3);
        assert_eq!(ids(&q), ["n1", "n2", "n3"]);
        assert!(q.answers[1].is_correct);
        assert!(!ids(&q).iter().any(|id| *id == "a1" || *id == "a2"));

        q.put_answers(Vec::new(), &counter);
        assert!(q.answers.is_empty());
    }

    #[test]
    fn reorder_follows_given_permutation() {
        let mut q = question(vec![answer("a1", true), answer("a2", false), answer("a3", false)]);
        let answers = q.reorder_answers(&["a3", "a1", "a2"]).unwrap();
        assert_eq!(answers[0], answer("a3", false));
        assert_eq!(ids(&q), ["a3", "a1", "a2"]);
    }

    #[test]
    fn reorder_rejects_length_mismatch() {
        let mut q = question(vec![answer("a1", true), answer("a2", false)]);
        assert_eq!(q.reorder_answers(&["a1"]).unwrap_err(), Error::CountMismatch);
        assert_eq!(q.reorder_answers(&["a1", "a2", "a1"]).unwrap_err(), Error::CountMismatch);
        assert_eq!(ids(&q), ["a1", "a2"]);
    }

    #[test]
    fn reorder_rejects_non_permutations() {
        let mut q = question(vec![answer("a1", true), answer("a2", false)]);
        assert_eq!(q.reorder_answers(&["a1", "a1"]).unwrap_err(), Error::NotPermutation);
        assert_eq!(q.reorder_answers(&["a1", "zz"]).unwrap_err(), Error::NotPermutation);
        assert_eq!(ids(&q), ["a1", "a2"]);
    }

    #[test]
    fn reorder_of_empty_collection_is_trivial() {
        let mut q = question(Vec::new());
        let order: [&str; 0] = [];
        assert!(q.reorder_answers(&order).unwrap().is_empty());
    }
}
