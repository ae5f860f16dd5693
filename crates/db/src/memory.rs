//! Process-local store with the same observable behavior as [`Database`](crate::Database),
//! down to the RFC 3339 audit timestamps. Handy for tests and for running the
//! service without PostgreSQL.

use crate::{
    document_id,
    error::{Error, Result},
    repo::{QuestionRepo, QuizRepo},
    timestamp,
};
use alloc::{string::String, vec::Vec};
use core::sync::atomic::{AtomicU64, Ordering};
use dashmap::DashMap;
use model::{Pagination, Question, Quiz};

#[derive(Default)]
pub struct Memory {
    quizzes: DashMap<String, Quiz>,
    questions: DashMap<String, Question>,
    seq: AtomicU64,
}

impl Memory {
    fn next_id(&self) -> String {
        document_id(self.seq.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

fn paginate<T>(items: Vec<T>, page: Pagination) -> Vec<T> {
    let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    items.into_iter().skip(skip).take(page.size as usize).collect()
}

impl QuizRepo for Memory {
    async fn save_quiz(&self, quiz: &Quiz) -> Result<Quiz> {
        if quiz.title.is_empty() {
            return Err(Error::BadInput);
        }

        let now = timestamp()?;
        let mut quiz = quiz.clone();
        quiz.id = self.next_id();
        quiz.audit.created_by = quiz.user_id.clone();
        quiz.audit.updated_by = quiz.user_id.clone();
        quiz.audit.created_at = now.clone();
        quiz.audit.updated_at = now;
        self.quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn get_quiz(&self, id: &str) -> Result<Quiz> {
        self.quizzes.get(id).map(|quiz| quiz.clone()).ok_or(Error::NotFound)
    }

    async fn list_quizzes(&self, page: Pagination) -> Result<Vec<Quiz>> {
        let mut quizzes: Vec<_> = self.quizzes.iter().map(|quiz| quiz.clone()).collect();
        quizzes.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(paginate(quizzes, page))
    }

    async fn update_quiz(&self, quiz: &Quiz) -> Result<Quiz> {
        if quiz.title.is_empty() {
            return Err(Error::BadInput);
        }

        let now = timestamp()?;
        let mut stored = self.quizzes.get_mut(&quiz.id).ok_or(Error::NotFound)?;
        let user_id = core::mem::take(&mut stored.user_id);
        let audit = core::mem::take(&mut stored.audit);
        *stored = quiz.clone();
        stored.user_id = user_id;
        stored.audit = audit;
        stored.audit.updated_at = now;
        Ok(stored.clone())
    }

    async fn delete_quiz(&self, id: &str) -> Result<Quiz> {
        let (_, quiz) = self.quizzes.remove(id).ok_or(Error::NotFound)?;
        self.questions.retain(|_, question| question.quiz_id != id);
        Ok(quiz)
    }

    async fn search_quizzes(&self, keyword: &str, page: Pagination) -> Result<Vec<Quiz>> {
        let keyword = keyword.to_lowercase();
        let mut quizzes: Vec<_> = self
            .quizzes
            .iter()
            .filter(|quiz| {
                quiz.title.to_lowercase().contains(&keyword) || quiz.description.to_lowercase().contains(&keyword)
            })
            .map(|quiz| quiz.clone())
            .collect();
        quizzes.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(paginate(quizzes, page))
    }
}

impl Memory {
    fn sorted_questions_of(&self, quiz_id: &str) -> Vec<Question> {
        let mut questions: Vec<_> = self
            .questions
            .iter()
            .filter(|question| question.quiz_id == quiz_id)
            .map(|question| question.clone())
            .collect();
        questions.sort_by(|a, b| a.order.total_cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        questions
    }
}

impl QuestionRepo for Memory {
    async fn save_question(&self, question: &Question) -> Result<Question> {
        if question.question.is_empty() {
            return Err(Error::BadInput);
        }

        // Holding the parent's shard keeps `delete_quiz` from removing it until
        // the question is in place for its cascade to find.
        let parent = self.quizzes.get(&question.quiz_id).ok_or(Error::NotFound)?;
        let now = timestamp()?;
        let mut question = question.clone();
        question.id = self.next_id();
        question.audit.created_at = now.clone();
        question.audit.updated_at = now;
        self.questions.insert(question.id.clone(), question.clone());
        drop(parent);
        Ok(question)
    }

    async fn get_question(&self, id: &str) -> Result<Question> {
        self.questions.get(id).map(|question| question.clone()).ok_or(Error::NotFound)
    }

    async fn list_questions(&self, quiz_id: &str, page: Pagination) -> Result<Vec<Question>> {
        Ok(paginate(self.sorted_questions_of(quiz_id), page))
    }

    async fn questions_of(&self, quiz_id: &str) -> Result<Vec<Question>> {
        Ok(self.sorted_questions_of(quiz_id))
    }

    async fn update_question(&self, question: &Question) -> Result<Question> {
        if question.question.is_empty() {
            return Err(Error::BadInput);
        }

        let now = timestamp()?;
        let mut stored = self.questions.get_mut(&question.id).ok_or(Error::NotFound)?;
        let quiz_id = core::mem::take(&mut stored.quiz_id);
        let audit = core::mem::take(&mut stored.audit);
        *stored = question.clone();
        stored.quiz_id = quiz_id;
        stored.audit = audit;
        stored.audit.updated_at = now;
        Ok(stored.clone())
    }

    async fn delete_question(&self, id: &str) -> Result<Question> {
        self.questions.remove(id).map(|(_, question)| question).ok_or(Error::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{AnswerDraft, QuestionDraft, QuizDraft};

    fn quiz_draft(title: &str, description: &str) -> Quiz {
        Quiz::from(QuizDraft {
            user_id: "u1".into(),
            title: title.into(),
            description: description.into(),
            duration: None,
            thumbnail: None,
            cover: None,
            category: None,
            tags: Default::default(),
            metadata: Default::default(),
        })
    }

    fn question_draft(quiz_id: &str, text: &str, order: f64) -> Question {
        QuestionDraft {
            quiz_id: quiz_id.into(),
            question: text.into(),
            difficulty: Default::default(),
            order,
            hint: None,
            answers: vec![AnswerDraft { text: "Yes".into(), is_correct: true, explanation: None }],
        }
        .into_question(&|| String::from("a1"))
    }

    #[tokio::test(flavor = "current_thread")]
    async fn quizzes_round_trip_through_the_store() {
        let store = Memory::default();
        let first = store.save_quiz(&quiz_draft("Planets", "Rocky and gassy")).await.unwrap();
        let second = store.save_quiz(&quiz_draft("Moons", "Natural satellites")).await.unwrap();
        assert_ne!(first.id, second.id);
        assert!(!first.audit.created_at.is_empty());
        assert_eq!(first.audit.created_by, "u1");
        assert_eq!(store.get_quiz(&first.id).await.unwrap(), first);

        let page = store.list_quizzes(Pagination { page: 0, size: 1 }).await.unwrap();
        assert_eq!(page, [first.clone()]);
        let page = store.list_quizzes(Pagination { page: 1, size: 1 }).await.unwrap();
        assert_eq!(page, [second.clone()]);
        assert!(store.list_quizzes(Pagination { page: 2, size: 1 }).await.unwrap().is_empty());

        let mut changed = first.clone();
        changed.title = "Dwarf Planets".into();
        changed.audit = Default::default();
        let updated = store.update_quiz(&changed).await.unwrap();
        assert_eq!(updated.title, "Dwarf Planets");
        assert_eq!(updated.audit.created_at, first.audit.created_at);
        assert_eq!(updated.audit.created_by, "u1");

        assert_eq!(store.save_quiz(&quiz_draft("", "")).await.unwrap_err(), Error::BadInput);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn missing_entities_are_reported() {
        let store = Memory::default();
        assert_eq!(store.get_quiz("nope").await.unwrap_err(), Error::NotFound);
        assert_eq!(store.delete_quiz("nope").await.unwrap_err(), Error::NotFound);
        assert_eq!(store.get_question("nope").await.unwrap_err(), Error::NotFound);
        assert_eq!(store.delete_question("nope").await.unwrap_err(), Error::NotFound);

        let mut ghost = question_draft("nope", "Hello?", 0.0);
        assert_eq!(store.save_question(&ghost).await.unwrap_err(), Error::NotFound);
        ghost.id = "nope".into();
        assert_eq!(store.update_question(&ghost).await.unwrap_err(), Error::NotFound);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn questions_are_listed_by_order() {
        let store = Memory::default();
        let quiz = store.save_quiz(&quiz_draft("Planets", "")).await.unwrap();
        let late = store.save_question(&question_draft(&quiz.id, "Late", 3.0)).await.unwrap();
        let early = store.save_question(&question_draft(&quiz.id, "Early", 1.0)).await.unwrap();
        let middle = store.save_question(&question_draft(&quiz.id, "Middle", 2.0)).await.unwrap();

        let all = store.questions_of(&quiz.id).await.unwrap();
        let ids: Vec<_> = all.iter().map(|question| question.id.as_str()).collect();
        assert_eq!(ids, [early.id.as_str(), middle.id.as_str(), late.id.as_str()]);

        let page = store.list_questions(&quiz.id, Pagination { page: 1, size: 2 }).await.unwrap();
        assert_eq!(page, [late.clone()]);
        assert!(store.list_questions("other", Pagination::default()).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn updates_keep_parent_and_audit() {
        let store = Memory::default();
        let quiz = store.save_quiz(&quiz_draft("Planets", "")).await.unwrap();
        let question = store.save_question(&question_draft(&quiz.id, "Hello?", 0.0)).await.unwrap();

        let mut changed = question.clone();
        changed.quiz_id = "elsewhere".into();
        changed.answers.clear();
        let updated = store.update_question(&changed).await.unwrap();
        assert_eq!(updated.quiz_id, quiz.id);
        assert!(updated.answers.is_empty());
        assert_eq!(updated.audit.created_at, question.audit.created_at);
        assert_eq!(store.get_question(&question.id).await.unwrap(), updated);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn deleting_a_quiz_cascades() {
        let store = Memory::default();
        let quiz = store.save_quiz(&quiz_draft("Planets", "")).await.unwrap();
        let question = store.save_question(&question_draft(&quiz.id, "Hello?", 0.0)).await.unwrap();

        let removed = store.delete_quiz(&quiz.id).await.unwrap();
        assert_eq!(removed.id, quiz.id);
        assert_eq!(store.get_question(&question.id).await.unwrap_err(), Error::NotFound);

        let orphan = question_draft(&quiz.id, "Still there?", 1.0);
        assert_eq!(store.save_question(&orphan).await.unwrap_err(), Error::NotFound);
        assert!(store.questions_of(&quiz.id).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn search_ignores_case() {
        let store = Memory::default();
        let planets = store.save_quiz(&quiz_draft("Planets", "Rocky and gassy")).await.unwrap();
        let moons = store.save_quiz(&quiz_draft("Moons", "Orbiting PLANETS")).await.unwrap();
        store.save_quiz(&quiz_draft("Stars", "Hot")).await.unwrap();

        let found = store.search_quizzes("planets", Pagination::default()).await.unwrap();
        assert_eq!(found, [planets, moons]);
        assert!(store.search_quizzes("comet", Pagination::default()).await.unwrap().is_empty());
    }
}
