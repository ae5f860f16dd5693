pub mod error;
pub mod reply;
pub mod router;

use db::{QuestionRepo, QuizRepo};
use error::{Error, Result};
use model::{
    score, AnswerDraft, IdGenerator, Pagination, Placement, Question, QuestionDraft, QuestionPatch, Quiz, QuizDraft,
    QuizPatch, Reorder, Submission,
};
use reply::{AnswerReply, DeletedAnswer, ReorderedAnswers, ValidationReply};

/// Identifier source backed by random (version 4) UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomId;

impl IdGenerator for RandomId {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Use-case layer over a repository. Every answer operation fetches the current
/// question, transforms it in memory, and persists it with exactly one update.
pub struct Service<R, G = RandomId> {
    repo: R,
    ids: G,
}

impl<R, G> Service<R, G> {
    pub const fn new(repo: R, ids: G) -> Self {
        Self { repo, ids }
    }
}

impl<R, G> Service<R, G>
where
    R: QuizRepo + QuestionRepo,
    G: IdGenerator,
{
    pub async fn create_quiz(&self, draft: QuizDraft) -> Result<Quiz> {
        if draft.user_id.is_empty() {
            return Err(Error::InvalidInput("A quiz must have an owner."));
        }
        if draft.title.is_empty() {
            return Err(Error::InvalidInput("A quiz must have a title."));
        }
        let quiz = self.repo.save_quiz(&Quiz::from(draft)).await?;
        log::info!("created quiz {}", quiz.id);
        Ok(quiz)
    }

    pub async fn get_quiz(&self, id: &str) -> Result<Quiz> {
        Ok(self.repo.get_quiz(id).await?)
    }

    pub async fn list_quizzes(&self, page: Pagination) -> Result<Vec<Quiz>> {
        Ok(self.repo.list_quizzes(page).await?)
    }

    pub async fn search_quizzes(&self, keyword: &str, page: Pagination) -> Result<Vec<Quiz>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(Error::InvalidInput("The search keyword must not be empty."));
        }
        Ok(self.repo.search_quizzes(keyword, page).await?)
    }

    pub async fn update_quiz(&self, id: &str, patch: QuizPatch) -> Result<Quiz> {
        let mut quiz = self.repo.get_quiz(id).await?;
        patch.apply(&mut quiz);
        if quiz.title.is_empty() {
            return Err(Error::InvalidInput("A quiz must have a title."));
        }
        Ok(self.repo.update_quiz(&quiz).await?)
    }

    pub async fn delete_quiz(&self, id: &str) -> Result<Quiz> {
        let quiz = self.repo.delete_quiz(id).await?;
        log::info!("deleted quiz {id}");
        Ok(quiz)
    }

    pub async fn create_question(&self, draft: QuestionDraft) -> Result<Question> {
        if draft.question.is_empty() {
            return Err(Error::InvalidInput("A question must have some text."));
        }

        // Questions never outlive their quiz
        self.repo.get_quiz(&draft.quiz_id).await?;
        let question = draft.into_question(&self.ids);
        Ok(self.repo.save_question(&question).await?)
    }

    pub async fn get_question(&self, id: &str) -> Result<Question> {
        Ok(self.repo.get_question(id).await?)
    }

    pub async fn list_questions(&self, quiz_id: &str, page: Pagination) -> Result<Vec<Question>> {
        Ok(self.repo.list_questions(quiz_id, page).await?)
    }

    pub async fn update_question(&self, id: &str, patch: QuestionPatch) -> Result<Question> {
        let mut question = self.repo.get_question(id).await?;
        patch.apply(&mut question);
        if question.question.is_empty() {
            return Err(Error::InvalidInput("A question must have some text."));
        }
        Ok(self.repo.update_question(&question).await?)
    }

    pub async fn delete_question(&self, id: &str) -> Result<Question> {
        Ok(self.repo.delete_question(id).await?)
    }

    /// Moves a question among the other questions of its quiz. Usually only the
    /// moved question is written back. When its new neighbours share an order,
    /// every sibling whose order changes is written back one at a time.
    pub async fn reorder_question(&self, id: &str, placement: &Placement) -> Result<Question> {
        let mut question = self.repo.get_question(id).await?;
        let siblings = self.repo.questions_of(&question.quiz_id).await?;
        match model::reorder::place(&question, &siblings, placement)? {
            Reorder::Moved(order) => question.order = order,
            Reorder::Respaced(orders) => {
                for (sibling_id, order) in orders {
                    if sibling_id == question.id {
                        question.order = order;
                        continue;
                    }
                    let Some(sibling) = siblings.iter().find(|sibling| sibling.id == sibling_id) else {
                        continue;
                    };
                    if sibling.order != order {
                        let mut sibling = sibling.clone();
                        sibling.order = order;
                        self.repo.update_question(&sibling).await?;
                    }
                }
            }
        }
        Ok(self.repo.update_question(&question).await?)
    }

    /// Scores the submissions against the stored answers. Nothing is persisted.
    pub async fn validate_answers(&self, question_id: &str, submissions: &[Submission]) -> Result<ValidationReply> {
        let question = self.repo.get_question(question_id).await?;
        if question.answers.is_empty() {
            return Err(Error::InvalidInput("This question has no answers to validate against."));
        }
        let score::Validation { results, score } = score::validate(&question.answers, submissions)?;
        Ok(ValidationReply { question_id: question.id, results, score })
    }

    pub async fn add_answer(&self, question_id: &str, draft: AnswerDraft) -> Result<model::Answer> {
        let mut question = self.repo.get_question(question_id).await?;
        let answer = question.add_answer(draft, &self.ids);
        self.repo.update_question(&question).await?;
        Ok(answer)
    }

    pub async fn override_answer(&self, question_id: &str, answer_id: &str, draft: AnswerDraft) -> Result<AnswerReply> {
        let mut question = self.repo.get_question(question_id).await?;
        let answer = question.override_answer(answer_id, draft)?.clone();
        let Question { id, quiz_id, .. } = self.repo.update_question(&question).await?;
        Ok(AnswerReply { question_id: id, quiz_id, answer })
    }

    /// Deleting an answer that is already gone succeeds without writing anything.
    pub async fn delete_answer(&self, question_id: &str, answer_id: &str) -> Result<DeletedAnswer> {
        let mut question = self.repo.get_question(question_id).await?;
        if question.delete_answer(answer_id)?.is_some() {
            self.repo.update_question(&question).await?;
        }
        let Question { id, quiz_id, .. } = question;
        Ok(DeletedAnswer { question_id: id, quiz_id, answer_id: answer_id.into() })
    }

    pub async fn put_answers(&self, question_id: &str, drafts: Vec<AnswerDraft>) -> Result<Vec<model::Answer>> {
        let mut question = self.repo.get_question(question_id).await?;
        question.put_answers(drafts, &self.ids);
        let Question { answers, .. } = self.repo.update_question(&question).await?;
        Ok(answers)
    }

    pub async fn reorder_answers(&self, question_id: &str, order: &[String]) -> Result<ReorderedAnswers> {
        let mut question = self.repo.get_question(question_id).await?;
        question.reorder_answers(order)?;
        let Question { id, answers, .. } = self.repo.update_question(&question).await?;
        Ok(ReorderedAnswers { question_id: id, answers })
    }
}
