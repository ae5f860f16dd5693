#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;
pub mod memory;
pub mod repo;

use alloc::{string::String, vec::Vec};
use error::Error;
use futures_util::TryStreamExt;
use model::{Audit, Difficulty, Pagination, Question, Quiz};
use tokio_postgres::{
    error::SqlState,
    types::{Json, ToSql},
    Row,
};

pub use memory::Memory;
pub use repo::{QuestionRepo, QuizRepo};
pub use tokio_postgres::{tls::NoTls, Client, Config};

pub struct Database(Client);

impl From<Client> for Database {
    fn from(client: Client) -> Self {
        Self(client)
    }
}

fn classify(err: tokio_postgres::Error) -> Error {
    let Some(db) = err.as_db_error() else {
        log::error!("database request failed: {err}");
        return Error::Fatal;
    };

    match db.code() {
        // A named check constraint rejected the values.
        &SqlState::CHECK_VIOLATION => Error::BadInput,
        // The referenced parent quiz does not exist.
        &SqlState::FOREIGN_KEY_VIOLATION => Error::NotFound,
        _ => {
            log::error!("database rejected the request: {db}");
            Error::Fatal
        }
    }
}

fn deserialize_audit_from_row(row: &Row) -> Result<Audit, tokio_postgres::Error> {
    Ok(Audit {
        created_by: row.try_get("created_by")?,
        updated_by: row.try_get("updated_by")?,
        deleted_by: row.try_get("deleted_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        deleted_at: row.try_get("deleted_at")?,
    })
}

fn deserialize_raw_quiz_from_row(row: &Row) -> Result<Quiz, tokio_postgres::Error> {
    let duration: Option<i64> = row.try_get("duration")?;
    let tags: Vec<String> = row.try_get("tags")?;
    let Json(metadata) = row.try_get("metadata")?;
    Ok(Quiz {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        // The `quiz_duration_check` constraint keeps this non-negative.
        duration: duration.map(|secs| secs as u64),
        thumbnail: row.try_get("thumbnail")?,
        cover: row.try_get("cover")?,
        category: row.try_get("category")?,
        tags: tags.into_iter().collect(),
        metadata,
        audit: deserialize_audit_from_row(row)?,
    })
}

fn deserialize_quiz_from_row(row: Row) -> error::Result<Quiz> {
    deserialize_raw_quiz_from_row(&row).map_err(|err| {
        log::error!("malformed quiz row: {err}");
        Error::Fatal
    })
}

fn deserialize_raw_question_from_row(row: &Row, difficulty: Difficulty) -> Result<Question, tokio_postgres::Error> {
    let Json(answers) = row.try_get("answers")?;
    Ok(Question {
        id: row.try_get("id")?,
        quiz_id: row.try_get("quiz_id")?,
        question: row.try_get("question")?,
        difficulty,
        order: row.try_get("ord")?,
        hint: row.try_get("hint")?,
        answers,
        audit: deserialize_audit_from_row(row)?,
    })
}

fn deserialize_question_from_row(row: Row) -> error::Result<Question> {
    let level: i16 = row.try_get("difficulty").map_err(|_| Error::Fatal)?;
    let difficulty = Difficulty::try_from(level).map_err(|_| Error::Fatal)?;
    deserialize_raw_question_from_row(&row, difficulty).map_err(|err| {
        log::error!("malformed question row: {err}");
        Error::Fatal
    })
}

fn limit_and_offset(page: Pagination) -> error::Result<(i64, i64)> {
    let offset = i64::try_from(page.offset()).map_err(|_| Error::BadInput)?;
    Ok((page.size.into(), offset))
}

fn escape_like(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

impl QuizRepo for Database {
    async fn save_quiz(&self, quiz: &Quiz) -> error::Result<Quiz> {
        let now = timestamp()?;
        let duration = quiz.duration.map(i64::try_from).transpose().map_err(|_| Error::BadInput)?;
        let tags: Vec<_> = quiz.tags.iter().map(String::as_str).collect();
        let row = self
            .0
            .query_opt(
                "INSERT INTO quiz (user_id, title, description, duration, thumbnail, cover, category, tags, metadata, \
                 created_by, updated_by, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $1, $1, $10, $10) RETURNING *",
                &[
                    &quiz.user_id,
                    &quiz.title,
                    &quiz.description,
                    &duration,
                    &quiz.thumbnail,
                    &quiz.cover,
                    &quiz.category,
                    &tags,
                    &Json(&quiz.metadata),
                    &now,
                ],
            )
            .await
            .map_err(classify)?
            // The store must hand back the row with its generated identifier.
            .ok_or(Error::Fatal)?;
        deserialize_quiz_from_row(row)
    }

    async fn get_quiz(&self, id: &str) -> error::Result<Quiz> {
        let row = self
            .0
            .query_opt("SELECT * FROM quiz WHERE id = $1", &[&id])
            .await
            .map_err(classify)?
            .ok_or(Error::NotFound)?;
        deserialize_quiz_from_row(row)
    }

    async fn list_quizzes(&self, page: Pagination) -> error::Result<Vec<Quiz>> {
        let (limit, offset) = limit_and_offset(page)?;
        self.0
            .query_raw("SELECT * FROM quiz ORDER BY created_at, id LIMIT $1 OFFSET $2", &[&limit, &offset])
            .await
            .map_err(classify)?
            .map_err(classify)
            .and_then(|row| core::future::ready(deserialize_quiz_from_row(row)))
            .try_collect()
            .await
    }

    async fn update_quiz(&self, quiz: &Quiz) -> error::Result<Quiz> {
        let now = timestamp()?;
        let duration = quiz.duration.map(i64::try_from).transpose().map_err(|_| Error::BadInput)?;
        let tags: Vec<_> = quiz.tags.iter().map(String::as_str).collect();
        let row = self
            .0
            .query_opt(
                "UPDATE quiz SET title = $2, description = $3, duration = $4, thumbnail = $5, cover = $6, \
                 category = $7, tags = $8, metadata = $9, updated_at = $10 WHERE id = $1 RETURNING *",
                &[
                    &quiz.id,
                    &quiz.title,
                    &quiz.description,
                    &duration,
                    &quiz.thumbnail,
                    &quiz.cover,
                    &quiz.category,
                    &tags,
                    &Json(&quiz.metadata),
                    &now,
                ],
            )
            .await
            .map_err(classify)?
            .ok_or(Error::NotFound)?;
        deserialize_quiz_from_row(row)
    }

    async fn delete_quiz(&self, id: &str) -> error::Result<Quiz> {
        let row = self
            .0
            .query_opt("DELETE FROM quiz WHERE id = $1 RETURNING *", &[&id])
            .await
            .map_err(classify)?
            .ok_or(Error::NotFound)?;
        deserialize_quiz_from_row(row)
    }

    async fn search_quizzes(&self, keyword: &str, page: Pagination) -> error::Result<Vec<Quiz>> {
        let (limit, offset) = limit_and_offset(page)?;
        let pattern = escape_like(keyword);
        let rows = self
            .0
            .query(
                "SELECT * FROM quiz WHERE title ILIKE $1 OR description ILIKE $1 \
                 ORDER BY created_at, id LIMIT $2 OFFSET $3",
                &[&pattern, &limit, &offset],
            )
            .await
            .map_err(classify)?;
        rows.into_iter().map(deserialize_quiz_from_row).collect()
    }
}

impl QuestionRepo for Database {
    async fn save_question(&self, question: &Question) -> error::Result<Question> {
        let now = timestamp()?;
        let difficulty = i16::from(question.difficulty);
        let row = self
            .0
            .query_opt(
                "INSERT INTO question (quiz_id, question, difficulty, ord, hint, answers, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $7) RETURNING *",
                &[
                    &question.quiz_id,
                    &question.question,
                    &difficulty,
                    &question.order,
                    &question.hint,
                    &Json(&question.answers),
                    &now,
                ],
            )
            .await
            .map_err(classify)?
            .ok_or(Error::Fatal)?;
        deserialize_question_from_row(row)
    }

    async fn get_question(&self, id: &str) -> error::Result<Question> {
        let row = self
            .0
            .query_opt("SELECT * FROM question WHERE id = $1", &[&id])
            .await
            .map_err(classify)?
            .ok_or(Error::NotFound)?;
        deserialize_question_from_row(row)
    }

    async fn list_questions(&self, quiz_id: &str, page: Pagination) -> error::Result<Vec<Question>> {
        let (limit, offset) = limit_and_offset(page)?;
        let params: [&(dyn ToSql + Sync); 3] = [&quiz_id, &limit, &offset];
        let rows = self
            .0
            .query("SELECT * FROM question WHERE quiz_id = $1 ORDER BY ord, id LIMIT $2 OFFSET $3", &params)
            .await
            .map_err(classify)?;
        rows.into_iter().map(deserialize_question_from_row).collect()
    }

    async fn questions_of(&self, quiz_id: &str) -> error::Result<Vec<Question>> {
        self.0
            .query_raw("SELECT * FROM question WHERE quiz_id = $1 ORDER BY ord, id", &[&quiz_id])
            .await
            .map_err(classify)?
            .map_err(classify)
            .and_then(|row| core::future::ready(deserialize_question_from_row(row)))
            .try_collect()
            .await
    }

    async fn update_question(&self, question: &Question) -> error::Result<Question> {
        let now = timestamp()?;
        let difficulty = i16::from(question.difficulty);
        let row = self
            .0
            .query_opt(
                "UPDATE question SET question = $2, difficulty = $3, ord = $4, hint = $5, answers = $6, \
                 updated_at = $7 WHERE id = $1 RETURNING *",
                &[
                    &question.id,
                    &question.question,
                    &difficulty,
                    &question.order,
                    &question.hint,
                    &Json(&question.answers),
                    &now,
                ],
            )
            .await
            .map_err(classify)?
            .ok_or(Error::NotFound)?;
        deserialize_question_from_row(row)
    }

    async fn delete_question(&self, id: &str) -> error::Result<Question> {
        let row = self
            .0
            .query_opt("DELETE FROM question WHERE id = $1 RETURNING *", &[&id])
            .await
            .map_err(classify)?
            .ok_or(Error::NotFound)?;
        deserialize_question_from_row(row)
    }
}

/// Renders the current time the way the stores record audit timestamps.
pub(crate) fn timestamp() -> error::Result<String> {
    use time::{format_description::well_known::Rfc3339, OffsetDateTime};
    OffsetDateTime::now_utc().format(&Rfc3339).map_err(|err| {
        log::error!("cannot format timestamp: {err}");
        Error::Fatal
    })
}

/// Generates monotonically increasing identifiers shaped like document IDs.
pub(crate) fn document_id(seq: u64) -> String {
    alloc::format!("{seq:024x}")
}
