use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};

use handle_errors::Error;

use crate::store::Store;
use crate::types::{
    category::{Category, CategoryId},
    question::{NewQuestion, Question, QuestionId},
    quiz::QuizRequest,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pub connection: PgPool,
}

impl PgStore {
    pub async fn new(db_url: &str, max_connections: u32) -> Result<Self, Error> {
        match PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_url)
            .await
        {
            Ok(pool) => Ok(PgStore { connection: pool }),
            Err(e) => {
                tracing::event!(tracing::Level::ERROR, "Cannot connect to database: {:?}", e);
                Err(Error::DatabaseQueryError(e))
            }
        }
    }

    pub async fn migrate(&self) -> Result<(), Error> {
        sqlx::migrate!()
            .run(&self.connection)
            .await
            .map_err(Error::MigrationError)
    }
}

fn question_from_row(row: PgRow) -> Question {
    Question {
        id: QuestionId(row.get("id")),
        question: row.get("question"),
        answer: row.get("answer"),
        category: CategoryId(row.get("category")),
        difficulty: row.get("difficulty"),
    }
}

/// Wrap `term` so LIKE matches it literally anywhere in the text.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn query_failed(error: sqlx::Error) -> Error {
    tracing::event!(tracing::Level::ERROR, "{:?}", error);
    Error::DatabaseQueryError(error)
}

#[async_trait]
impl Store for PgStore {
    async fn categories(&self) -> Result<Vec<Category>, Error> {
        sqlx::query("SELECT id, type FROM categories ORDER BY id")
            .map(|row: PgRow| Category {
                id: CategoryId(row.get("id")),
                kind: row.get("type"),
            })
            .fetch_all(&self.connection)
            .await
            .map_err(query_failed)
    }

    async fn questions(&self) -> Result<Vec<Question>, Error> {
        sqlx::query(
            "SELECT id, question, answer, category, difficulty
            FROM questions
            ORDER BY id",
        )
        .map(question_from_row)
        .fetch_all(&self.connection)
        .await
        .map_err(query_failed)
    }

    async fn add_question(&self, new_question: NewQuestion) -> Result<Question, Error> {
        // NOT NULL, CHECK and FOREIGN KEY constraints do the validation.
        sqlx::query(
            "INSERT INTO questions (question, answer, category, difficulty)
            VALUES ($1, $2, $3, $4)
            RETURNING id, question, answer, category, difficulty",
        )
        .bind(new_question.question)
        .bind(new_question.answer)
        .bind(new_question.category.map(|category| category.0))
        .bind(new_question.difficulty)
        .map(question_from_row)
        .fetch_one(&self.connection)
        .await
        .map_err(query_failed)
    }

    async fn delete_question(&self, question_id: QuestionId) -> Result<(), Error> {
        match sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(question_id.0)
            .execute(&self.connection)
            .await
        {
            Ok(result) if result.rows_affected() == 0 => Err(Error::QuestionNotFound(question_id.0)),
            Ok(_) => Ok(()),
            Err(error) => Err(query_failed(error)),
        }
    }

    async fn search_questions(&self, term: &str) -> Result<Vec<Question>, Error> {
        sqlx::query(
            "SELECT id, question, answer, category, difficulty
            FROM questions
            WHERE question ILIKE $1
            ORDER BY id",
        )
        .bind(like_pattern(term))
        .map(question_from_row)
        .fetch_all(&self.connection)
        .await
        .map_err(query_failed)
    }

    async fn questions_by_category(&self, category_id: CategoryId) -> Result<Vec<Question>, Error> {
        sqlx::query(
            "SELECT id, question, answer, category, difficulty
            FROM questions
            WHERE category = $1
            ORDER BY id",
        )
        .bind(category_id.0)
        .map(question_from_row)
        .fetch_all(&self.connection)
        .await
        .map_err(query_failed)
    }

    async fn quiz_candidates(&self, quiz: &QuizRequest) -> Result<Vec<Question>, Error> {
        let previous: Vec<i32> = quiz.previous_questions.iter().map(|id| id.0).collect();
        sqlx::query(
            "SELECT id, question, answer, category, difficulty
            FROM questions
            WHERE ($1::INT4 IS NULL OR category = $1)
            AND NOT (id = ANY($2))
            ORDER BY id",
        )
        .bind(quiz.category().map(|category| category.0))
        .bind(previous)
        .map(question_from_row)
        .fetch_all(&self.connection)
        .await
        .map_err(query_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("title"), "%title%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b\\c"), "%a\\_b\\\\c%");
    }
}
