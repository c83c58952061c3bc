use async_trait::async_trait;

use handle_errors::Error;

use crate::types::{
    category::{Category, CategoryId},
    question::{NewQuestion, Question, QuestionId},
    quiz::QuizRequest,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage behind the routes. Every listing is ordered by id.
#[async_trait]
pub trait Store: Clone + Send + Sync + std::fmt::Debug + 'static {
    async fn categories(&self) -> Result<Vec<Category>, Error>;

    async fn questions(&self) -> Result<Vec<Question>, Error>;

    async fn add_question(&self, new_question: NewQuestion) -> Result<Question, Error>;

    /// Fails with `QuestionNotFound` when nothing was deleted.
    async fn delete_question(&self, question_id: QuestionId) -> Result<(), Error>;

    /// Case-insensitive substring match on the question text.
    async fn search_questions(&self, term: &str) -> Result<Vec<Question>, Error>;

    async fn questions_by_category(&self, category_id: CategoryId) -> Result<Vec<Question>, Error>;

    /// Questions a quiz may still draw from.
    async fn quiz_candidates(&self, quiz: &QuizRequest) -> Result<Vec<Question>, Error>;
}
