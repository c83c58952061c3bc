use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use handle_errors::Error;

use crate::store::Store;
use crate::types::{
    category::{Category, CategoryId, stock_categories},
    question::{NewQuestion, Question, QuestionId},
    quiz::QuizRequest,
};

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<CategoryId, Category>,
    questions: BTreeMap<QuestionId, Question>,
    /// `None` once the id space is used up.
    next_id: Option<i32>,
}

/// Layout of a seed file.
#[derive(Deserialize, Debug)]
struct Seed {
    categories: Vec<Category>,
    #[serde(default)]
    questions: Vec<Question>,
}

/// In-process store that enforces the same constraints as the SQL schema.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new(stock_categories(), Vec::new())
    }
}

impl MemoryStore {
    pub fn new(categories: Vec<Category>, questions: Vec<Question>) -> Self {
        let next_id = questions.iter().map(|q| q.id.0).max().unwrap_or(0).checked_add(1);
        let tables = Tables {
            categories: categories.into_iter().map(|c| (c.id, c)).collect(),
            questions: questions.into_iter().map(|q| (q.id, q)).collect(),
            next_id,
        };
        MemoryStore {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    /// Load categories and questions from a JSON seed file.
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = std::fs::read_to_string(path).map_err(|e| {
            Error::StorageUnavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        let seed: Seed = serde_json::from_str(&file).map_err(|e| {
            Error::StorageUnavailable(format!("cannot parse {}: {}", path.display(), e))
        })?;
        Ok(MemoryStore::new(seed.categories, seed.questions))
    }

    async fn filtered<F>(&self, keep: F) -> Vec<Question>
    where
        F: Fn(&Question) -> bool + Send,
    {
        self.tables
            .read()
            .await
            .questions
            .values()
            .filter(|question| keep(question))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn categories(&self) -> Result<Vec<Category>, Error> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn questions(&self) -> Result<Vec<Question>, Error> {
        Ok(self.filtered(|_| true).await)
    }

    async fn add_question(&self, new_question: NewQuestion) -> Result<Question, Error> {
        let mut tables = self.tables.write().await;

        let question = new_question.question.ok_or(Error::MissingField("question"))?;
        if question.is_empty() {
            return Err(Error::EmptyQuestion);
        }
        let answer = new_question.answer.ok_or(Error::MissingField("answer"))?;
        let category = new_question.category.ok_or(Error::MissingField("category"))?;
        if !tables.categories.contains_key(&category) {
            return Err(Error::UnknownCategory(category.0));
        }
        let difficulty = new_question
            .difficulty
            .ok_or(Error::MissingField("difficulty"))?;

        let id = tables
            .next_id
            .map(QuestionId)
            .ok_or_else(|| Error::StorageUnavailable("question ids exhausted".to_string()))?;
        tables.next_id = id.0.checked_add(1);
        let question = Question {
            id,
            question,
            answer,
            category,
            difficulty,
        };
        tables.questions.insert(id, question.clone());
        Ok(question)
    }

    async fn delete_question(&self, question_id: QuestionId) -> Result<(), Error> {
        match self.tables.write().await.questions.remove(&question_id) {
            Some(_) => Ok(()),
            None => Err(Error::QuestionNotFound(question_id.0)),
        }
    }

    async fn search_questions(&self, term: &str) -> Result<Vec<Question>, Error> {
        let term = term.to_lowercase();
        Ok(self
            .filtered(|q| q.question.to_lowercase().contains(&term))
            .await)
    }

    async fn questions_by_category(&self, category_id: CategoryId) -> Result<Vec<Question>, Error> {
        Ok(self.filtered(|q| q.category == category_id).await)
    }

    async fn quiz_candidates(&self, quiz: &QuizRequest) -> Result<Vec<Question>, Error> {
        Ok(self.filtered(|q| quiz.is_eligible(q)).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_question(text: &str, category: i32) -> NewQuestion {
        NewQuestion {
            question: Some(text.to_string()),
            answer: Some("answer".to_string()),
            category: Some(CategoryId(category)),
            difficulty: Some(2),
        }
    }

    #[tokio::test]
    async fn assigns_increasing_ids() {
        let store = MemoryStore::default();
        let first = store.add_question(new_question("first", 1)).await.unwrap();
        let second = store.add_question(new_question("second", 2)).await.unwrap();
        assert_eq!(first.id, QuestionId(1));
        assert_eq!(second.id, QuestionId(2));

        store.delete_question(second.id).await.unwrap();
        let third = store.add_question(new_question("third", 2)).await.unwrap();
        assert_eq!(third.id, QuestionId(3));
    }

    #[tokio::test]
    async fn rejects_what_the_schema_rejects() {
        let store = MemoryStore::default();
        let missing = NewQuestion {
            question: None,
            ..new_question("x", 1)
        };
        assert!(matches!(
            store.add_question(missing).await,
            Err(Error::MissingField("question"))
        ));
        assert!(matches!(
            store.add_question(new_question("", 1)).await,
            Err(Error::EmptyQuestion)
        ));
        assert!(matches!(
            store.add_question(new_question("orphan", 3000)).await,
            Err(Error::UnknownCategory(3000))
        ));
        assert!(store.questions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn last_id_is_usable_once() {
        let seeded = Question {
            id: QuestionId(i32::MAX - 1),
            question: "Seeded".to_string(),
            answer: "A".to_string(),
            category: CategoryId(1),
            difficulty: 1,
        };
        let store = MemoryStore::new(stock_categories(), vec![seeded]);
        let last = store.add_question(new_question("last", 1)).await.unwrap();
        assert_eq!(last.id, QuestionId(i32::MAX));
        assert!(matches!(
            store.add_question(new_question("one too many", 1)).await,
            Err(Error::StorageUnavailable(_))
        ));
        assert_eq!(store.questions().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn deleting_unknown_question_fails() {
        let store = MemoryStore::default();
        assert!(matches!(
            store.delete_question(QuestionId(999999)).await,
            Err(Error::QuestionNotFound(999999))
        ));
    }

    #[tokio::test]
    async fn search_ignores_case() {
        let store = MemoryStore::default();
        store
            .add_question(new_question("What is the Title of the book?", 2))
            .await
            .unwrap();
        store
            .add_question(new_question("How many week days", 1))
            .await
            .unwrap();

        let found = store.search_questions("title").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "What is the Title of the book?");
        assert!(store.search_questions("udacity").await.unwrap().is_empty());
    }

    #[test]
    fn loads_seed_file() {
        let path = std::env::temp_dir().join(format!("trivia-seed-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{
                "categories": [{"id": 1, "type": "Science"}],
                "questions": [{"id": 7, "question": "Q", "answer": "A", "category": 1, "difficulty": 3}]
            }"#,
        )
        .unwrap();
        let store = MemoryStore::from_seed_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let questions = runtime.block_on(store.questions()).unwrap();
        assert_eq!(questions.len(), 1);
        let added = runtime
            .block_on(store.add_question(new_question("next", 1)))
            .unwrap();
        assert_eq!(added.id, QuestionId(8));
    }
}
