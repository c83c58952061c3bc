use serde::{Deserialize, Serialize};

use crate::types::category::CategoryId;

#[derive(Serialize, Debug, Deserialize, Clone, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub answer: String,
    pub category: CategoryId,
    pub difficulty: i32,
}

#[derive(Serialize, Debug, Clone, Copy, Eq, Hash, Deserialize, PartialEq, PartialOrd, Ord)]
pub struct QuestionId(pub i32);

/// Body of `POST /api/questions`. Presence and integrity of the fields are
/// checked by the store, not here.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct NewQuestion {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<CategoryId>,
    pub difficulty: Option<i32>,
}

/// Body of `POST /api/questions/search`.
#[derive(Deserialize, Debug, Clone)]
pub struct SearchTerm {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
}
