use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use handle_errors::Error;

use crate::types::category::CategoryId;
use crate::types::question::{Question, QuestionId};

/// Category id the client sends to play across all categories.
pub const ANY_CATEGORY: CategoryId = CategoryId(0);

#[derive(Deserialize, Debug, Clone)]
pub struct QuizCategory {
    pub id: CategoryId,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Body of `POST /api/quizzes`.
#[derive(Deserialize, Debug, Clone)]
pub struct QuizRequest {
    pub quiz_category: QuizCategory,
    pub previous_questions: Vec<QuestionId>,
}

impl QuizRequest {
    /// `None` when every category is in play.
    pub fn category(&self) -> Option<CategoryId> {
        match self.quiz_category.id {
            ANY_CATEGORY => None,
            id => Some(id),
        }
    }

    pub fn is_eligible(&self, question: &Question) -> bool {
        self.category().is_none_or(|id| question.category == id)
            && !self.previous_questions.contains(&question.id)
    }
}

/// Uniform draw from the eligible set.
pub fn pick_question<R: Rng + ?Sized>(eligible: &[Question], rng: &mut R) -> Result<Question, Error> {
    eligible
        .choose(rng)
        .cloned()
        .ok_or(Error::NoQuestionsAvailable)
}
