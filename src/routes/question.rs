use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{Level, event, instrument};

use handle_errors::Error;

use crate::store::Store;
use crate::types::category::{CategoryId, category_map};
use crate::types::pagination::extract_pagination;
use crate::types::question::{NewQuestion, Question, QuestionId, SearchTerm};

/// One page of questions plus the size of the whole result set.
#[derive(Serialize, Debug)]
pub struct QuestionsResponse {
    pub questions: Vec<Question>,
    pub total_questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<BTreeMap<i32, String>>,
    pub current_category: Option<CategoryId>,
    pub success: bool,
}

#[derive(Serialize, Debug)]
pub struct SuccessResponse {
    pub success: bool,
}

#[instrument]
pub async fn get_questions<S: Store>(
    params: HashMap<String, String>,
    store: S,
) -> Result<impl warp::Reply, warp::Rejection> {
    event!(target: "trivia_api", Level::INFO, "querying questions");
    let pagination = extract_pagination(&params);

    let questions = store.questions().await?;
    let page = pagination.paginate(&questions);
    if page.is_empty() {
        event!(Level::INFO, page = pagination.page, "page is empty");
        return Err(warp::reject::custom(Error::NotFound));
    }
    let categories = store.categories().await?;

    Ok(warp::reply::json(&QuestionsResponse {
        questions: page,
        total_questions: questions.len(),
        categories: Some(category_map(categories)),
        current_category: None,
        success: true,
    }))
}

#[instrument]
pub async fn add_question<S: Store>(
    params: HashMap<String, String>,
    store: S,
    new_question: NewQuestion,
) -> Result<impl warp::Reply, warp::Rejection> {
    let question = match store.add_question(new_question).await {
        Ok(question) => question,
        Err(e) => return Err(warp::reject::custom(e)),
    };
    event!(Level::INFO, id = question.id.0, "question added");

    let questions = store.questions().await?;
    if questions.is_empty() {
        // Deleted again before we could list it.
        return Err(warp::reject::custom(Error::QuestionNotFound(question.id.0)));
    }
    let categories = store.categories().await?;

    Ok(warp::reply::json(&QuestionsResponse {
        questions: extract_pagination(&params).paginate(&questions),
        total_questions: questions.len(),
        categories: Some(category_map(categories)),
        current_category: None,
        success: true,
    }))
}

#[instrument]
pub async fn delete_question<S: Store>(
    id: i32,
    store: S,
) -> Result<impl warp::Reply, warp::Rejection> {
    match store.delete_question(QuestionId(id)).await {
        Ok(_) => {
            event!(Level::INFO, id, "question deleted");
            Ok(warp::reply::json(&SuccessResponse { success: true }))
        }
        Err(e) => Err(warp::reject::custom(e)),
    }
}

#[instrument]
pub async fn search_questions<S: Store>(
    params: HashMap<String, String>,
    store: S,
    search: SearchTerm,
) -> Result<impl warp::Reply, warp::Rejection> {
    let questions = store.search_questions(&search.search_term).await?;
    let page = extract_pagination(&params).paginate(&questions);
    if page.is_empty() {
        return Err(warp::reject::custom(Error::NoMatchingQuestions));
    }

    Ok(warp::reply::json(&QuestionsResponse {
        questions: page,
        total_questions: questions.len(),
        categories: None,
        current_category: None,
        success: true,
    }))
}
