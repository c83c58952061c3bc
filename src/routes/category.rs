use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::instrument;

use handle_errors::Error;

use crate::routes::question::QuestionsResponse;
use crate::store::Store;
use crate::types::category::{CategoryId, category_map};
use crate::types::pagination::extract_pagination;

#[derive(Serialize, Debug)]
pub struct CategoriesResponse {
    pub categories: BTreeMap<i32, String>,
    pub success: bool,
}

#[instrument]
pub async fn get_categories<S: Store>(store: S) -> Result<impl warp::Reply, warp::Rejection> {
    let categories = store.categories().await?;
    if categories.is_empty() {
        return Err(warp::reject::custom(Error::NotFound));
    }

    Ok(warp::reply::json(&CategoriesResponse {
        categories: category_map(categories),
        success: true,
    }))
}

/// The id stays a raw path segment so that a non-numeric id is reported
/// as unprocessable instead of an unknown route.
#[instrument]
pub async fn get_questions_by_category<S: Store>(
    category_id: String,
    params: HashMap<String, String>,
    store: S,
) -> Result<impl warp::Reply, warp::Rejection> {
    let category_id: CategoryId = category_id.parse()?;
    let questions = store.questions_by_category(category_id).await?;
    let page = extract_pagination(&params).paginate(&questions);
    if page.is_empty() {
        return Err(warp::reject::custom(Error::NoMatchingQuestions));
    }

    Ok(warp::reply::json(&QuestionsResponse {
        questions: page,
        total_questions: questions.len(),
        categories: None,
        current_category: Some(category_id),
        success: true,
    }))
}
