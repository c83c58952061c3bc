use serde::Serialize;
use tracing::{Level, event, instrument};

use crate::store::Store;
use crate::types::question::Question;
use crate::types::quiz::{QuizRequest, pick_question};

#[derive(Serialize, Debug)]
pub struct QuizResponse {
    pub question: Question,
    pub success: bool,
}

#[instrument]
pub async fn play_quiz<S: Store>(
    store: S,
    quiz: QuizRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let eligible = store.quiz_candidates(&quiz).await?;
    event!(Level::DEBUG, eligible = eligible.len());

    let question = pick_question(&eligible, &mut rand::thread_rng())?;
    Ok(warp::reply::json(&QuizResponse {
        question,
        success: true,
    }))
}
