#![warn(clippy::all)]

use handle_errors::return_error;
use tracing_subscriber::fmt::format::FmtSpan;
use warp::{Filter, Reply, http::Method};

pub mod config;
pub mod routes;
pub mod store;
pub mod types;

use crate::config::Config;
use crate::store::Store;

pub fn setup_tracing(config: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter())
        // Record an event when each span closes, which times the routes.
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

/// The whole `/api` filter tree, with CORS, request tracing and error
/// recovery applied.
pub fn build_routes<S: Store>(store: S) -> impl Filter<Extract = impl Reply> + Clone {
    let store_filter = warp::any().map(move || store.clone());

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["Content-Type", "Authorization"])
        .allow_methods(&[
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_credentials(true);

    // Paths are matched before methods so an unknown path is a 404 and a
    // known path with the wrong method a 405.
    let question_categories = warp::path!("api" / "questions" / "categories")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(routes::category::get_categories::<S>);

    let categories = warp::path!("api" / "categories")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(routes::category::get_categories::<S>);

    let get_questions = warp::path!("api" / "questions")
        .and(warp::get())
        .and(warp::query())
        .and(store_filter.clone())
        .and_then(routes::question::get_questions::<S>);

    let add_question = warp::path!("api" / "questions")
        .and(warp::post())
        .and(warp::query())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(routes::question::add_question::<S>);

    let delete_question = warp::path!("api" / "questions" / i32)
        .and(warp::delete())
        .and(store_filter.clone())
        .and_then(routes::question::delete_question::<S>);

    let search_questions = warp::path!("api" / "questions" / "search")
        .and(warp::post())
        .and(warp::query())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(routes::question::search_questions::<S>);

    let questions_by_category = warp::path!("api" / "categories" / String / "questions")
        .and(warp::get())
        .and(warp::query())
        .and(store_filter.clone())
        .and_then(routes::category::get_questions_by_category::<S>);

    let play_quiz = warp::path!("api" / "quizzes")
        .and(warp::post())
        .and(store_filter)
        .and(warp::body::json())
        .and_then(routes::quiz::play_quiz::<S>);

    question_categories
        .or(categories)
        .or(get_questions)
        .or(add_question)
        .or(delete_question)
        .or(search_questions)
        .or(questions_by_category)
        .or(play_quiz)
        .with(cors)
        .with(warp::trace(|info| {
            tracing::info_span!(
                "request",
                method = %info.method(),
                path = %info.path(),
                id = %uuid::Uuid::new_v4(),
            )
        }))
        .recover(return_error)
}

pub async fn run<S: Store>(config: &Config, store: S) {
    let routes = build_routes(store);
    tracing::info!(port = config.port, backend = ?config.backend, "serving trivia api");
    warp::serve(routes).run(([0, 0, 0, 0], config.port)).await;
}
