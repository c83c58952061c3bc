use serde::Serialize;
use warp::{
    Rejection, Reply,
    filters::{body::BodyDeserializeError, cors::CorsForbidden},
    http::StatusCode,
    reject::{InvalidHeader, InvalidQuery, MethodNotAllowed, Reject, UnsupportedMediaType},
};

use tracing::{Level, event, instrument};

#[derive(Debug)]
pub enum Error {
    DatabaseQueryError(sqlx::Error),
    MigrationError(sqlx::migrate::MigrateError),
    ConfigurationError(config::ConfigError),
    StorageUnavailable(String),
    /// A retrieval came back empty.
    NotFound,
    QuestionNotFound(i32),
    NoMatchingQuestions,
    NoQuestionsAvailable,
    InvalidCategory(String),
    MissingField(&'static str),
    EmptyQuestion,
    UnknownCategory(i32),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::DatabaseQueryError(_) => {
                write!(f, "Database query failed")
            }
            Error::MigrationError(err) => {
                write!(f, "Cannot migrate data: {}", err)
            }
            Error::ConfigurationError(err) => {
                write!(f, "Cannot read configuration: {}", err)
            }
            Error::StorageUnavailable(reason) => {
                write!(f, "Storage unavailable: {}", reason)
            }
            Error::NotFound => {
                write!(f, "Nothing found for this request")
            }
            Error::QuestionNotFound(id) => {
                write!(f, "Question {} does not exist", id)
            }
            Error::NoMatchingQuestions => {
                write!(f, "No question matches the filter")
            }
            Error::NoQuestionsAvailable => {
                write!(f, "No question left to play")
            }
            Error::InvalidCategory(raw) => {
                write!(f, "Invalid category id: {}", raw)
            }
            Error::MissingField(field) => {
                write!(f, "Missing field: {}", field)
            }
            Error::EmptyQuestion => {
                write!(f, "Question text must not be empty")
            }
            Error::UnknownCategory(id) => {
                write!(f, "Category {} does not exist", id)
            }
        }
    }
}

impl Reject for Error {}

/// Body of every error response.
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

const NOT_NULL_VIOLATION: u32 = 23502;
const FOREIGN_KEY_VIOLATION: u32 = 23503;
const CHECK_VIOLATION: u32 = 23514;

fn error_reply(status: StatusCode, message: &str) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse {
            success: false,
            error: status.as_u16(),
            message: message.to_string(),
        }),
        status,
    )
}

fn not_found() -> warp::reply::WithStatus<warp::reply::Json> {
    error_reply(StatusCode::NOT_FOUND, "Not found")
}

fn unprocessable() -> warp::reply::WithStatus<warp::reply::Json> {
    error_reply(StatusCode::UNPROCESSABLE_ENTITY, "unprocessable")
}

fn log_database_error(e: &sqlx::Error) {
    let Some(db_error) = e.as_database_error() else {
        event!(Level::ERROR, "Database query error: {}", e);
        return;
    };
    let code = db_error.code().and_then(|code| code.parse::<u32>().ok());
    let kind = match code {
        Some(NOT_NULL_VIOLATION) => "missing value",
        Some(FOREIGN_KEY_VIOLATION) => "unknown category",
        Some(CHECK_VIOLATION) => "check constraint",
        _ => "database error",
    };
    event!(
        Level::ERROR,
        kind = kind,
        code = code.unwrap_or_default(),
        db_message = db_error.message(),
        constraint = db_error.constraint().unwrap_or("none"),
    );
}

#[instrument]
pub async fn return_error(r: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(error) = r.find::<Error>() {
        match error {
            Error::NotFound => {
                event!(Level::WARN, "{}", error);
                Ok(not_found())
            }
            Error::DatabaseQueryError(e) => {
                log_database_error(e);
                Ok(unprocessable())
            }
            Error::MigrationError(_)
            | Error::ConfigurationError(_)
            | Error::StorageUnavailable(_) => {
                event!(Level::ERROR, "{}", error);
                Ok(error_reply(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                ))
            }
            Error::NoMatchingQuestions | Error::NoQuestionsAvailable => {
                event!(Level::INFO, "{}", error);
                Ok(unprocessable())
            }
            _ => {
                event!(Level::ERROR, "{}", error);
                Ok(unprocessable())
            }
        }
    } else if let Some(error) = r.find::<CorsForbidden>() {
        event!(Level::ERROR, "CORS forbidden error: {}", error);
        Ok(error_reply(StatusCode::FORBIDDEN, "Forbidden"))
    } else if let Some(error) = r.find::<BodyDeserializeError>() {
        event!(Level::ERROR, "Cannot deserialize request body: {}", error);
        Ok(unprocessable())
    } else if let Some(error) = r.find::<UnsupportedMediaType>() {
        event!(Level::ERROR, "Request body is not JSON: {}", error);
        Ok(unprocessable())
    } else if let Some(error) = r.find::<InvalidQuery>() {
        event!(Level::ERROR, "{}", error);
        Ok(error_reply(StatusCode::BAD_REQUEST, "Bad Request"))
    } else if let Some(error) = r.find::<InvalidHeader>() {
        event!(Level::ERROR, "{}", error);
        Ok(error_reply(StatusCode::BAD_REQUEST, "Bad Request"))
    } else if r.find::<MethodNotAllowed>().is_some() {
        event!(Level::WARN, "Requested method is not allowed");
        Ok(error_reply(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method Not Allowed",
        ))
    } else if r.is_not_found() {
        event!(Level::WARN, "Requested route was not found");
        Ok(not_found())
    } else {
        event!(Level::ERROR, "Unhandled rejection: {:?}", r);
        Ok(error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
        ))
    }
}
