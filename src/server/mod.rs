use crate::canvas::SnapshotError;
use crate::interpreter::InterpretError;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;

pub mod protocol;
pub mod routes;

/// Failures crossing the web boundary: either the page posted a bad payload,
/// or the analysis itself failed. Nothing propagates past this type; every
/// variant becomes a tagged JSON error response.
#[derive(Debug)]
pub enum AnalyzeError {
    Snapshot(SnapshotError),
    Interpret(InterpretError),
}

impl AnalyzeError {
    fn kind(&self) -> &'static str {
        match self {
            AnalyzeError::Snapshot(_) => "bad_request",
            AnalyzeError::Interpret(InterpretError::Encoding(_)) => "encoding",
            AnalyzeError::Interpret(InterpretError::Transport(_)) => "transport",
            AnalyzeError::Interpret(InterpretError::Auth(_)) => "auth",
            AnalyzeError::Interpret(InterpretError::Response(_)) => "response",
        }
    }
}

impl std::fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzeError::Snapshot(err) => write!(f, "{err}"),
            AnalyzeError::Interpret(err) => write!(f, "{err}"),
        }
    }
}

impl actix_web::error::ResponseError for AnalyzeError {
    fn error_response(&self) -> HttpResponse {
        let body = protocol::ErrorBody {
            status: "error",
            kind: self.kind(),
            message: self.to_string(),
        };

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AnalyzeError::Snapshot(_) => StatusCode::BAD_REQUEST,
            AnalyzeError::Interpret(InterpretError::Auth(_)) => StatusCode::UNAUTHORIZED,
            AnalyzeError::Interpret(InterpretError::Transport(_))
            | AnalyzeError::Interpret(InterpretError::Response(_)) => StatusCode::BAD_GATEWAY,
            AnalyzeError::Interpret(InterpretError::Encoding(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<SnapshotError> for AnalyzeError {
    fn from(err: SnapshotError) -> AnalyzeError {
        AnalyzeError::Snapshot(err)
    }
}

impl From<InterpretError> for AnalyzeError {
    fn from(err: InterpretError) -> AnalyzeError {
        AnalyzeError::Interpret(err)
    }
}
