//! The user-facing web surface: the drawing page itself, and the analyze
//! endpoint the page posts to. Precondition checks live here, in front of
//! the interpreter, so no outbound traffic happens for an empty credential
//! or an untouched canvas.

use super::protocol::{AnalyzeRequest, AnalyzeResponse, Guidance};
use super::AnalyzeError;
use crate::canvas::Snapshot;
use crate::interpreter::Interpreter;
use actix_web::http::header::ContentType;
use actix_web::{get, post, web, HttpResponse, Responder};
use tracing::info;

type Result<T> = std::result::Result<T, AnalyzeError>;

/// The single drawing page, embedded at compile time
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(include_str!("../../static/index.html"))
}

#[post("/analyze")]
pub async fn analyze(
    req: web::Json<AnalyzeRequest>,
    interpreter: web::Data<Interpreter>,
) -> Result<HttpResponse> {
    let api_key = req.api_key.trim();

    match (&req.image, api_key.is_empty()) {
        // Both preconditions hold: decode the snapshot and run one analysis
        (Some(image), false) => {
            let snapshot = Snapshot::from_b64(image)?;
            let text = interpreter.interpret(&snapshot, api_key).await?;

            info!("finished serving analysis request");
            Ok(HttpResponse::Ok().json(AnalyzeResponse::Description { text }))
        }

        // Something is missing: report everything that is, send nothing out
        (image, key_missing) => {
            let mut kinds = Vec::new();
            if key_missing {
                kinds.push(Guidance::MissingApiKey);
            }
            if image.is_none() {
                kinds.push(Guidance::EmptyCanvas);
            }

            info!("analysis skipped, preconditions not met: {kinds:?}");
            Ok(HttpResponse::UnprocessableEntity().json(AnalyzeResponse::guidance(kinds)))
        }
    }
}
