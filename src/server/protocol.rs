//! Wire types exchanged with the drawing page.

use serde::{Deserialize, Serialize};

/// One press of the analyze button
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64-encoded raw RGBA contents of the canvas; absent when nothing
    /// has been drawn
    pub image: Option<String>,

    /// The user's API credential, possibly empty
    #[serde(default)]
    pub api_key: String,
}

/// What was missing before an analysis could run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Guidance {
    MissingApiKey,
    EmptyCanvas,
}

impl Guidance {
    pub fn message(self) -> &'static str {
        match self {
            Guidance::MissingApiKey => "Please enter your API key in the sidebar.",
            Guidance::EmptyCanvas => "Draw something on the board before analyzing.",
        }
    }
}

/// One guidance line shown to the user
#[derive(Debug, Serialize)]
pub struct GuidanceMessage {
    pub kind: Guidance,
    pub message: &'static str,
}

/// Everything the page can get back from one analyze press that is not an
/// error: either the description, or guidance on what to fix first
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalyzeResponse {
    Description { text: String },
    Guidance { messages: Vec<GuidanceMessage> },
}

impl AnalyzeResponse {
    pub fn guidance(kinds: Vec<Guidance>) -> Self {
        AnalyzeResponse::Guidance {
            messages: kinds
                .into_iter()
                .map(|kind| GuidanceMessage {
                    kind,
                    message: kind.message(),
                })
                .collect(),
        }
    }
}

/// Body attached to every failed analysis
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub kind: &'static str,
    pub message: String,
}
