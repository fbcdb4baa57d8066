pub mod canvas;
pub mod interpreter;
pub mod server;

/// Sketchboard configuration -- fixed constants for the lifetime of the
/// process. The only runtime input is the API key typed into the page.
pub mod config {
    /// Address the drawing page and analyze endpoint are served on
    pub const BIND_ADDR: &str = "0.0.0.0:8080";

    /// The vision-capable chat-completion endpoint
    pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

    /// Model asked to describe the sketch
    pub const MODEL: &str = "gpt-4o-mini";

    /// Instruction sent alongside the encoded drawing
    pub const PROMPT: &str =
        "Briefly describe in natural language what this drawing or sketch represents.";

    /// Upper bound on the length of the model's reply
    pub const MAX_TOKENS: u32 = 300;

    /// Drawing surface dimensions, fixed at page load
    pub const CANVAS_WIDTH: u32 = 600;
    pub const CANVAS_HEIGHT: u32 = 400;

    /// A base64 RGBA frame of the 600x400 board is ~1.3 MB
    pub const MAX_PAYLOAD_BYTES: usize = 4 * 1024 * 1024;

    /// Default log filter when RUST_LOG is unset
    pub const RUST_LOG: &str = "info";
}
