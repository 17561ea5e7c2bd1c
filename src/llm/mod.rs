//! Model access.
//!
//! The pipeline talks to models through [`ModelBackend`]; [`GeminiClient`]
//! is the production implementation.

mod gemini;
mod types;

pub use gemini::{GeminiClient, DEFAULT_BASE_URL};

use crate::error::Result;
use std::path::Path;

/// Inline binary input sent with a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// MIME type, e.g. `application/pdf`
    pub mime_type: String,
    /// Raw bytes
    pub data: Vec<u8>,
}

impl Attachment {
    /// Read a PDF from disk.
    pub fn pdf(path: &Path) -> Result<Self> {
        Ok(Self {
            mime_type: "application/pdf".to_string(),
            data: std::fs::read(path)?,
        })
    }
}

/// A single generation request.
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    /// Model id
    pub model: String,
    /// Prompt text
    pub prompt: String,
    /// Files sent after the prompt
    pub attachments: Vec<Attachment>,
    /// Ask for a JSON response body
    pub json_output: bool,
    /// Sampling temperature; the model default when unset
    pub temperature: Option<f32>,
}

/// Something that turns a prompt into text.
pub trait ModelBackend {
    /// Run one request and return the response text.
    fn generate(&self, request: &ModelRequest) -> Result<String>;
}

impl<B: ModelBackend + ?Sized> ModelBackend for &B {
    fn generate(&self, request: &ModelRequest) -> Result<String> {
        (**self).generate(request)
    }
}
