//! Text-generation collaborator seam.
//!
//! Every pipeline feature that consults a language model goes through
//! the [`TextGenerator`] trait and carries a deterministic fallback,
//! so the pipeline produces complete output with no generator wired
//! in at all. Callers pass `Option<&dyn TextGenerator>`; `None` means
//! fallbacks only.

use async_trait::async_trait;

use crate::error::Result;

#[cfg(feature = "gemini")]
mod gemini;
#[cfg(feature = "gemini")]
pub use gemini::GeminiGenerator;

/// A text-generation collaborator.
///
/// Implementations wrap a hosted model API; tests use a scripted mock.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Blanket impl so `&T` works wherever a generator is expected.
#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    async fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt).await
    }
}
