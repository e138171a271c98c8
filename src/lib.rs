//! # promptforge
//!
//! Guided prompt authoring: compose up to four labeled sections into one
//! structured prompt, sanitize the text, and have an external language
//! model rewrite it for clarity.
//!
//! ## Architecture
//!
//! ```text
//! Field values → composer (assemble) → sanitizer (cap, redact, normalize)
//!              → enhancer (external rewrite) → artifacts for the caller
//! ```
//!
//! All state is request-scoped; the pipeline holds no mutable state across
//! calls and is safe to share behind `&self`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use promptforge::{HttpEnhancer, PromptPipeline, PromptRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = PromptPipeline::new(HttpEnhancer::from_env()?)?;
//!     let request = PromptRequest {
//!         goal: "Summarize blockchain in 100 words".to_string(),
//!         ..Default::default()
//!     };
//!     let artifacts = pipeline.process(&request).await?;
//!     println!("{}", artifacts.enhanced);
//!     Ok(())
//! }
//! ```

pub mod composer;
pub mod enhancer;
pub mod pipeline;
pub mod sanitizer;
pub mod session;

pub use composer::{Composer, PromptSection, SectionLabel};
pub use enhancer::{Enhance, EnhancerConfig, EnhancerError, HttpEnhancer};
pub use pipeline::{
    PipelineError, PreparedPrompt, PromptArtifacts, PromptPipeline, PromptRequest,
};
pub use sanitizer::{
    IssueCategory, SanitizationResult, Sanitizer, SanitizerError, MAX_PROMPT_LENGTH,
};
pub use session::SessionContext;

/// Validates that the required environment variables are set.
///
/// `API_URL` and `MODEL` have defaults; only the key is mandatory.
pub fn validate_environment() -> Result<(), String> {
    let required_vars = ["API_KEY"];
    let mut missing_vars = Vec::new();

    for var in &required_vars {
        if std::env::var(var).is_err() {
            missing_vars.push(*var);
        }
    }

    if missing_vars.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        ))
    }
}
