//! Feedback module — remote comparison of reference text and transcript.
//!
//! * [`Comparator`] — async trait implemented by all feedback backends.
//! * [`ApiComparator`] — OpenAI-compatible `/v1/chat/completions` client.
//! * [`PromptBuilder`] — fixed instruction + verbatim two-part prompt.
//! * [`ComparisonError`] — error variants for the comparison stage.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use rehearse::config::{ApiCredentials, FeedbackSettings};
//! use rehearse::feedback::{ApiComparator, Comparator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let settings = FeedbackSettings::default();
//!     let credentials = ApiCredentials::from_env().unwrap();
//!     let comparator = ApiComparator::new(&settings, credentials);
//!
//!     let feedback = comparator
//!         .compare("hello there world", "hello world")
//!         .await
//!         .unwrap();
//!     println!("{feedback}");
//! }
//! ```

pub mod api;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use api::{ApiComparator, Comparator, ComparisonError};
pub use prompt::PromptBuilder;
