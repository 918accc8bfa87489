//! Response submission.
//!
//! - [`record`] builds the plain-text response record
//! - [`transport`] posts it to a GitHub issue thread
//! - [`pipeline`] runs the review countdown and the single submission

pub mod pipeline;
pub mod record;
pub mod transport;

pub use pipeline::{countdown_text, SkipReason, SubmissionOutcome, SubmissionPipeline};
pub use record::{client_identification, Answer, SubmissionRecord, UNANSWERED};
pub use transport::{GithubTarget, GithubTransport, Transport};
