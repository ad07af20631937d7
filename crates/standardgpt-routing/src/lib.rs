//! # standardgpt-routing
//!
//! Decides how a question is retrieved.
//!
//! ```text
//! Router
//! ├── Recognizer      (pure regex pre-filter, year normalization)
//! ├── RouteLabel      (closed set parsed from classifier output)
//! └── ExtractStandard (cached call for weak recognizer matches)
//! MemoryResolver
//! ├── deterministic newest-answer-first rule
//! └── ExtractFromMemory (cached call, only when several turns compete)
//! ```

pub mod label;
pub mod recognizer;
pub mod resolver;
pub mod router;

pub use label::RouteLabel;
pub use recognizer::{contains_reference, extract_references};
pub use resolver::{MemoryResolver, Resolution};
pub use router::{Router, RoutingOutcome};
