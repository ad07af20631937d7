//! Answer context: search hits rendered for the answer prompt.

mod formatter;

pub use formatter::{format_fragments, FormattedContext};
