use std::time::Duration;

use crate::config::defaults as d;

use super::{OperationKind, PromptConfig};

pub const FIELD_QUESTION: &str = "question";
pub const FIELD_MEMORY: &str = "memory";
pub const FIELD_FRAGMENTS: &str = "fragments";

pub(super) fn builtin(kind: OperationKind) -> PromptConfig {
    match kind {
        OperationKind::Classify => record(
            kind,
            "You are a routing system that analyzes questions and returns exactly one of: \
             'including', 'without', 'personal', or 'memory'.",
            "Classify the question.\n\
             - including: it names one or more standard numbers\n\
             - personal: it concerns personnel, HR or employee policy\n\
             - memory: it is a follow-up to a standard discussed in the conversation below\n\
             - without: anything else\n\n\
             Conversation (\"0\" means none):\n{memory}\n\n\
             Question: {question}\n\nAnswer with one word.",
            &[FIELD_QUESTION, FIELD_MEMORY],
            d::DEFAULT_CLASSIFY_TTL_SECS,
            d::DEFAULT_CLASSIFY_MAX_TOKENS,
            d::DEFAULT_CLASSIFY_TEMPERATURE,
        ),
        OperationKind::ExtractStandard => record(
            kind,
            "You extract standard numbers from questions. \
             Return only the standard numbers, comma separated.",
            "Question: {question}\n\n\
             Return every full standard identifier (for example NS 3457-7 or M-004:2018), \
             comma separated, or nothing if there are none.",
            &[FIELD_QUESTION],
            d::DEFAULT_EXTRACT_STANDARD_TTL_SECS,
            d::DEFAULT_EXTRACT_STANDARD_MAX_TOKENS,
            d::DEFAULT_EXTRACT_STANDARD_TEMPERATURE,
        ),
        OperationKind::ExtractFromMemory => record(
            kind,
            "You extract standard numbers from memory context. \
             Return only the standard numbers, comma separated.",
            "Conversation:\n{memory}\n\n\
             Follow-up question: {question}\n\n\
             Return the standard identifiers the follow-up refers to, comma separated, \
             most recently discussed first. Return nothing if none apply.",
            &[FIELD_QUESTION, FIELD_MEMORY],
            d::DEFAULT_EXTRACT_MEMORY_TTL_SECS,
            d::DEFAULT_EXTRACT_MEMORY_MAX_TOKENS,
            d::DEFAULT_EXTRACT_MEMORY_TEMPERATURE,
        ),
        OperationKind::OptimizeSemantic => record(
            kind,
            "You are a helpful assistant that optimizes questions for semantic search.",
            "Rewrite the question so it is self-contained and precise for semantic search. \
             Return only the rewritten question.\n\nQuestion: {question}",
            &[FIELD_QUESTION],
            d::DEFAULT_OPTIMIZE_SEMANTIC_TTL_SECS,
            d::DEFAULT_OPTIMIZE_SEMANTIC_MAX_TOKENS,
            d::DEFAULT_OPTIMIZE_SEMANTIC_TEMPERATURE,
        ),
        OperationKind::OptimizeTextual => record(
            kind,
            "You optimize questions for textual search by extracting key terms.",
            "Return the salient search keywords of the question separated by spaces.\n\n\
             Question: {question}",
            &[FIELD_QUESTION],
            d::DEFAULT_OPTIMIZE_TEXTUAL_TTL_SECS,
            d::DEFAULT_OPTIMIZE_TEXTUAL_MAX_TOKENS,
            d::DEFAULT_OPTIMIZE_TEXTUAL_TEMPERATURE,
        ),
        OperationKind::Answer => record(
            kind,
            "You are a knowledgeable assistant providing detailed technical answers.",
            "Answer the question using only the documents below. \
             Cite the standard for every claim.\n\n\
             Documents:\n{fragments}\n\n\
             Conversation (\"0\" means none):\n{memory}\n\n\
             Question: {question}",
            &[FIELD_QUESTION, FIELD_FRAGMENTS, FIELD_MEMORY],
            d::DEFAULT_ANSWER_TTL_SECS,
            d::DEFAULT_ANSWER_MAX_TOKENS,
            d::DEFAULT_ANSWER_TEMPERATURE,
        ),
    }
}

fn record(
    kind: OperationKind,
    system: &str,
    template: &str,
    fields: &[&'static str],
    ttl_secs: u64,
    max_tokens: u32,
    temperature: f32,
) -> PromptConfig {
    PromptConfig {
        kind,
        system_message: system.to_string(),
        template: template.to_string(),
        required_fields: fields.to_vec(),
        ttl: Duration::from_secs(ttl_secs),
        max_tokens,
        temperature,
    }
}
