/// Cache integrity errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("cache integrity violation for key {key}: expected {expected} dimensions, found {actual}")]
    IntegrityViolation {
        key: String,
        expected: usize,
        actual: usize,
    },
}
