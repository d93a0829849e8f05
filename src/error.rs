use thiserror::Error;

/// Protocol input that cannot be treated as text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The bytes are not valid UTF-8
    #[error("protocol text is not valid UTF-8 (first invalid byte at offset {valid_up_to})")]
    InvalidEncoding { valid_up_to: usize },
    /// The input decodes but carries binary content
    #[error("protocol input looks binary (NUL byte at offset {offset})")]
    NotText { offset: usize },
}
