//! Pin field error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PinFieldError {
    #[error("slot count must be greater than zero, got {0}")]
    InvalidSlotCount(usize),

    #[error("obscure glyph must not be empty")]
    EmptyObscureGlyph,

    #[error("obscure glyph must be a single line: {0:?}")]
    MultiLineObscureGlyph(String),

    #[error("length limit must be greater than zero")]
    InvalidLengthLimit,

    #[error("style parameter `{name}` must be finite and non-negative, got {value}")]
    InvalidStyleParam { name: &'static str, value: f32 },

    #[error("controller is detached")]
    Detached,

    #[error("config error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PinFieldError>;
