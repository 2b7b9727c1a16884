//! Error types shared by every stage of the pipeline.

use std::path::PathBuf;

use crate::platform::Platform;

pub type FaviconResult<T> = Result<T, FaviconError>;

#[derive(thiserror::Error, Debug)]
pub enum FaviconError {
    #[error("invalid source type: {0}")]
    InvalidSourceType(String),

    #[error("source set is empty")]
    EmptySource,

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("option `{option}` is not supported on platform `{platform}`")]
    UnsupportedOption { platform: Platform, option: String },

    #[error("invalid value for option `{option}`: {reason}")]
    InvalidOptionValue { option: String, reason: String },

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("rasterization error: {0}")]
    Rasterization(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("canvas allocation error: {0}")]
    CanvasAllocation(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("failed to read `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FaviconError {
    pub fn invalid_source_type(msg: impl Into<String>) -> Self {
        Self::InvalidSourceType(msg.into())
    }

    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }

    pub fn invalid_option_value(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOptionValue {
            option: option.into(),
            reason: reason.into(),
        }
    }

    pub fn rasterization(msg: impl Into<String>) -> Self {
        Self::Rasterization(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn canvas(msg: impl Into<String>) -> Self {
        Self::CanvasAllocation(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn serialize(msg: impl Into<String>) -> Self {
        Self::Serialize(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for errors raised while validating input, before any
    /// image work has started.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidSourceType(_)
                | Self::EmptySource
                | Self::UnsupportedOption { .. }
                | Self::InvalidOptionValue { .. }
                | Self::InvalidColor(_)
        )
    }
}
