//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`MotionError`] covers every way a load-and-play request
//! can fail:
//! - Malformed motion-capture text (section keywords, joint grammar, frame header)
//! - A clip that maps onto none of the target skeleton's bones
//! - Playback requested before the host avatar (or the clip) is available
//! - Asset fetch failures
//!
//! Per-joint mapping misses are not errors; they are reported through
//! [`crate::retarget::RetargetReport`] while processing continues.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, MotionError>`.
//!
//! ```rust,ignore
//! use mocap::errors::{MotionError, Result};
//!
//! fn load() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for motion loading and retargeting.
#[derive(Error, Debug)]
pub enum MotionError {
    // ========================================================================
    // Format Errors
    // ========================================================================
    /// The motion-capture text is malformed.
    ///
    /// `line` is 1-based and points at the offending line (or one past the
    /// end of input when the file ends prematurely).
    #[error("Invalid BVH file at line {line}: {message}")]
    Format {
        /// 1-based line number
        line: usize,
        /// What was expected
        message: String,
    },

    // ========================================================================
    // Retargeting Errors
    // ========================================================================
    /// Not a single source joint maps onto the target skeleton.
    ///
    /// Distinguishes "wrong file for this avatar" from an incomplete mapping.
    #[error("No animation tracks created, bone names may not match ({} joints unmapped)", missing.len())]
    NoTracks {
        /// Every source joint that failed to map
        missing: Vec<String>,
    },

    // ========================================================================
    // Host State Errors
    // ========================================================================
    /// The host avatar is not ready for the requested operation.
    #[error("Not ready: {0}")]
    NotReady(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Fetched asset is not UTF-8 text.
    #[error("Utf8 error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),
}

impl MotionError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        MotionError::Format {
            line,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_format(&self) -> bool {
        matches!(self, MotionError::Format { .. })
    }

    #[must_use]
    pub fn is_no_tracks(&self) -> bool {
        matches!(self, MotionError::NoTracks { .. })
    }

    #[must_use]
    pub fn is_not_ready(&self) -> bool {
        matches!(self, MotionError::NotReady(_))
    }
}

/// Alias for `Result<T, MotionError>`.
pub type Result<T> = std::result::Result<T, MotionError>;
