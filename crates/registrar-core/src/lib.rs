//! # Registrar Core
//!
//! Core types and utilities for the Registrar API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`normalize`]: Trimming and case-folding of user supplied text
//!
//! # Example
//!
//! ```ignore
//! use registrar_core::errors::AppError;
//! use registrar_core::normalize::title_case;
//!
//! let title = title_case("bio101"); // "Bio101"
//! let error = AppError::not_found(anyhow::anyhow!("Course '{}' not found", title));
//! ```

pub mod errors;
pub mod normalize;

pub use errors::{AppError, ErrorKind, ErrorResponse};
