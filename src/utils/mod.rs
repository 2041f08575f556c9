//! Helpers shared across layers.
//!
//! - [`code_generator`] - Random short code generation
//! - [`url_normalizer`] - URL trimming, scheme defaulting and validation
//! - [`request_origin`] - Public origin derivation from request headers
//! - [`db_error`] - Database error classification

pub mod code_generator;
pub mod db_error;
pub mod request_origin;
pub mod url_normalizer;
