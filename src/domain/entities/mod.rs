//! Core domain entities.
//!
//! The service has a single entity, [`Link`], plus [`NewLink`] as the input
//! used to create one.

pub mod link;

pub use link::{Link, NewLink};
