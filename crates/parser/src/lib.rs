//! OpenAPI document parsing for apim-graph
//!
//! This crate loads an OpenAPI 3.x document into [`openapi::OpenApiSpec`],
//! the immutable specification model the generator transforms into a
//! resource graph. References into `components` are resolved on demand;
//! references across files are not.

pub mod openapi;

pub use openapi::{Extensible, OpenApiParser, OpenApiSpec};
