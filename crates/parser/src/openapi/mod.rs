//! OpenAPI 3.x specification model
//!
//! Parses OpenAPI 3.x documents (JSON or YAML) into an immutable in-memory
//! model. The model only carries what the resource graph needs; everything
//! else on operations and the document root is kept as raw JSON so that
//! `x-*` extensions stay reachable through [`Extensible`].
//!
//! ## Usage
//! ```rust,ignore
//! use apim_graph_parser::openapi::{Extensible, OpenApiParser};
//!
//! let parser = OpenApiParser::from_file("petstore.yaml")?;
//! let spec = parser.spec();
//! let policy = spec.extension_str("x-az-apim-inbound-append-policy");
//! ```

mod parser;
mod types;

pub use parser::{DocumentFormat, OpenApiParser};
pub use types::*;
