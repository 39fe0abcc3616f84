//! # Formbind - bind decoded form data onto typed records
//!
//! Formbind takes a decoded form (string keys to ordered lists of string
//! values) and populates a record's fields in place, driven by per-field
//! `#[form(...)]` metadata.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────────────────────┐
//! │    Form     │────▶│   Binder    │────▶│ parser │ slice │ time │ coerce │
//! │ (key→[str]) │     │ (walks the  │     └──────────────────────────────┘
//! └─────────────┘     │  record)    │◀──── RecordDescriptor (cached per type)
//!                     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use formbind::{bind, Form, Record};
//!
//! #[derive(Debug, Default, Record)]
//! struct Search {
//!     #[form("q")]
//!     query: String,
//!     #[form("page,default=1")]
//!     page: u32,
//!     #[form("tag")]
//!     tags: Vec<String>,
//! }
//!
//! let form: Form = [("q", "rust"), ("tag", "a"), ("tag", "b")].into_iter().collect();
//! let mut search = Search::default();
//! bind(&form, &mut search)?;
//! assert_eq!(search.page, 1);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`form`] - Input map
//! - [`field`] - Categories and the field view
//! - [`resolver`] - Form tag and directive parsing
//! - [`descriptor`] - Cached record descriptors
//! - [`coerce`] - Primitive coercion
//! - [`slice`] - Sequence binding
//! - [`time`] - Temporal binding
//! - [`parser`] - Custom field parsers
//! - [`binder`] - Entry point
//! - [`config`] - Binder configuration

extern crate self as formbind;

// Core modules
pub mod error;
pub mod field;
pub mod form;

// Metadata
pub mod descriptor;
pub mod resolver;

// Binding paths
pub mod coerce;
pub mod parser;
pub mod slice;
pub mod time;

// Entry point
pub mod binder;
pub mod config;

// =============================================================================
// Re-exports
// =============================================================================

pub use binder::{bind, Binder};
pub use config::BinderConfig;
pub use descriptor::{FieldDescriptor, FieldSpec, Fields, Record, RecordBuilder, RecordDescriptor};
pub use error::{BindError, BindResult, BoxError, ConfigError, ConfigResult, ConversionError};
pub use field::{Category, Field, OptionalField, Scalar, SequenceField, Temporal, View};
pub use form::Form;
pub use parser::{FieldParse, Parsed, ParserField};
pub use resolver::{FieldConfig, TimeDirectives};
pub use time::Zone;

/// Derive [`Record`] for a struct with named fields.
pub use formbind_derive::Record;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::OnceCell;
}
