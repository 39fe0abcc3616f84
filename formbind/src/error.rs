//! Error types for the form binding engine.
//!
//! - [`ConversionError`] - A raw string could not be converted to the field's type
//! - [`BindError`] - Terminal error of a bind call
//! - [`ConfigError`] - Invalid binder configuration
//!
//! A bind call returns at most one [`BindError`]; lower-level errors are
//! wrapped with the name of the field being bound.

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use crate::coerce::CoerceError;
use crate::field::Category;
use crate::time::TimeError;

/// Boxed error returned by custom field parsers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// =============================================================================
// Conversion Errors
// =============================================================================

/// A single raw value could not be converted.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Signed or unsigned integer parse failure (syntax or range).
    #[error("invalid integer {value:?}: {source}")]
    Int {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// Floating-point parse failure.
    #[error("invalid float {value:?}: {source}")]
    Float {
        value: String,
        #[source]
        source: ParseFloatError,
    },

    /// Unsigned integer written with a sign.
    #[error("invalid unsigned integer {value:?}: sign not allowed")]
    UnsignedSign { value: String },

    /// Finite literal outside the range of the float width.
    #[error("float {value:?} out of range")]
    FloatRange { value: String },

    /// Value is not one of the accepted boolean spellings.
    #[error("invalid boolean {value:?}")]
    Bool { value: String },

    /// Value does not match the time layout.
    #[error("invalid time {value:?} for layout {layout:?}: {source}")]
    Time {
        value: String,
        layout: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Wall-clock time falls into a gap of the target zone.
    #[error("time {value:?} does not exist in zone {zone}")]
    NonexistentTime { value: String, zone: String },
}

// =============================================================================
// Bind Errors (top-level)
// =============================================================================

/// Terminal error of a bind call.
///
/// Fields bound before the failure keep whatever they were set to; callers
/// should treat the target as undefined.
#[derive(Debug, Error)]
pub enum BindError {
    /// The bind target is not a record (or is an unset optional).
    #[error("formbind: bind target must be a record, got {found}")]
    InvalidTarget { found: String },

    /// A field without a form key is neither a record nor an optional record.
    #[error("field: {field} has no form key and is not a record (found {category})")]
    NoTag { field: String, category: Category },

    /// A custom parser produced a value of the wrong shape.
    #[error("field: {field} wrong parsed type: {parsed}")]
    TypeMismatch { field: String, parsed: String },

    /// A built-in conversion failed.
    #[error("field: {field}: {source}")]
    Conversion {
        field: String,
        #[source]
        source: ConversionError,
    },

    /// A named time zone could not be resolved.
    #[error("field: {field}: unknown time location {location:?}: {reason}")]
    Location {
        field: String,
        location: String,
        reason: String,
    },

    /// The field's type has no conversion path.
    #[error("field: {field} unsupported type: {category}")]
    Unsupported { field: String, category: Category },

    /// Error returned by a custom parser, passed through unchanged.
    #[error(transparent)]
    Custom(BoxError),
}

impl BindError {
    /// Name of the field the error is attached to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            BindError::NoTag { field, .. }
            | BindError::TypeMismatch { field, .. }
            | BindError::Conversion { field, .. }
            | BindError::Location { field, .. }
            | BindError::Unsupported { field, .. } => Some(field),
            BindError::InvalidTarget { .. } | BindError::Custom(_) => None,
        }
    }

    pub(crate) fn from_coerce(field: impl Into<String>, err: CoerceError) -> Self {
        match err {
            CoerceError::Conversion(source) => BindError::Conversion {
                field: field.into(),
                source,
            },
            CoerceError::Unsupported(category) => BindError::Unsupported {
                field: field.into(),
                category,
            },
        }
    }

    pub(crate) fn from_time(field: impl Into<String>, err: TimeError) -> Self {
        match err {
            TimeError::Conversion(source) => BindError::Conversion {
                field: field.into(),
                source,
            },
            TimeError::Location { location, reason } => BindError::Location {
                field: field.into(),
                location,
                reason,
            },
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while building a [`crate::BinderConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unknown time zone name.
    #[error("unknown time zone {name:?}: {reason}")]
    UnknownZone { name: String, reason: String },

    /// Environment file could not be read.
    #[error("failed to read environment file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for bind operations.
pub type BindResult<T> = Result<T, BindError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
