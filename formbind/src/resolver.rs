//! Field resolver: turns a field's raw form tag and time directives into a
//! typed [`FieldConfig`].
//!
//! Tag grammar: `key[,default=literal]`. An absent tag and a tag with an
//! empty key both mean "untagged": the field must be a record (or an optional
//! record) and is flattened into its parent.

use serde::Serialize;

use crate::coerce::parse_bool;

/// Resolved binding metadata for one record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldConfig {
    /// Declared field name, used in error messages.
    pub name: String,
    /// Lookup key in the form; the field name when untagged.
    pub key: String,
    /// Literal used when the key is absent from the form.
    pub default: Option<String>,
    /// False when the field has no usable form key.
    pub tagged: bool,
    pub time: TimeDirectives,
}

/// Per-field directives for temporal fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeDirectives {
    /// chrono `strftime` layout.
    pub format: Option<String>,
    /// Parse and store in UTC.
    pub utc: bool,
    /// IANA zone name.
    pub location: Option<String>,
}

/// Raw, unparsed metadata of a field as declared on the record.
#[derive(Debug, Clone, Default)]
pub struct RawField {
    pub tag: Option<String>,
    pub time_format: Option<String>,
    pub time_utc: Option<String>,
    pub time_location: Option<String>,
}

/// Split a form tag into its key and optional default literal.
///
/// Everything after the first comma is a single directive, so defaults may
/// contain commas. Unknown directives are ignored.
pub fn parse_tag(tag: &str) -> (String, Option<String>) {
    let (key, directive) = match tag.split_once(',') {
        Some((key, rest)) => (key, Some(rest)),
        None => (tag, None),
    };

    let default = directive.and_then(|d| match d.trim().split_once('=') {
        Some(("default", value)) => Some(value.to_string()),
        _ => None,
    });

    (key.to_string(), default)
}

/// Resolve a declared field into its binding configuration.
pub fn resolve(name: &str, raw: &RawField) -> FieldConfig {
    let (key, default) = raw.tag.as_deref().map(parse_tag).unwrap_or_default();
    let tagged = !key.is_empty();

    let time = TimeDirectives {
        format: raw.time_format.clone().filter(|f| !f.is_empty()),
        utc: raw
            .time_utc
            .as_deref()
            .and_then(|v| parse_bool(v).ok())
            .unwrap_or(false),
        location: raw.time_location.clone().filter(|l| !l.is_empty()),
    };

    FieldConfig {
        name: name.to_string(),
        key: if tagged { key } else { name.to_string() },
        default,
        tagged,
        time,
    }
}
