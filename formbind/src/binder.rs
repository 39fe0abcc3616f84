//! Binder: the entry point that walks a record and binds every field.
//!
//! ## Routing
//!
//! ```text
//! untagged field ──▶ record / optional record ──▶ recurse with the same form
//!                └─▶ anything else ──────────────▶ NoTag error
//!
//! tagged field ──▶ values (or default, or skip)
//!                    │
//!                    ├─▶ custom parser (field or optional pointee)
//!                    ├─▶ sequence, when at least one value is supplied
//!                    ├─▶ time (field or optional pointee)
//!                    └─▶ coercer
//! ```
//!
//! The first failure aborts the bind call; fields already bound keep their
//! new values.

use std::borrow::Cow;

use crate::coerce::coerce;
use crate::config::BinderConfig;
use crate::descriptor::RecordDescriptor;
use crate::error::{BindError, BindResult};
use crate::field::{Category, Field, View};
use crate::form::Form;
use crate::parser;
use crate::resolver::FieldConfig;
use crate::slice::bind_slice;
use crate::time::bind_time;

/// Binds forms onto records.
///
/// A binder is immutable and can be shared across threads; each call only
/// mutates its own target.
#[derive(Debug, Clone, Default)]
pub struct Binder {
    config: BinderConfig,
}

impl Binder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BinderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Bind `form` onto `target`.
    ///
    /// `target` must be a record, or an `Option` holding one.
    pub fn bind(&self, form: &Form, target: &mut dyn Field) -> BindResult<()> {
        let category = target.category();
        match target.view() {
            View::Record(record) => {
                log::trace!("binding {} from {} key(s)", record.record_name(), form.len());
                record.bind_fields(self, form)
            }
            View::Optional(optional) if optional.is_present() => {
                self.bind(form, optional.ensure_present())
            }
            View::Optional(_) => Err(BindError::InvalidTarget {
                found: "unset optional".to_string(),
            }),
            _ => Err(BindError::InvalidTarget {
                found: category.to_string(),
            }),
        }
    }

    /// Bind every field of `record` in declaration order.
    pub(crate) fn bind_record<R>(
        &self,
        descriptor: &RecordDescriptor<R>,
        record: &mut R,
        form: &Form,
    ) -> BindResult<()> {
        for field in descriptor.fields() {
            let config = field.config();
            let target = field.get(record);

            if !config.tagged {
                log::trace!("{}.{}: flattening", descriptor.name(), config.name);
                self.flatten(target, config, form)?;
                continue;
            }

            let values: Cow<'_, [String]> = match (form.get(&config.key), &config.default) {
                (Some(values), _) => Cow::Borrowed(values),
                (None, Some(default)) => Cow::Owned(vec![default.clone()]),
                (None, None) => {
                    log::trace!(
                        "{}.{}: key {:?} absent",
                        descriptor.name(),
                        config.name,
                        config.key
                    );
                    continue;
                }
            };

            log::trace!(
                "{}.{}: key {:?}, {} value(s)",
                descriptor.name(),
                config.name,
                config.key,
                values.len()
            );
            self.bind_values(target, config, &values)?;
        }
        Ok(())
    }

    /// Recurse into an untagged record field with the enclosing form.
    fn flatten(&self, target: &mut dyn Field, config: &FieldConfig, form: &Form) -> BindResult<()> {
        let category = target.category();
        match target.view() {
            View::Record(record) => record.bind_fields(self, form),
            View::Optional(optional) => {
                let pointee = optional.ensure_present();
                let pointee_category = pointee.category();
                match pointee.view() {
                    View::Record(record) => record.bind_fields(self, form),
                    _ => Err(BindError::NoTag {
                        field: config.name.clone(),
                        category: pointee_category,
                    }),
                }
            }
            _ => Err(BindError::NoTag {
                field: config.name.clone(),
                category,
            }),
        }
    }

    /// Bind the values found for one tagged field.
    fn bind_values(
        &self,
        target: &mut dyn Field,
        config: &FieldConfig,
        values: &[String],
    ) -> BindResult<()> {
        // A key present with no values binds as one empty value.
        let raw = values.first().map(String::as_str).unwrap_or("");

        if let Some(result) = parser::dispatch(target, &config.name, raw) {
            return result;
        }

        match target.category() {
            Category::Sequence => {
                if values.is_empty() {
                    return Ok(());
                }
                match target.view() {
                    View::Sequence(sequence) => bind_slice(sequence, &config.name, values),
                    _ => Err(BindError::Unsupported {
                        field: config.name.clone(),
                        category: Category::Sequence,
                    }),
                }
            }
            Category::Time => self.bind_temporal(target, config, raw),
            Category::Optional => match target.view() {
                View::Optional(optional) => {
                    let pointee = optional.ensure_present();
                    if pointee.category() == Category::Time {
                        self.bind_temporal(pointee, config, raw)
                    } else {
                        coerce(pointee, raw)
                            .map_err(|e| BindError::from_coerce(config.name.as_str(), e))
                    }
                }
                _ => Err(BindError::Unsupported {
                    field: config.name.clone(),
                    category: Category::Optional,
                }),
            },
            _ => coerce(target, raw).map_err(|e| BindError::from_coerce(config.name.as_str(), e)),
        }
    }

    fn bind_temporal(
        &self,
        target: &mut dyn Field,
        config: &FieldConfig,
        raw: &str,
    ) -> BindResult<()> {
        match target.view() {
            View::Time(temporal) => bind_time(
                temporal,
                raw,
                &config.time,
                self.config.time_format.as_deref(),
                &self.config.time_zone,
            )
            .map_err(|e| BindError::from_time(config.name.as_str(), e)),
            _ => Err(BindError::Unsupported {
                field: config.name.clone(),
                category: Category::Time,
            }),
        }
    }
}

/// Bind `form` onto `target` with a default [`Binder`].
pub fn bind(form: &Form, target: &mut dyn Field) -> BindResult<()> {
    Binder::new().bind(form, target)
}
