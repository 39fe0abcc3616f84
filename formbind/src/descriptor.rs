//! Record descriptors.
//!
//! A [`RecordDescriptor`] lists a record's bindable fields in declaration
//! order, each with an accessor and its resolved [`FieldConfig`]. It is built
//! once per record type, usually by `#[derive(Record)]`, and cached for the
//! life of the process.

use std::fmt;

use crate::binder::Binder;
use crate::error::BindResult;
use crate::field::Field;
use crate::form::Form;
use crate::resolver::{resolve, FieldConfig, RawField};

/// Accessor from a record to one of its fields.
pub type Accessor<R> = fn(&mut R) -> &mut dyn Field;

/// A composite value whose fields are bound from a form.
pub trait Record: Sized + 'static {
    /// Cached descriptor of this record type.
    fn descriptor() -> &'static RecordDescriptor<Self>;
}

/// Object-safe face of a [`Record`].
pub trait Fields {
    fn record_name(&self) -> &'static str;

    /// Bind every field of this record from `form`.
    fn bind_fields(&mut self, binder: &Binder, form: &Form) -> BindResult<()>;
}

impl<R: Record> Fields for R {
    fn record_name(&self) -> &'static str {
        R::descriptor().name()
    }

    fn bind_fields(&mut self, binder: &Binder, form: &Form) -> BindResult<()> {
        binder.bind_record(R::descriptor(), self, form)
    }
}

// =============================================================================
// Descriptors
// =============================================================================

/// Bindable fields of a record type, in declaration order.
pub struct RecordDescriptor<R> {
    name: &'static str,
    fields: Vec<FieldDescriptor<R>>,
}

impl<R> RecordDescriptor<R> {
    pub fn builder(name: &'static str) -> RecordBuilder<R> {
        RecordBuilder {
            name,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor<R>] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by declared name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<R>> {
        self.fields.iter().find(|f| f.config.name == name)
    }
}

impl<R> fmt::Debug for RecordDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordDescriptor")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// One bindable field.
pub struct FieldDescriptor<R> {
    config: FieldConfig,
    access: Accessor<R>,
}

impl<R> FieldDescriptor<R> {
    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Borrow this field out of `record`.
    pub fn get<'r>(&self, record: &'r mut R) -> &'r mut dyn Field {
        (self.access)(record)
    }
}

impl<R> fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Declared field: name, accessor and raw metadata.
pub struct FieldSpec<R> {
    name: &'static str,
    access: Accessor<R>,
    raw: RawField,
}

impl<R> FieldSpec<R> {
    pub fn new(name: &'static str, access: Accessor<R>) -> Self {
        Self {
            name,
            access,
            raw: RawField::default(),
        }
    }

    /// Form tag: `key[,default=literal]`.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.raw.tag = Some(tag.into());
        self
    }

    pub fn time_format(mut self, layout: impl Into<String>) -> Self {
        self.raw.time_format = Some(layout.into());
        self
    }

    pub fn time_utc(mut self, utc: impl Into<String>) -> Self {
        self.raw.time_utc = Some(utc.into());
        self
    }

    pub fn time_location(mut self, location: impl Into<String>) -> Self {
        self.raw.time_location = Some(location.into());
        self
    }
}

/// Builder returned by [`RecordDescriptor::builder`].
pub struct RecordBuilder<R> {
    name: &'static str,
    fields: Vec<FieldDescriptor<R>>,
}

impl<R> RecordBuilder<R> {
    pub fn field(mut self, spec: FieldSpec<R>) -> Self {
        self.fields.push(FieldDescriptor {
            config: resolve(spec.name, &spec.raw),
            access: spec.access,
        });
        self
    }

    pub fn build(self) -> RecordDescriptor<R> {
        log::debug!(
            "built descriptor for {} ({} fields)",
            self.name,
            self.fields.len()
        );
        RecordDescriptor {
            name: self.name,
            fields: self.fields,
        }
    }
}
