//! Field model: categories and the mutable view the binder works through.
//!
//! Every bindable type implements [`Field`]. The binder never names concrete
//! field types; it asks a field for its [`Category`] and a [`View`] and routes
//! on that, the same way a reflective binder would route on a value's kind.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::coerce::CoerceError;
use crate::descriptor::Fields;
use crate::parser::ParserField;

// =============================================================================
// Category
// =============================================================================

/// Static or runtime shape of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Bool,
    String,
    /// `Option<T>`
    Optional,
    /// Growable sequence (`Vec<T>`)
    Sequence,
    /// Fixed-size sequence (`[T; N]`)
    Array,
    /// Key/value mapping
    Map,
    /// Composite record
    Record,
    /// Temporal value
    Time,
}

impl Category {
    /// Lowercase name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::I8 => "i8",
            Category::I16 => "i16",
            Category::I32 => "i32",
            Category::I64 => "i64",
            Category::Isize => "isize",
            Category::U8 => "u8",
            Category::U16 => "u16",
            Category::U32 => "u32",
            Category::U64 => "u64",
            Category::Usize => "usize",
            Category::F32 => "f32",
            Category::F64 => "f64",
            Category::Bool => "bool",
            Category::String => "string",
            Category::Optional => "optional",
            Category::Sequence => "sequence",
            Category::Array => "array",
            Category::Map => "map",
            Category::Record => "record",
            Category::Time => "time",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Field and View
// =============================================================================

/// A value the binder can inspect and mutate in place.
pub trait Field {
    /// Static category of the field's type.
    fn category(&self) -> Category;

    /// Mutable view used to route and assign.
    fn view(&mut self) -> View<'_>;
}

/// Mutable view of a field, one variant per binding path.
pub enum View<'a> {
    Scalar(Scalar<'a>),
    Optional(&'a mut dyn OptionalField),
    Sequence(&'a mut dyn SequenceField),
    Time(&'a mut dyn Temporal),
    Record(&'a mut dyn Fields),
    Parser(&'a mut dyn ParserField),
    /// No built-in binding path (arrays, maps, ...).
    Opaque,
}

/// Mutable reference to a primitive.
pub enum Scalar<'a> {
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
    F32(&'a mut f32),
    F64(&'a mut f64),
    Bool(&'a mut bool),
    Str(&'a mut String),
}

/// An optional field that can be allocated on first set.
pub trait OptionalField {
    fn is_present(&self) -> bool;

    /// Allocate the pointee with its default value if unset, then return it.
    fn ensure_present(&mut self) -> &mut dyn Field;
}

/// Element binder handed to [`SequenceField::rebuild`].
pub type ElementBinder<'b> = &'b dyn Fn(&mut dyn Field, &str) -> Result<(), CoerceError>;

/// A growable sequence rebuilt from raw values.
pub trait SequenceField {
    /// Replace the sequence with one element per raw value.
    ///
    /// The sequence is left untouched if any element fails; the error carries
    /// the failing index.
    fn rebuild(&mut self, raws: &[String], bind: ElementBinder<'_>)
        -> Result<(), (usize, CoerceError)>;
}

/// A temporal value.
pub trait Temporal {
    /// Store the instant, converted to this field's representation.
    fn assign(&mut self, instant: DateTime<FixedOffset>);

    /// Reset to the zero value.
    fn reset(&mut self);
}

// =============================================================================
// Primitive impls
// =============================================================================

macro_rules! scalar_field {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Field for $ty {
                fn category(&self) -> Category {
                    Category::$variant
                }

                fn view(&mut self) -> View<'_> {
                    View::Scalar(Scalar::$variant(self))
                }
            }
        )*
    };
}

scalar_field! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    bool => Bool,
}

impl Field for String {
    fn category(&self) -> Category {
        Category::String
    }

    fn view(&mut self) -> View<'_> {
        View::Scalar(Scalar::Str(self))
    }
}

// =============================================================================
// Containers
// =============================================================================

impl<T: Field + Default> Field for Option<T> {
    fn category(&self) -> Category {
        Category::Optional
    }

    fn view(&mut self) -> View<'_> {
        View::Optional(self)
    }
}

impl<T: Field + Default> OptionalField for Option<T> {
    fn is_present(&self) -> bool {
        self.is_some()
    }

    fn ensure_present(&mut self) -> &mut dyn Field {
        self.get_or_insert_with(T::default)
    }
}

impl<T: Field + Default> Field for Vec<T> {
    fn category(&self) -> Category {
        Category::Sequence
    }

    fn view(&mut self) -> View<'_> {
        View::Sequence(self)
    }
}

impl<T: Field + Default> SequenceField for Vec<T> {
    fn rebuild(
        &mut self,
        raws: &[String],
        bind: ElementBinder<'_>,
    ) -> Result<(), (usize, CoerceError)> {
        let mut rebuilt = Vec::with_capacity(raws.len());
        for (index, raw) in raws.iter().enumerate() {
            let mut element = T::default();
            bind(&mut element, raw).map_err(|e| (index, e))?;
            rebuilt.push(element);
        }
        *self = rebuilt;
        Ok(())
    }
}

impl<T: Field, const N: usize> Field for [T; N] {
    fn category(&self) -> Category {
        Category::Array
    }

    fn view(&mut self) -> View<'_> {
        View::Opaque
    }
}

impl<K, V, S> Field for HashMap<K, V, S> {
    fn category(&self) -> Category {
        Category::Map
    }

    fn view(&mut self) -> View<'_> {
        View::Opaque
    }
}

impl<K, V> Field for BTreeMap<K, V> {
    fn category(&self) -> Category {
        Category::Map
    }

    fn view(&mut self) -> View<'_> {
        View::Opaque
    }
}

// =============================================================================
// Temporal impls
// =============================================================================

macro_rules! time_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Field for $ty {
                fn category(&self) -> Category {
                    Category::Time
                }

                fn view(&mut self) -> View<'_> {
                    View::Time(self)
                }
            }
        )*
    };
}

time_field!(
    DateTime<FixedOffset>,
    DateTime<Utc>,
    DateTime<Local>,
    NaiveDateTime,
    NaiveDate,
);

impl Temporal for DateTime<FixedOffset> {
    fn assign(&mut self, instant: DateTime<FixedOffset>) {
        *self = instant;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Temporal for DateTime<Utc> {
    fn assign(&mut self, instant: DateTime<FixedOffset>) {
        *self = instant.with_timezone(&Utc);
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Temporal for DateTime<Local> {
    fn assign(&mut self, instant: DateTime<FixedOffset>) {
        *self = instant.with_timezone(&Local);
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

// Naive values keep the wall-clock time of the resolved zone.
impl Temporal for NaiveDateTime {
    fn assign(&mut self, instant: DateTime<FixedOffset>) {
        *self = instant.naive_local();
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Temporal for NaiveDate {
    fn assign(&mut self, instant: DateTime<FixedOffset>) {
        *self = instant.date_naive();
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
