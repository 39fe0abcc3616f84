//! Custom field parsers.
//!
//! A type opts in by implementing [`FieldParse`] and registering itself with
//! [`field_parser!`](crate::field_parser). Such a field (or an `Option` of
//! one) is always bound through its parser, before any built-in path, using
//! the first raw value of its key.
//!
//! ```rust,ignore
//! use std::collections::HashMap;
//! use formbind::{field_parser, BoxError, Category, FieldParse, Parsed};
//!
//! #[derive(Debug, Default)]
//! struct Pairs(HashMap<String, String>);
//!
//! impl FieldParse for Pairs {
//!     const CATEGORY: Category = Category::Map;
//!
//!     fn field_parse(input: &str) -> Result<Parsed, BoxError> {
//!         let mut out = HashMap::new();
//!         for pair in input.split(',') {
//!             let (k, v) = pair.split_once(':').ok_or("missing ':'")?;
//!             out.insert(k.trim().to_string(), v.trim().to_string());
//!         }
//!         Ok(Parsed::new(Pairs(out)))
//!     }
//! }
//!
//! field_parser!(Pairs);
//! ```

use std::any::{type_name, Any};
use std::fmt;

use crate::error::{BindError, BoxError};
use crate::field::{Category, Field, View};

/// Conversion capability a field type opts into.
pub trait FieldParse: Sized + 'static {
    /// Static category of the implementing type; the parsed value must match it.
    const CATEGORY: Category;

    /// Convert the first raw value of the field's key.
    fn field_parse(input: &str) -> Result<Parsed, BoxError>;
}

/// Value produced by a custom parser, tagged with its runtime category.
pub struct Parsed {
    category: Category,
    type_name: &'static str,
    value: Box<dyn Any>,
}

impl Parsed {
    pub fn new<V: Field + 'static>(value: V) -> Self {
        Self {
            category: value.category(),
            type_name: type_name::<V>(),
            value: Box::new(value),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn downcast<T: 'static>(self) -> Result<T, Parsed> {
        let Parsed {
            category,
            type_name,
            value,
        } = self;
        value.downcast::<T>().map(|v| *v).map_err(|value| Parsed {
            category,
            type_name,
            value,
        })
    }
}

impl fmt::Debug for Parsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parsed")
            .field("category", &self.category)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Object-safe face of a [`FieldParse`] field.
pub trait ParserField {
    fn parser_category(&self) -> Category;

    fn parse(&self, raw: &str) -> Result<Parsed, BoxError>;

    /// Store a parsed value; hands it back if it is not of this field's type.
    fn assign(&mut self, parsed: Parsed) -> Result<(), Parsed>;
}

impl<T: FieldParse> ParserField for T {
    fn parser_category(&self) -> Category {
        T::CATEGORY
    }

    fn parse(&self, raw: &str) -> Result<Parsed, BoxError> {
        T::field_parse(raw)
    }

    fn assign(&mut self, parsed: Parsed) -> Result<(), Parsed> {
        *self = parsed.downcast::<T>()?;
        Ok(())
    }
}

/// Implement [`Field`](crate::Field) for types that implement [`FieldParse`].
#[macro_export]
macro_rules! field_parser {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Field for $ty {
                fn category(&self) -> $crate::Category {
                    <$ty as $crate::FieldParse>::CATEGORY
                }

                fn view(&mut self) -> $crate::View<'_> {
                    $crate::View::Parser(self)
                }
            }
        )+
    };
}

/// Run the custom parser of `field` (or of its optional pointee) if it has one.
///
/// Returns `None` when no parser applies. An unset optional is allocated
/// before its pointee is inspected.
pub fn dispatch(field: &mut dyn Field, name: &str, raw: &str) -> Option<Result<(), BindError>> {
    match field.view() {
        View::Parser(parser) => Some(invoke(parser, name, raw)),
        View::Optional(optional) => match optional.ensure_present().view() {
            View::Parser(parser) => Some(invoke(parser, name, raw)),
            _ => None,
        },
        _ => None,
    }
}

fn invoke(parser: &mut dyn ParserField, name: &str, raw: &str) -> Result<(), BindError> {
    let parsed = parser.parse(raw).map_err(BindError::Custom)?;

    if parsed.category() != parser.parser_category() {
        return Err(BindError::TypeMismatch {
            field: name.to_string(),
            parsed: parsed.category().to_string(),
        });
    }

    parser
        .assign(parsed)
        .map_err(|parsed| BindError::TypeMismatch {
            field: name.to_string(),
            parsed: parsed.type_name().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Pairs(HashMap<String, String>);

    impl FieldParse for Pairs {
        const CATEGORY: Category = Category::Map;

        fn field_parse(input: &str) -> Result<Parsed, BoxError> {
            let mut out = HashMap::new();
            for pair in input.split(',') {
                let (k, v) = pair.split_once(':').ok_or("missing ':' in pair")?;
                out.insert(k.trim().to_string(), v.trim().to_string());
            }
            Ok(Parsed::new(Pairs(out)))
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Tags(Vec<String>);

    impl FieldParse for Tags {
        const CATEGORY: Category = Category::Sequence;

        fn field_parse(_input: &str) -> Result<Parsed, BoxError> {
            Ok(Parsed::new(["sdf".to_string(), "aaa".to_string()]))
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Codes(Vec<String>);

    impl FieldParse for Codes {
        const CATEGORY: Category = Category::Sequence;

        fn field_parse(input: &str) -> Result<Parsed, BoxError> {
            Ok(Parsed::new(input.split(',').map(str::to_string).collect::<Vec<_>>()))
        }
    }

    crate::field_parser!(Pairs, Tags, Codes);

    #[test]
    fn test_parser_assigns_value() {
        let mut pairs = Pairs::default();
        dispatch(&mut pairs, "Field1", "A:a, B:b").unwrap().unwrap();

        let expected: HashMap<_, _> = [("A", "a"), ("B", "b")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(pairs, Pairs(expected));
    }

    #[test]
    fn test_optional_parser_is_allocated() {
        let mut pairs: Option<Pairs> = None;
        dispatch(&mut pairs, "pairs", "k:v").unwrap().unwrap();
        assert_eq!(pairs.unwrap().0.get("k").map(String::as_str), Some("v"));
    }

    #[test]
    fn test_category_mismatch() {
        let mut tags = Tags(vec!["keep".into()]);
        let err = dispatch(&mut tags, "Field4", "adf, haha").unwrap().unwrap_err();
        assert_eq!(err.to_string(), "field: Field4 wrong parsed type: array");
        assert_eq!(tags.0, vec!["keep".to_string()]);
    }

    #[test]
    fn test_same_category_other_type() {
        let mut codes = Codes::default();
        let err = dispatch(&mut codes, "codes", "a,b").unwrap().unwrap_err();
        assert!(matches!(
            err,
            BindError::TypeMismatch { ref parsed, .. } if parsed.contains("Vec")
        ));
        assert!(codes.0.is_empty());
    }

    #[test]
    fn test_parser_error_is_verbatim() {
        let mut pairs = Pairs::default();
        let err = dispatch(&mut pairs, "pairs", "novalue").unwrap().unwrap_err();
        assert_eq!(err.to_string(), "missing ':' in pair");
    }

    #[test]
    fn test_no_parser() {
        let mut plain = 0i32;
        assert!(dispatch(&mut plain, "plain", "1").is_none());
        assert_eq!(plain, 0);
    }
}
