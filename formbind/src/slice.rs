//! Slice binder: rebuilds a sequence field from every raw value of its key.

use crate::coerce::coerce;
use crate::error::{BindError, BindResult};
use crate::field::SequenceField;

/// Replace `sequence` with one coerced element per raw value, in order.
///
/// Callers skip this when no values are supplied. A failing element aborts
/// the rebuild and is reported as `name[index]`.
pub fn bind_slice(sequence: &mut dyn SequenceField, name: &str, raws: &[String]) -> BindResult<()> {
    sequence
        .rebuild(raws, &|element, raw| coerce(element, raw))
        .map_err(|(index, err)| BindError::from_coerce(format!("{name}[{index}]"), err))
}
