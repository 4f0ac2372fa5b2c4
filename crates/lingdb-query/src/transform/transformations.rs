//! General transformations over context values.

use lingdb_core::{intersect_ordered, Context, DatapointValue, Primitive};

use super::{expect_collection, expect_context, TransformError, Transformation};
use crate::result::ResultValue;

/// Returns the length of a collection, or the character count of a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Length;

impl Transformation for Length {
    fn name(&self) -> &str {
        "Length"
    }

    fn apply(&self, input: &ResultValue) -> Result<Context, TransformError> {
        let context = expect_context(self.name(), input)?;
        let len = match context {
            DatapointValue::Collection(items) => items.len(),
            DatapointValue::Primitive(Primitive::Text(text)) => text.chars().count(),
            other => {
                return Err(TransformError::unexpected(
                    self.name(),
                    "list or str",
                    other.type_name(),
                ))
            }
        };
        Ok(DatapointValue::from(len as i64))
    }
}

/// Keeps the elements of a collection that also occur in a fixed target
/// collection, in the input's order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intersection {
    targets: Vec<Primitive>,
}

impl Intersection {
    pub fn new<I, P>(targets: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Primitive>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }

    pub fn targets(&self) -> &[Primitive] {
        &self.targets
    }
}

impl Transformation for Intersection {
    fn name(&self) -> &str {
        "Intersection"
    }

    fn apply(&self, input: &ResultValue) -> Result<Context, TransformError> {
        let context = expect_context(self.name(), input)?;
        let items = expect_collection(self.name(), context)?;
        Ok(DatapointValue::Collection(intersect_ordered(
            items,
            &self.targets,
        )))
    }
}
