use serde::{Deserialize, Serialize};

use crate::model::Paper;
use crate::shared::{DataError, EntityKind, Result};

/// A single attribute value as returned by a data source.
///
/// `Absent` is the neutral marker for an unset optional value; list-typed
/// attributes read it as an empty list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrValue {
    #[default]
    Absent,
    Bool(bool),
    Int(i64),
    Text(String),
    TextList(Vec<String>),
    IdList(Vec<u32>),
    IntList(Vec<i64>),
    Scores(Vec<Option<i64>>),
    Papers(Vec<Paper>),
}

impl AttrValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, AttrValue::Absent)
    }

    /// Converts into a typed value, reporting `kind`/`name` on mismatch.
    pub fn into_typed<T: FromAttr>(self, kind: EntityKind, name: &str) -> Result<T> {
        T::from_attr(self).ok_or_else(|| DataError::AttributeType {
            kind,
            name: name.to_string(),
            expected: T::EXPECTED,
        })
    }
}

/// Conversion from a raw [`AttrValue`]; `None` means the shape is wrong.
pub trait FromAttr: Sized {
    const EXPECTED: &'static str;

    fn from_attr(value: AttrValue) -> Option<Self>;
}

impl FromAttr for bool {
    const EXPECTED: &'static str = "a boolean";

    fn from_attr(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl FromAttr for i64 {
    const EXPECTED: &'static str = "an integer";

    fn from_attr(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::Int(n) => Some(n),
            _ => None,
        }
    }
}

impl FromAttr for u32 {
    const EXPECTED: &'static str = "a non-negative integer";

    fn from_attr(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::Int(n) => u32::try_from(n).ok(),
            _ => None,
        }
    }
}

impl FromAttr for String {
    const EXPECTED: &'static str = "text";

    fn from_attr(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl FromAttr for Vec<String> {
    const EXPECTED: &'static str = "a list of text";

    fn from_attr(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::Absent => Some(Vec::new()),
            AttrValue::TextList(items) => Some(items),
            _ => None,
        }
    }
}

impl FromAttr for Vec<u32> {
    const EXPECTED: &'static str = "a list of ids";

    fn from_attr(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::Absent => Some(Vec::new()),
            AttrValue::IdList(ids) => Some(ids),
            _ => None,
        }
    }
}

impl FromAttr for Vec<i64> {
    const EXPECTED: &'static str = "a list of integers";

    fn from_attr(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::Absent => Some(Vec::new()),
            AttrValue::IntList(values) => Some(values),
            _ => None,
        }
    }
}

impl FromAttr for Vec<Option<i64>> {
    const EXPECTED: &'static str = "a list of scores";

    fn from_attr(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::Absent => Some(Vec::new()),
            AttrValue::Scores(scores) => Some(scores),
            AttrValue::IntList(values) => Some(values.into_iter().map(Some).collect()),
            _ => None,
        }
    }
}

impl FromAttr for Vec<Paper> {
    const EXPECTED: &'static str = "a list of papers";

    fn from_attr(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::Absent => Some(Vec::new()),
            AttrValue::Papers(papers) => Some(papers),
            _ => None,
        }
    }
}

impl<T: FromAttr> FromAttr for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_attr(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::Absent => Some(None),
            other => T::from_attr(other).map(Some),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<u32> for AttrValue {
    fn from(value: u32) -> Self {
        AttrValue::Int(i64::from(value))
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        AttrValue::TextList(value)
    }
}

impl From<Vec<&str>> for AttrValue {
    fn from(value: Vec<&str>) -> Self {
        AttrValue::TextList(value.into_iter().map(String::from).collect())
    }
}

impl From<Vec<u32>> for AttrValue {
    fn from(value: Vec<u32>) -> Self {
        AttrValue::IdList(value)
    }
}

impl From<Vec<i64>> for AttrValue {
    fn from(value: Vec<i64>) -> Self {
        AttrValue::IntList(value)
    }
}

impl From<Vec<Option<i64>>> for AttrValue {
    fn from(value: Vec<Option<i64>>) -> Self {
        AttrValue::Scores(value)
    }
}

impl From<Vec<Paper>> for AttrValue {
    fn from(value: Vec<Paper>) -> Self {
        AttrValue::Papers(value)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AttrValue::Absent)
    }
}
