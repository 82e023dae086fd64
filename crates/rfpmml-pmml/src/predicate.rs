//! Split predicates attached to tree nodes.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::format::format_string_array;

/// Comparison operator of a [`Predicate::Simple`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SimpleOperator {
    /// `field == value`
    Equal,
    /// `field <= value`
    LessOrEqual,
    /// `field > value`
    GreaterThan,
}

impl SimpleOperator {
    fn symbol(self) -> &'static str {
        match self {
            SimpleOperator::Equal => "==",
            SimpleOperator::LessOrEqual => "<=",
            SimpleOperator::GreaterThan => ">",
        }
    }
}

/// Membership operator of a [`Predicate::SimpleSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SetOperator {
    /// `field` is one of the listed values.
    IsIn,
}

/// Ordered list of category literals.
///
/// Serializes as its whitespace-delimited text form, see
/// [`format_string_array`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StringArray(Vec<String>);

impl StringArray {
    /// Wrap the given literals, keeping their order.
    #[must_use]
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    /// Return the literals.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.0
    }

    /// Return the number of literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` if the array holds no literals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the whitespace-delimited array body.
    #[must_use]
    pub fn to_text(&self) -> String {
        format_string_array(&self.0)
    }
}

impl Serialize for StringArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

/// Condition guarding entry into a tree node or ensemble segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Always satisfied. Used for tree roots and segment guards.
    True,
    /// Compare a field against a single literal.
    Simple {
        /// Referenced field name.
        field: String,
        /// Comparison operator.
        operator: SimpleOperator,
        /// Formatted literal.
        value: String,
    },
    /// Test a field for membership in a literal set.
    SimpleSet {
        /// Referenced field name.
        field: String,
        /// Membership operator.
        operator: SetOperator,
        /// Member literals.
        array: StringArray,
    },
}

impl Predicate {
    /// Build a [`Predicate::Simple`].
    #[must_use]
    pub fn simple(
        field: impl Into<String>,
        operator: SimpleOperator,
        value: impl Into<String>,
    ) -> Self {
        Predicate::Simple {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Build an `IsIn` [`Predicate::SimpleSet`].
    #[must_use]
    pub fn is_in(field: impl Into<String>, values: Vec<String>) -> Self {
        Predicate::SimpleSet {
            field: field.into(),
            operator: SetOperator::IsIn,
            array: StringArray::new(values),
        }
    }

    /// Return the referenced field, or `None` for [`Predicate::True`].
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Predicate::True => None,
            Predicate::Simple { field, .. } | Predicate::SimpleSet { field, .. } => Some(field),
        }
    }

    /// Return `true` for [`Predicate::True`].
    #[must_use]
    pub fn is_true(&self) -> bool {
        matches!(self, Predicate::True)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::True => f.write_str("true"),
            Predicate::Simple {
                field,
                operator,
                value,
            } => write!(f, "{field} {} {value}", operator.symbol()),
            Predicate::SimpleSet { field, array, .. } => {
                write!(f, "{field} in [{}]", array.to_text())
            }
        }
    }
}
