//! Data dictionary entries.

use std::fmt;

/// Storage type of a data field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Free-form category labels.
    String,
    /// Two-valued `"true"` / `"false"` field.
    Boolean,
    /// Real-valued measurement.
    Double,
}

/// Operational type of a data field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpType {
    /// Values compared by equality or set membership.
    Categorical,
    /// Values compared by ordering.
    Continuous,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::String => "string",
            DataType::Boolean => "boolean",
            DataType::Double => "double",
        };
        f.write_str(name)
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpType::Categorical => "categorical",
            OpType::Continuous => "continuous",
        };
        f.write_str(name)
    }
}

/// One entry of the global data dictionary.
///
/// For categorical string fields `values` holds the ordered vocabulary.
/// The order is significant: the converter decodes categorical split
/// masks against it, bit `j` selecting `values[j]`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DataField {
    name: String,
    op_type: OpType,
    data_type: DataType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    values: Vec<String>,
}

impl DataField {
    /// Create a continuous `double` field.
    #[must_use]
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op_type: OpType::Continuous,
            data_type: DataType::Double,
            values: Vec::new(),
        }
    }

    /// Create a categorical `string` field with an empty vocabulary.
    #[must_use]
    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op_type: OpType::Categorical,
            data_type: DataType::String,
            values: Vec::new(),
        }
    }

    /// Create a categorical `boolean` field.
    #[must_use]
    pub fn boolean(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op_type: OpType::Categorical,
            data_type: DataType::Boolean,
            values: Vec::new(),
        }
    }

    /// Replace the vocabulary with `values`, keeping their order.
    #[must_use]
    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = values;
        self
    }

    /// Append vocabulary entries in order.
    pub fn extend_values<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.values.extend(values);
    }

    /// Return the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the operational type.
    #[must_use]
    pub fn op_type(&self) -> OpType {
        self.op_type
    }

    /// Return the storage type.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Return the ordered vocabulary (empty for non-categorical fields).
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }
}
