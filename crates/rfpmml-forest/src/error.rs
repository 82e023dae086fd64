use rfpmml_io::IoError;

/// Errors from converting a source model into a document.
///
/// Tree numbers are 1-based (matching segment ids) and node numbers are the
/// 1-based positions in the source arrays (matching node ids).
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Returned when a required list element is absent.
    #[error("required field {name} not in {available:?}")]
    MissingField {
        /// The element name that was sought.
        name: String,
        /// The element names present.
        available: Vec<String>,
    },

    /// Returned when a required attribute is absent.
    #[error("required attribute {name} not in {available:?}")]
    MissingAttribute {
        /// The attribute name that was sought.
        name: String,
        /// The attribute names present.
        available: Vec<String>,
    },

    /// Returned when training metadata declares an unknown column type.
    #[error("field {field} has unsupported type {type_tag:?}")]
    UnsupportedFieldType {
        /// The field name.
        field: String,
        /// The declared type tag.
        type_tag: String,
    },

    /// Returned when the model is neither a regression nor a classification.
    #[error("unsupported model function {function:?}")]
    UnsupportedFunction {
        /// The declared function.
        function: String,
    },

    /// Returned when the source object is not a supported model family.
    #[error("unsupported model class {classes:?}")]
    UnsupportedModelClass {
        /// Entries of the object's class attribute.
        classes: Vec<String>,
    },

    /// Returned when node links violate the binary tree shape.
    #[error("malformed tree {tree} at node {node}: {reason}")]
    MalformedTree {
        /// 1-based tree number.
        tree: usize,
        /// 1-based node number.
        node: usize,
        /// What is wrong with the node.
        reason: &'static str,
    },

    /// Returned when a split code is not finite, or a categorical split code
    /// is not a positive integer mask.
    #[error("invalid split code {split} on field {field} in tree {tree}, node {node}")]
    InvalidSplitCode {
        /// 1-based tree number.
        tree: usize,
        /// 1-based node number.
        node: usize,
        /// The split field.
        field: String,
        /// The raw split code.
        split: f64,
    },

    /// Returned when a node splits on a variable outside the predictor list.
    #[error("tree {tree}, node {node} splits on variable {index}, but there are {n_predictors} predictors")]
    InvalidVariableIndex {
        /// 1-based tree number.
        tree: usize,
        /// 1-based node number.
        node: usize,
        /// The raw 1-based variable index.
        index: i32,
        /// Number of predictors in the field dictionary.
        n_predictors: usize,
    },

    /// Returned when a child link points outside the tree.
    #[error("tree {tree}, node {node} links to child {child} outside 1..={rows}")]
    InvalidChildIndex {
        /// 1-based tree number.
        tree: usize,
        /// 1-based node number.
        node: usize,
        /// The raw 1-based child index.
        child: i32,
        /// Number of node slots per tree.
        rows: usize,
    },

    /// Returned when a classification leaf names a class with no label.
    #[error("tree {tree}, node {node} predicts class code {code}, but the target has {n_levels} levels")]
    UnknownClassCode {
        /// 1-based tree number.
        tree: usize,
        /// 1-based node number.
        node: usize,
        /// The raw 1-based class code.
        code: i32,
        /// Size of the target vocabulary.
        n_levels: usize,
    },

    /// Returned when a regression leaf predicts an infinite or `NaN` value.
    #[error("tree {tree}, node {node} predicts non-finite value {value}")]
    NonFiniteScore {
        /// 1-based tree number.
        tree: usize,
        /// 1-based node number.
        node: usize,
        /// The raw prediction.
        value: f64,
    },

    /// Returned when a real-coded index array holds a non-integral value.
    #[error("{name}[{position}] = {value} is not an integer index")]
    NonIntegerIndex {
        /// The source array name.
        name: String,
        /// Zero-based position in the array.
        position: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when a node array is too short for the declared dimensions.
    #[error("{name} has {got} elements, expected at least {expected}")]
    ArrayLength {
        /// The source array name.
        name: String,
        /// Required element count.
        expected: usize,
        /// Actual element count.
        got: usize,
    },

    /// Returned when a dimension scalar is negative, non-integral or absent.
    #[error("{name} = {value} is not a valid dimension")]
    InvalidDimension {
        /// The source scalar name.
        name: String,
        /// The offending value (`NaN` when absent).
        value: f64,
    },

    /// Returned when per-predictor metadata disagrees with the field list.
    #[error("{name} describes {got} predictors, but the field dictionary has {expected}")]
    PredictorCountMismatch {
        /// The source array name.
        name: String,
        /// Predictors in the field dictionary.
        expected: usize,
        /// Entries in the source array.
        got: usize,
    },

    /// Returned for any other malformed source object.
    #[error("malformed source model")]
    Source {
        /// The underlying lookup error.
        source: IoError,
    },
}

impl From<IoError> for ConvertError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::FieldNotFound { name, available } => {
                ConvertError::MissingField { name, available }
            }
            IoError::AttributeNotFound { name, available } => {
                ConvertError::MissingAttribute { name, available }
            }
            other => ConvertError::Source { source: other },
        }
    }
}

/// Returned by [`encode_split`](crate::encode_split) when a split code is not
/// finite, or a categorical split code cannot be read as a category mask.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("split code {split} is not a finite threshold or a positive integer category mask")]
pub struct SplitCodeError {
    /// The offending split code.
    pub split: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_errors_map_to_missing_variants() {
        let err: ConvertError = IoError::FieldNotFound {
            name: "forest".into(),
            available: vec!["type".into()],
        }
        .into();
        assert!(matches!(err, ConvertError::MissingField { ref name, .. } if name == "forest"));
        assert_eq!(err.to_string(), "required field forest not in [\"type\"]");

        let err: ConvertError = IoError::AttributeNotFound {
            name: "levels".into(),
            available: vec![],
        }
        .into();
        assert!(matches!(err, ConvertError::MissingAttribute { .. }));
    }

    #[test]
    fn other_io_errors_are_wrapped() {
        let err: ConvertError = IoError::MissingElement {
            kind: "string",
            index: 0,
            len: 0,
        }
        .into();
        assert!(matches!(err, ConvertError::Source { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }
}
