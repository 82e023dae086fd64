//! Flat, column-major node arrays of a serialized forest.
//!
//! Every per-node array holds `rows` slots for each of `ntree` trees, tree
//! `c` occupying `[c * rows, (c + 1) * rows)`. Classification forests pack
//! both daughter arrays into `treemap`, `2 * rows` slots per tree with the
//! left daughters first.

use rfpmml_io::Rexp;
use tracing::debug;

use crate::error::ConvertError;

/// Value stored for a node in `nodepred`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prediction {
    /// Regression leaf value.
    Value(f64),
    /// Classification leaf class code (1-based into the target vocabulary).
    Class(i32),
}

/// One node slot of one tree, gathered from the parallel arrays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawNode {
    /// `0` for a leaf, else the 1-based predictor index.
    pub best_var: i32,
    /// Split threshold or category mask.
    pub split: f64,
    /// 1-based left daughter, `0` for none.
    pub left: i32,
    /// 1-based right daughter, `0` for none.
    pub right: i32,
    /// Leaf value.
    pub prediction: Prediction,
}

#[derive(Debug, Clone)]
enum Daughters {
    Separate { left: Vec<i32>, right: Vec<i32> },
    Packed(Vec<i32>),
}

#[derive(Debug, Clone)]
enum NodePredictions {
    Values(Vec<f64>),
    Classes(Vec<i32>),
}

/// Validated node arrays of a whole forest.
#[derive(Debug, Clone)]
pub struct ForestArrays {
    rows: usize,
    n_trees: usize,
    best_var: Vec<i32>,
    split: Vec<f64>,
    daughters: Daughters,
    predictions: NodePredictions,
}

impl ForestArrays {
    /// Read the arrays of a regression forest.
    ///
    /// Uses `nrnodes`, `ntree`, `leftDaughter`, `rightDaughter`, `nodepred`,
    /// `bestvar` and `xbestsplit`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ConvertError::MissingField`] | an array is absent |
    /// | [`ConvertError::InvalidDimension`] | `nrnodes` or `ntree` is not a count |
    /// | [`ConvertError::NonIntegerIndex`] | an index array holds a fractional real |
    /// | [`ConvertError::ArrayLength`] | an array is shorter than `rows * ntree` |
    pub fn regression(forest: &Rexp) -> Result<Self, ConvertError> {
        let (rows, n_trees) = dimensions(forest)?;
        let slots = slot_count(rows, n_trees, 1)?;

        let arrays = Self {
            rows,
            n_trees,
            best_var: sized(
                decode_indices(forest.field("bestvar")?, "bestvar")?,
                "bestvar",
                slots,
            )?,
            split: sized(
                decode_reals(forest.field("xbestsplit")?),
                "xbestsplit",
                slots,
            )?,
            daughters: Daughters::Separate {
                left: sized(
                    decode_indices(forest.field("leftDaughter")?, "leftDaughter")?,
                    "leftDaughter",
                    slots,
                )?,
                right: sized(
                    decode_indices(forest.field("rightDaughter")?, "rightDaughter")?,
                    "rightDaughter",
                    slots,
                )?,
            },
            predictions: NodePredictions::Values(sized(
                decode_reals(forest.field("nodepred")?),
                "nodepred",
                slots,
            )?),
        };
        debug!(rows, n_trees, "regression arrays loaded");
        Ok(arrays)
    }

    /// Read the arrays of a classification forest.
    ///
    /// Uses `nrnodes`, `ntree`, `treemap`, `nodepred`, `bestvar` and
    /// `xbestsplit`.
    ///
    /// # Errors
    ///
    /// Same as [`ForestArrays::regression`]; `treemap` must hold
    /// `2 * rows * ntree` entries.
    pub fn classification(forest: &Rexp) -> Result<Self, ConvertError> {
        let (rows, n_trees) = dimensions(forest)?;
        let slots = slot_count(rows, n_trees, 1)?;
        let packed_slots = slot_count(rows, n_trees, 2)?;

        let arrays = Self {
            rows,
            n_trees,
            best_var: sized(
                decode_indices(forest.field("bestvar")?, "bestvar")?,
                "bestvar",
                slots,
            )?,
            split: sized(
                decode_reals(forest.field("xbestsplit")?),
                "xbestsplit",
                slots,
            )?,
            daughters: Daughters::Packed(sized(
                decode_indices(forest.field("treemap")?, "treemap")?,
                "treemap",
                packed_slots,
            )?),
            predictions: NodePredictions::Classes(sized(
                decode_indices(forest.field("nodepred")?, "nodepred")?,
                "nodepred",
                slots,
            )?),
        };
        debug!(rows, n_trees, "classification arrays loaded");
        Ok(arrays)
    }

    /// Return the number of node slots per tree.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Gather the node slots of tree `column` (zero-based).
    ///
    /// # Panics
    ///
    /// Panics if `column >= self.n_trees()`.
    #[must_use]
    pub fn tree(&self, column: usize) -> Vec<RawNode> {
        assert!(column < self.n_trees, "tree column {column} out of range");
        let start = column * self.rows;
        let (left, right) = match &self.daughters {
            Daughters::Separate { left, right } => (
                &left[start..start + self.rows],
                &right[start..start + self.rows],
            ),
            Daughters::Packed(treemap) => {
                let packed = &treemap[2 * start..2 * start + 2 * self.rows];
                packed.split_at(self.rows)
            }
        };

        (0..self.rows)
            .map(|i| RawNode {
                best_var: self.best_var[start + i],
                split: self.split[start + i],
                left: left[i],
                right: right[i],
                prediction: match &self.predictions {
                    NodePredictions::Values(v) => Prediction::Value(v[start + i]),
                    NodePredictions::Classes(c) => Prediction::Class(c[start + i]),
                },
            })
            .collect()
    }
}

fn dimensions(forest: &Rexp) -> Result<(usize, usize), ConvertError> {
    let rows = decode_count(forest.field("nrnodes")?, "nrnodes")?;
    let n_trees = decode_count(forest.field("ntree")?, "ntree")?;
    Ok((rows, n_trees))
}

fn slot_count(rows: usize, n_trees: usize, per_row: usize) -> Result<usize, ConvertError> {
    rows.checked_mul(n_trees)
        .and_then(|n| n.checked_mul(per_row))
        .ok_or(ConvertError::InvalidDimension {
            name: "nrnodes".into(),
            value: rows as f64,
        })
}

/// Keep only the first `expected` entries, failing if there are fewer.
fn sized<T>(mut values: Vec<T>, name: &str, expected: usize) -> Result<Vec<T>, ConvertError> {
    if values.len() < expected {
        return Err(ConvertError::ArrayLength {
            name: name.to_string(),
            expected,
            got: values.len(),
        });
    }
    values.truncate(expected);
    Ok(values)
}

/// Decode an index vector stored either as integers or as integral reals.
pub(crate) fn decode_indices(rexp: &Rexp, name: &str) -> Result<Vec<i32>, ConvertError> {
    if !rexp.int_values().is_empty() {
        return Ok(rexp.int_values().to_vec());
    }
    rexp.real_values()
        .iter()
        .enumerate()
        .map(|(position, &value)| {
            as_index(value).ok_or_else(|| ConvertError::NonIntegerIndex {
                name: name.to_string(),
                position,
                value,
            })
        })
        .collect()
}

/// Decode a real vector, widening integer storage if that is what is present.
pub(crate) fn decode_reals(rexp: &Rexp) -> Vec<f64> {
    if !rexp.real_values().is_empty() {
        return rexp.real_values().to_vec();
    }
    rexp.int_values().iter().map(|&v| f64::from(v)).collect()
}

/// Decode a non-negative count scalar stored as an integer or a real.
pub(crate) fn decode_count(rexp: &Rexp, name: &str) -> Result<usize, ConvertError> {
    let value = match (rexp.int_values().first(), rexp.real_values().first()) {
        (Some(&v), _) => f64::from(v),
        (None, Some(&v)) => v,
        (None, None) => f64::NAN,
    };
    match as_index(value) {
        Some(count) if count >= 0 => Ok(count as usize),
        _ => Err(ConvertError::InvalidDimension {
            name: name.to_string(),
            value,
        }),
    }
}

fn as_index(value: f64) -> Option<i32> {
    let integral = value.is_finite() && value.fract() == 0.0;
    let in_range = value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX);
    (integral && in_range).then_some(value as i32)
}
