//! Split encoding: one `(field, split code)` pair to a left/right
//! predicate pair.

use std::collections::HashMap;

use rfpmml_pmml::{DataField, DataType, Predicate, SimpleOperator, format_value};

use crate::config::CacheMode;
use crate::error::SplitCodeError;

/// Predicates guarding the left and right child of a split, in that order.
pub type PredicatePair = (Predicate, Predicate);

/// Largest categorical split code that is still an exact integer in `f64`.
const MAX_CATEGORY_MASK: f64 = 9_007_199_254_740_992.0; // 2^53

/// Encode the predicates of a split on `field` at `split`.
///
/// - boolean fields compare for equality; the left literal is `"true"`
///   iff `split > 0.5`, the right literal is its negation
/// - continuous fields produce `field <= s` / `field > s`
/// - categorical fields read `split` as a bit mask over the vocabulary,
///   see [`split_categories`]
///
/// # Errors
///
/// Returns [`SplitCodeError`] if `split` is infinite or `NaN`, or if the
/// field is categorical and `split` is not a positive integer below 2^53.
pub fn encode_split(field: &DataField, split: f64) -> Result<PredicatePair, SplitCodeError> {
    if !split.is_finite() {
        return Err(SplitCodeError { split });
    }
    let name = field.name();
    match field.data_type() {
        DataType::Boolean => {
            let left = split > 0.5;
            Ok((
                Predicate::simple(name, SimpleOperator::Equal, left.to_string()),
                Predicate::simple(name, SimpleOperator::Equal, (!left).to_string()),
            ))
        }
        DataType::Double => {
            let value = format_value(split);
            Ok((
                Predicate::simple(name, SimpleOperator::LessOrEqual, value.clone()),
                Predicate::simple(name, SimpleOperator::GreaterThan, value),
            ))
        }
        DataType::String => {
            let mask = category_mask(split)?;
            let (left, right) = split_categories(field.values(), mask);
            Ok((Predicate::is_in(name, left), Predicate::is_in(name, right)))
        }
    }
}

/// Partition `values` by the bits of `mask`.
///
/// Bit `j` (least significant first) sends `values[j]` left; every other
/// value, including those past the highest bit, goes right. Both halves
/// keep vocabulary order.
#[must_use]
pub fn split_categories(values: &[String], mask: u64) -> (Vec<String>, Vec<String>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for (j, value) in values.iter().enumerate() {
        let set = j < 64 && (mask >> j) & 1 == 1;
        if set {
            left.push(value.clone());
        } else {
            right.push(value.clone());
        }
    }
    (left, right)
}

fn category_mask(split: f64) -> Result<u64, SplitCodeError> {
    let valid = split.fract() == 0.0 && (1.0..MAX_CATEGORY_MASK).contains(&split);
    if !valid {
        return Err(SplitCodeError { split });
    }
    Ok(split as u64)
}

/// Predicate encoder owned by a single conversion.
///
/// With [`CacheMode::Enabled`], pairs are memoized by predictor index and
/// the bit pattern of the split code. The memo table is dropped with the
/// encoder.
#[derive(Debug, Clone)]
pub struct PredicateEncoder {
    cache: Option<HashMap<(usize, u64), PredicatePair>>,
    hits: usize,
}

impl PredicateEncoder {
    /// Create an encoder.
    #[must_use]
    pub fn new(mode: CacheMode) -> Self {
        let cache = match mode {
            CacheMode::Enabled => Some(HashMap::new()),
            CacheMode::Disabled => None,
        };
        Self { cache, hits: 0 }
    }

    /// Encode a split on predictor `var` (its 1-based variable index).
    ///
    /// # Errors
    ///
    /// Same as [`encode_split`]. Failed encodings are not cached.
    pub fn encode(
        &mut self,
        var: usize,
        field: &DataField,
        split: f64,
    ) -> Result<PredicatePair, SplitCodeError> {
        let Some(cache) = self.cache.as_mut() else {
            return encode_split(field, split);
        };

        let key = (var, split.to_bits());
        if let Some(pair) = cache.get(&key) {
            self.hits += 1;
            return Ok(pair.clone());
        }
        let pair = encode_split(field, split)?;
        cache.insert(key, pair.clone());
        Ok(pair)
    }

    /// Return the number of distinct pairs held in the memo table.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.as_ref().map_or(0, HashMap::len)
    }

    /// Return how many encodings were served from the memo table.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits
    }
}
