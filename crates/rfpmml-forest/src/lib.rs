//! Random forest to PMML conversion.
//!
//! Rebuilds the per-tree binary decision trees of a serialized random forest
//! from its flat, column-major node arrays, derives the field dictionary and
//! category vocabularies from training metadata, encodes every split as a
//! complementary predicate pair, and assembles the trees into a segmented
//! ensemble document.
//!
//! Each conversion owns all of its intermediate state, so independent
//! models can be converted concurrently.

mod arrays;
mod assemble;
mod config;
mod convert;
mod error;
mod fields;
mod predicate;
mod reconstruct;

pub use arrays::{ForestArrays, Prediction, RawNode};
pub use assemble::{assemble, global_mining_schema, multiple_model_method, tree_mining_schema};
pub use config::{CacheMode, ConverterConfig};
pub use convert::{RANDOM_FOREST_CLASS, RandomForestConverter, convert, mining_function};
pub use error::{ConvertError, SplitCodeError};
pub use fields::{FieldDictionary, TrainingInterface, derive_fields};
pub use predicate::{PredicateEncoder, PredicatePair, encode_split, split_categories};
pub use reconstruct::{reconstruct_forest, reconstruct_tree};
