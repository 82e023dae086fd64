//! In-memory PMML ensemble document.
//!
//! Value types for the output side of the converter: the data dictionary,
//! mining schemas, split predicates, arena-backed decision trees and the
//! segmented mining model that ties them together. Construction is
//! infallible; the converter validates its input before building these.
//! Rendering to PMML markup is left to callers.

mod document;
mod field;
mod format;
mod predicate;
mod schema;
mod tree;

pub use document::{
    Application, Header, MiningFunction, MiningModel, MultipleModelMethod, Pmml, Segment,
    Segmentation, PMML_VERSION,
};
pub use field::{DataField, DataType, OpType};
pub use format::{format_string_array, format_value};
pub use predicate::{Predicate, SetOperator, SimpleOperator, StringArray};
pub use schema::{FieldUsage, MiningField, MiningSchema};
pub use tree::{Node, NodeId, NodeIndex, SplitCharacteristic, TreeModel};
