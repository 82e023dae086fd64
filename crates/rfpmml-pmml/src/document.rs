//! Top-level document: header, data dictionary and the segmented model.

use std::fmt;

use crate::field::DataField;
use crate::predicate::Predicate;
use crate::schema::MiningSchema;
use crate::tree::TreeModel;

/// Schema version declared by every produced document.
pub const PMML_VERSION: &str = "4.2";

/// What a model predicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MiningFunction {
    /// Real-valued prediction.
    Regression,
    /// Class-label prediction.
    Classification,
}

impl fmt::Display for MiningFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiningFunction::Regression => f.write_str("regression"),
            MiningFunction::Classification => f.write_str("classification"),
        }
    }
}

/// How segment predictions are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MultipleModelMethod {
    /// Arithmetic mean of segment scores.
    Average,
    /// Most frequent segment label.
    MajorityVote,
}

/// Producer of the document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Application {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
}

/// Document header.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Header {
    /// Producing application, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
}

/// One member of a [`Segmentation`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Segment {
    id: String,
    predicate: Predicate,
    model: TreeModel,
}

impl Segment {
    /// Create a segment guarded by `predicate`.
    #[must_use]
    pub fn new(id: impl Into<String>, predicate: Predicate, model: TreeModel) -> Self {
        Self {
            id: id.into(),
            predicate,
            model,
        }
    }

    /// Return the segment id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Return the guard predicate.
    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Return the wrapped tree.
    #[must_use]
    pub fn model(&self) -> &TreeModel {
        &self.model
    }
}

/// Ordered ensemble members plus their combination rule.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Segmentation {
    method: MultipleModelMethod,
    segments: Vec<Segment>,
}

impl Segmentation {
    /// Create a segmentation.
    #[must_use]
    pub fn new(method: MultipleModelMethod, segments: Vec<Segment>) -> Self {
        Self { method, segments }
    }

    /// Return the combination rule.
    #[must_use]
    pub fn method(&self) -> MultipleModelMethod {
        self.method
    }

    /// Return the segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Ensemble model.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MiningModel {
    function: MiningFunction,
    mining_schema: MiningSchema,
    segmentation: Segmentation,
}

impl MiningModel {
    /// Create an ensemble model.
    #[must_use]
    pub fn new(
        function: MiningFunction,
        mining_schema: MiningSchema,
        segmentation: Segmentation,
    ) -> Self {
        Self {
            function,
            mining_schema,
            segmentation,
        }
    }

    /// Return the mining function.
    #[must_use]
    pub fn function(&self) -> MiningFunction {
        self.function
    }

    /// Return the global mining schema.
    #[must_use]
    pub fn mining_schema(&self) -> &MiningSchema {
        &self.mining_schema
    }

    /// Return the segmentation.
    #[must_use]
    pub fn segmentation(&self) -> &Segmentation {
        &self.segmentation
    }
}

/// A complete document.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Pmml {
    version: &'static str,
    header: Header,
    data_dictionary: Vec<DataField>,
    model: MiningModel,
}

impl Pmml {
    /// Create a document at [`PMML_VERSION`].
    #[must_use]
    pub fn new(header: Header, data_dictionary: Vec<DataField>, model: MiningModel) -> Self {
        Self {
            version: PMML_VERSION,
            header,
            data_dictionary,
            model,
        }
    }

    /// Return the declared schema version.
    #[must_use]
    pub fn version(&self) -> &str {
        self.version
    }

    /// Return the header.
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Return the data dictionary in source order.
    #[must_use]
    pub fn data_dictionary(&self) -> &[DataField] {
        &self.data_dictionary
    }

    /// Return the ensemble model.
    #[must_use]
    pub fn model(&self) -> &MiningModel {
        &self.model
    }
}
