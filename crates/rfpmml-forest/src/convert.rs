//! Conversion entry points and model-family dispatch.

use std::time::Instant;

use rfpmml_io::Rexp;
use rfpmml_pmml::{Header, MiningFunction, Pmml};
use tracing::{info, instrument};

use crate::arrays::ForestArrays;
use crate::assemble::assemble;
use crate::config::ConverterConfig;
use crate::error::ConvertError;
use crate::fields::derive_fields;
use crate::predicate::PredicateEncoder;
use crate::reconstruct::reconstruct_forest;

/// Class attribute entry identifying a random forest object.
pub const RANDOM_FOREST_CLASS: &str = "randomForest";

/// Convert a source model object, dispatching on its class.
///
/// # Errors
///
/// Returns [`ConvertError::UnsupportedModelClass`] if the object is not a
/// random forest, otherwise any error of [`RandomForestConverter::convert`].
pub fn convert(rexp: &Rexp, config: &ConverterConfig) -> Result<Pmml, ConvertError> {
    if rexp.inherits(RANDOM_FOREST_CLASS) {
        RandomForestConverter::new(config.clone()).convert(rexp)
    } else {
        Err(ConvertError::UnsupportedModelClass {
            classes: rexp.classes().to_vec(),
        })
    }
}

/// Read the mining function from the model's `type` element.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`ConvertError::MissingField`] | no `type` element |
/// | [`ConvertError::Source`] | `type` holds no string |
/// | [`ConvertError::UnsupportedFunction`] | neither `"regression"` nor `"classification"` |
pub fn mining_function(model: &Rexp) -> Result<MiningFunction, ConvertError> {
    match model.field("type")?.string_value(0)? {
        "regression" => Ok(MiningFunction::Regression),
        "classification" => Ok(MiningFunction::Classification),
        other => Err(ConvertError::UnsupportedFunction {
            function: other.to_string(),
        }),
    }
}

/// Converter for random forest objects.
#[derive(Debug, Clone, Default)]
pub struct RandomForestConverter {
    config: ConverterConfig,
}

impl RandomForestConverter {
    /// Create a converter with the given configuration.
    #[must_use]
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Return the configuration.
    #[must_use]
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert a random forest object into a document.
    ///
    /// Runs field derivation, tree reconstruction and assembly in order.
    /// Nothing is produced on failure.
    ///
    /// # Errors
    ///
    /// Returns the first error of [`mining_function`],
    /// [`derive_fields`](crate::derive_fields), the forest array readers,
    /// or [`reconstruct_forest`](crate::reconstruct_forest).
    #[instrument(skip_all)]
    pub fn convert(&self, model: &Rexp) -> Result<Pmml, ConvertError> {
        let start = Instant::now();

        let function = mining_function(model)?;
        let fields = derive_fields(model, function, self.config.target_name())?;

        let forest = model.field("forest")?;
        let arrays = match function {
            MiningFunction::Regression => ForestArrays::regression(forest)?,
            MiningFunction::Classification => ForestArrays::classification(forest)?,
        };

        let mut encoder = PredicateEncoder::new(self.config.predicate_cache());
        let trees = reconstruct_forest(&fields, &arrays, function, &mut encoder)?;

        let header = Header {
            application: self.config.application().cloned(),
        };
        let document = assemble(fields, function, trees, header);

        info!(
            function = %function,
            n_trees = arrays.n_trees(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "converted random forest"
        );
        Ok(document)
    }
}
