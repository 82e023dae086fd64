//! Field dictionary derivation from training metadata.

use rfpmml_io::Rexp;
use rfpmml_pmml::{DataField, MiningFunction};
use tracing::{debug, info, instrument};

use crate::arrays::decode_indices;
use crate::error::ConvertError;

/// How the model was trained, which decides where field metadata lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingInterface {
    /// Trained from a formula; `terms` carries named, typed columns.
    Formula,
    /// Trained from a predictor matrix; only `xlevels` and `ncat` exist.
    Matrix,
}

/// Ordered fields of a model: the target first, then the predictors.
///
/// Predictors are addressed by the 1-based variable index used in the
/// forest's `bestvar` array.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDictionary {
    fields: Vec<DataField>,
}

impl FieldDictionary {
    /// Create a dictionary from the target and the predictors in order.
    #[must_use]
    pub fn new(target: DataField, predictors: Vec<DataField>) -> Self {
        let mut fields = Vec::with_capacity(predictors.len() + 1);
        fields.push(target);
        fields.extend(predictors);
        Self { fields }
    }

    /// Return the target field.
    #[must_use]
    pub fn target(&self) -> &DataField {
        &self.fields[0]
    }

    /// Return the predictors in variable-index order.
    #[must_use]
    pub fn predictors(&self) -> &[DataField] {
        &self.fields[1..]
    }

    /// Return the predictor with 1-based variable index `var`.
    #[must_use]
    pub fn predictor(&self, var: usize) -> Option<&DataField> {
        if var == 0 {
            return None;
        }
        self.fields.get(var)
    }

    /// Return all fields, target first.
    #[must_use]
    pub fn fields(&self) -> &[DataField] {
        &self.fields
    }

    /// Consume the dictionary and return its fields, target first.
    #[must_use]
    pub fn into_fields(self) -> Vec<DataField> {
        self.fields
    }

    fn target_mut(&mut self) -> &mut DataField {
        &mut self.fields[0]
    }
}

/// Derive the field dictionary of a random forest model.
///
/// Picks the formula variant when the model has a `terms` element and the
/// matrix variant otherwise, then fills categorical vocabularies from
/// `forest.xlevels` (for every predictor with `ncat > 1`) and, for
/// classification, the target vocabulary from the levels of `y`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`ConvertError::MissingField`] | `forest`, `xlevels`, `ncat` or (classification) `y` is absent |
/// | [`ConvertError::MissingAttribute`] | `dataClasses`, `names` or `levels` is absent |
/// | [`ConvertError::UnsupportedFieldType`] | a formula column has an unknown type tag |
/// | [`ConvertError::ArrayLength`] | `dataClasses` is empty or shorter than its names, or `ncat` is shorter than the predictor names |
/// | [`ConvertError::PredictorCountMismatch`] | `ncat` or `xlevels` disagrees with the predictor list |
#[instrument(skip_all, fields(function = %function))]
pub fn derive_fields(
    model: &Rexp,
    function: MiningFunction,
    target_name: &str,
) -> Result<FieldDictionary, ConvertError> {
    let forest = model.field("forest")?;
    let xlevels = forest.field("xlevels")?;
    let ncat = decode_indices(forest.field("ncat")?, "ncat")?;

    let classification = function == MiningFunction::Classification;
    let (interface, mut dictionary) = match model.optional_field("terms")? {
        Some(terms) => (TrainingInterface::Formula, formula_fields(terms)?),
        None => (
            TrainingInterface::Matrix,
            matrix_fields(xlevels, &ncat, classification, target_name)?,
        ),
    };

    populate_predictor_levels(&mut dictionary, xlevels, &ncat)?;

    if classification {
        let levels = model.field("y")?.attribute("levels")?;
        dictionary
            .target_mut()
            .extend_values(levels.string_values().iter().cloned());
    }

    info!(
        interface = ?interface,
        target = dictionary.target().name(),
        n_predictors = dictionary.predictors().len(),
        "field dictionary derived"
    );
    Ok(dictionary)
}

/// Fields of a formula-trained model, in `dataClasses` order.
fn formula_fields(terms: &Rexp) -> Result<FieldDictionary, ConvertError> {
    let data_classes = terms.attribute("dataClasses")?;
    let names = data_classes.attribute("names")?.string_values();
    let tags = data_classes.string_values();

    if names.is_empty() || tags.len() < names.len() {
        return Err(ConvertError::ArrayLength {
            name: "dataClasses".into(),
            expected: names.len().max(1),
            got: tags.len(),
        });
    }

    let mut fields = names
        .iter()
        .zip(tags)
        .map(|(name, tag)| match tag.as_str() {
            "factor" => Ok(DataField::categorical(name.as_str())),
            "logical" => Ok(DataField::boolean(name.as_str())),
            "numeric" => Ok(DataField::continuous(name.as_str())),
            other => Err(ConvertError::UnsupportedFieldType {
                field: name.clone(),
                type_tag: other.to_string(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let predictors = fields.split_off(1);
    let target = fields.remove(0);
    Ok(FieldDictionary::new(target, predictors))
}

/// Fields of a matrix-trained model: a synthesized target plus one field per
/// `xlevels` entry.
///
/// The target is categorical only for classification. A regression forest
/// may still carry its numeric response in `y`.
fn matrix_fields(
    xlevels: &Rexp,
    ncat: &[i32],
    classification: bool,
    target_name: &str,
) -> Result<FieldDictionary, ConvertError> {
    let target = if classification {
        DataField::categorical(target_name)
    } else {
        DataField::continuous(target_name)
    };

    let names = xlevels.attribute("names")?.string_values();
    if ncat.len() < names.len() {
        return Err(ConvertError::ArrayLength {
            name: "ncat".into(),
            expected: names.len(),
            got: ncat.len(),
        });
    }

    let predictors = names
        .iter()
        .zip(ncat)
        .map(|(name, &n)| {
            if n > 1 {
                DataField::categorical(name.as_str())
            } else {
                DataField::continuous(name.as_str())
            }
        })
        .collect();

    Ok(FieldDictionary::new(target, predictors))
}

/// Copy the level lists of categorical predictors into their vocabularies.
fn populate_predictor_levels(
    dictionary: &mut FieldDictionary,
    xlevels: &Rexp,
    ncat: &[i32],
) -> Result<(), ConvertError> {
    let n_predictors = dictionary.predictors().len();
    if ncat.len() > n_predictors {
        return Err(ConvertError::PredictorCountMismatch {
            name: "ncat".into(),
            expected: n_predictors,
            got: ncat.len(),
        });
    }

    for (i, &n) in ncat.iter().enumerate() {
        if n <= 1 {
            continue;
        }
        let levels = xlevels
            .list_values()
            .get(i)
            .ok_or_else(|| ConvertError::PredictorCountMismatch {
                name: "xlevels".into(),
                expected: n_predictors,
                got: xlevels.list_values().len(),
            })?;
        let field = &mut dictionary.fields[i + 1];
        debug!(
            field = field.name(),
            n_levels = levels.string_values().len(),
            "vocabulary loaded"
        );
        field.extend_values(levels.string_values().iter().cloned());
    }
    Ok(())
}
