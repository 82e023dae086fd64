//! Ensemble assembly: field usage schemas and the segmented document.

use rfpmml_pmml::{
    Header, MiningField, MiningFunction, MiningModel, MiningSchema, MultipleModelMethod, Pmml,
    Predicate, Segment, Segmentation, TreeModel,
};
use tracing::{info, instrument};

use crate::fields::FieldDictionary;

/// Return how segment predictions are combined for `function`.
#[must_use]
pub fn multiple_model_method(function: MiningFunction) -> MultipleModelMethod {
    match function {
        MiningFunction::Regression => MultipleModelMethod::Average,
        MiningFunction::Classification => MultipleModelMethod::MajorityVote,
    }
}

/// Usage schema of the whole ensemble: the target, then every predictor
/// by name.
#[must_use]
pub fn global_mining_schema(fields: &FieldDictionary) -> MiningSchema {
    let mut usages = Vec::with_capacity(fields.fields().len());
    usages.push(MiningField::target(fields.target().name()));
    usages.extend(
        fields
            .predictors()
            .iter()
            .map(|f| MiningField::active(f.name())),
    );
    MiningSchema::new(usages)
}

/// Usage schema of one tree: the fields its predicates reference, by name.
#[must_use]
pub fn tree_mining_schema(tree: &TreeModel) -> MiningSchema {
    MiningSchema::active(tree.referenced_fields())
}

/// Combine rebuilt trees into the final document.
///
/// Segments are numbered from `"1"` in the order of `trees`; each is
/// always entered and carries its tree with its reduced usage schema.
#[must_use]
#[instrument(skip_all, fields(function = %function, n_trees = trees.len()))]
pub fn assemble(
    fields: FieldDictionary,
    function: MiningFunction,
    trees: Vec<TreeModel>,
    header: Header,
) -> Pmml {
    let mining_schema = global_mining_schema(&fields);

    let segments: Vec<Segment> = trees
        .into_iter()
        .enumerate()
        .map(|(i, tree)| {
            let schema = tree_mining_schema(&tree);
            Segment::new(
                (i + 1).to_string(),
                Predicate::True,
                tree.with_mining_schema(schema),
            )
        })
        .collect();

    let segmentation = Segmentation::new(multiple_model_method(function), segments);
    let model = MiningModel::new(function, mining_schema, segmentation);

    let data_dictionary = fields.into_fields();
    info!(n_fields = data_dictionary.len(), "ensemble assembled");
    Pmml::new(header, data_dictionary, model)
}
