//! Rebuild binary decision trees from flat node slots.

use rfpmml_pmml::{
    DataField, MiningFunction, Node, NodeId, NodeIndex, Predicate, TreeModel, format_value,
};
use tracing::{debug, instrument};

use crate::arrays::{ForestArrays, Prediction, RawNode};
use crate::error::ConvertError;
use crate::fields::FieldDictionary;
use crate::predicate::PredicateEncoder;

/// Rebuild every tree of a forest, in column order.
///
/// # Errors
///
/// Returns the first error of [`reconstruct_tree`] over the trees.
#[instrument(skip_all, fields(n_trees = arrays.n_trees(), rows = arrays.rows()))]
pub fn reconstruct_forest(
    fields: &FieldDictionary,
    arrays: &ForestArrays,
    function: MiningFunction,
    encoder: &mut PredicateEncoder,
) -> Result<Vec<TreeModel>, ConvertError> {
    let mut trees = Vec::with_capacity(arrays.n_trees());
    for column in 0..arrays.n_trees() {
        let raw = arrays.tree(column);
        let tree = reconstruct_tree(fields, &raw, column + 1, function, encoder)?;
        debug!(
            tree = column + 1,
            n_nodes = tree.n_nodes(),
            n_leaves = tree.n_leaves(),
            depth = tree.depth(),
            "tree rebuilt"
        );
        trees.push(tree);
    }
    debug!(cached = encoder.cached(), hits = encoder.hits(), "predicate cache");
    Ok(trees)
}

/// Rebuild tree number `tree` (1-based) from its node slots.
///
/// The walk starts at slot 0, which becomes the root with an always-true
/// predicate. Every node's id is its 1-based slot number. Slots that no
/// daughter link reaches are ignored.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`ConvertError::MalformedTree`] | no slots, a leaf with daughters, a split with fewer than two daughters, or a slot reached twice |
/// | [`ConvertError::InvalidChildIndex`] | a daughter link outside `1..=rows` |
/// | [`ConvertError::InvalidVariableIndex`] | a split variable outside the predictors |
/// | [`ConvertError::InvalidSplitCode`] | a non-finite split code, or a categorical one that is not a category mask |
/// | [`ConvertError::UnknownClassCode`] | a class code outside the target vocabulary |
/// | [`ConvertError::NonFiniteScore`] | a regression leaf predicting an infinite or `NaN` value |
pub fn reconstruct_tree(
    fields: &FieldDictionary,
    raw: &[RawNode],
    tree: usize,
    function: MiningFunction,
    encoder: &mut PredicateEncoder,
) -> Result<TreeModel, ConvertError> {
    if raw.is_empty() {
        return Err(ConvertError::MalformedTree {
            tree,
            node: 1,
            reason: "tree has no node slots",
        });
    }

    let mut builder = TreeBuilder {
        fields,
        raw,
        tree,
        encoder,
        visited: vec![false; raw.len()],
        arena: Vec::new(),
    };
    builder.build()?;
    Ok(TreeModel::new(function, builder.arena))
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// A slot waiting to be visited, with the split link that reached it.
struct Pending {
    slot: usize,
    predicate: Predicate,
    parent: Option<(NodeIndex, Side)>,
}

struct TreeBuilder<'a> {
    fields: &'a FieldDictionary,
    raw: &'a [RawNode],
    tree: usize,
    encoder: &'a mut PredicateEncoder,
    visited: Vec<bool>,
    arena: Vec<Node>,
}

impl<'a> TreeBuilder<'a> {
    /// Walk the slots from the root in pre-order, left before right.
    ///
    /// Uses an explicit stack, so tree depth is bounded by memory and not
    /// by the thread stack.
    fn build(&mut self) -> Result<(), ConvertError> {
        let mut stack = vec![Pending {
            slot: 0,
            predicate: Predicate::True,
            parent: None,
        }];
        while let Some(pending) = stack.pop() {
            let index = NodeIndex::new(self.arena.len());
            let node = self.visit(pending.slot, pending.predicate, index, &mut stack)?;
            self.arena.push(node);
            if let Some((parent, side)) = pending.parent {
                self.link(parent, side, index);
            }
        }
        Ok(())
    }

    /// Build the node for `slot`. A split is returned with both links
    /// pointing at itself; they are patched as its children are placed.
    fn visit(
        &mut self,
        slot: usize,
        predicate: Predicate,
        index: NodeIndex,
        stack: &mut Vec<Pending>,
    ) -> Result<Node, ConvertError> {
        let number = slot + 1;
        if std::mem::replace(&mut self.visited[slot], true) {
            return Err(self.malformed(number, "node reached by more than one daughter link"));
        }

        let raw = self.raw[slot];
        let id = NodeId::new(number);

        if raw.best_var == 0 {
            if raw.left != 0 || raw.right != 0 {
                return Err(self.malformed(number, "leaf node has daughters"));
            }
            let score = self.score(number, raw.prediction)?;
            return Ok(Node::Leaf {
                id,
                predicate,
                score,
            });
        }

        let (left, right) = match (raw.left, raw.right) {
            (0, 0) => return Err(self.malformed(number, "split node has no daughters")),
            (0, _) | (_, 0) => return Err(self.malformed(number, "split node has one daughter")),
            (left, right) => (
                self.child_slot(number, left)?,
                self.child_slot(number, right)?,
            ),
        };

        let (var, field) = self.predictor(number, raw.best_var)?;
        let (left_predicate, right_predicate) = self
            .encoder
            .encode(var, field, raw.split)
            .map_err(|e| ConvertError::InvalidSplitCode {
                tree: self.tree,
                node: number,
                field: field.name().to_string(),
                split: e.split,
            })?;

        stack.push(Pending {
            slot: right,
            predicate: right_predicate,
            parent: Some((index, Side::Right)),
        });
        stack.push(Pending {
            slot: left,
            predicate: left_predicate,
            parent: Some((index, Side::Left)),
        });
        Ok(Node::Split {
            id,
            predicate,
            left: index,
            right: index,
        })
    }

    fn link(&mut self, parent: NodeIndex, side: Side, child: NodeIndex) {
        if let Node::Split { left, right, .. } = &mut self.arena[parent.index()] {
            match side {
                Side::Left => *left = child,
                Side::Right => *right = child,
            }
        }
    }

    fn child_slot(&self, node: usize, child: i32) -> Result<usize, ConvertError> {
        let rows = self.raw.len();
        match usize::try_from(child) {
            Ok(c) if (1..=rows).contains(&c) => Ok(c - 1),
            _ => Err(ConvertError::InvalidChildIndex {
                tree: self.tree,
                node,
                child,
                rows,
            }),
        }
    }

    fn predictor(
        &self,
        node: usize,
        best_var: i32,
    ) -> Result<(usize, &'a DataField), ConvertError> {
        let fields = self.fields;
        let n_predictors = fields.predictors().len();
        let var = usize::try_from(best_var).ok();
        match var.and_then(|v| fields.predictor(v).map(|field| (v, field))) {
            Some(found) => Ok(found),
            None => Err(ConvertError::InvalidVariableIndex {
                tree: self.tree,
                node,
                index: best_var,
                n_predictors,
            }),
        }
    }

    fn score(&self, node: usize, prediction: Prediction) -> Result<String, ConvertError> {
        match prediction {
            Prediction::Value(value) if value.is_finite() => Ok(format_value(value)),
            Prediction::Value(value) => Err(ConvertError::NonFiniteScore {
                tree: self.tree,
                node,
                value,
            }),
            Prediction::Class(code) => {
                let levels = self.fields.target().values();
                usize::try_from(code)
                    .ok()
                    .and_then(|k| k.checked_sub(1))
                    .and_then(|k| levels.get(k))
                    .cloned()
                    .ok_or_else(|| ConvertError::UnknownClassCode {
                        tree: self.tree,
                        node,
                        code,
                        n_levels: levels.len(),
                    })
            }
        }
    }

    fn malformed(&self, node: usize, reason: &'static str) -> ConvertError {
        ConvertError::MalformedTree {
            tree: self.tree,
            node,
            reason,
        }
    }
}
