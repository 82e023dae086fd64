//! Arena-backed binary decision trees.

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::document::MiningFunction;
use crate::predicate::Predicate;
use crate::schema::MiningSchema;

/// Position of a node inside a [`TreeModel`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Create a node index from a zero-based arena position.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based arena position.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Document-visible node identifier.
///
/// Carries the 1-based position of the node in the source arrays, so ids
/// are unique within a tree but not necessarily contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Create an id from a 1-based source position.
    #[must_use]
    pub fn new(id: usize) -> Self {
        debug_assert!(id > 0, "node ids are 1-based");
        Self(id)
    }

    /// Return the 1-based source position.
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A decision-tree node.
///
/// A node either carries a score or has exactly two children; a node with a
/// single child cannot be represented.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Interior node routing to two children.
    Split {
        /// Document id.
        id: NodeId,
        /// Condition for entering this node.
        predicate: Predicate,
        /// Child entered when the left predicate holds.
        left: NodeIndex,
        /// Child entered when the right predicate holds.
        right: NodeIndex,
    },
    /// Terminal node.
    Leaf {
        /// Document id.
        id: NodeId,
        /// Condition for entering this node.
        predicate: Predicate,
        /// Formatted prediction.
        score: String,
    },
}

impl Node {
    /// Return the document id.
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            Node::Split { id, .. } | Node::Leaf { id, .. } => *id,
        }
    }

    /// Return the entry predicate.
    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        match self {
            Node::Split { predicate, .. } | Node::Leaf { predicate, .. } => predicate,
        }
    }

    /// Return the score of a leaf.
    #[must_use]
    pub fn score(&self) -> Option<&str> {
        match self {
            Node::Leaf { score, .. } => Some(score),
            Node::Split { .. } => None,
        }
    }

    /// Return the `(left, right)` children of a split.
    #[must_use]
    pub fn children(&self) -> Option<(NodeIndex, NodeIndex)> {
        match self {
            Node::Split { left, right, .. } => Some((*left, *right)),
            Node::Leaf { .. } => None,
        }
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// How many children interior nodes have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SplitCharacteristic {
    /// Every interior node has exactly two children.
    BinarySplit,
}

/// A single decision tree.
///
/// Nodes live in a `Vec<Node>` arena with the root at position 0; children
/// are referenced by [`NodeIndex`]. Serializes as a nested node hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeModel {
    function: MiningFunction,
    mining_schema: MiningSchema,
    split_characteristic: SplitCharacteristic,
    nodes: Vec<Node>,
}

impl TreeModel {
    /// Wrap a node arena whose root sits at position 0.
    ///
    /// The mining schema starts empty; see [`TreeModel::with_mining_schema`].
    #[must_use]
    pub fn new(function: MiningFunction, nodes: Vec<Node>) -> Self {
        debug_assert!(!nodes.is_empty(), "a tree needs a root node");
        Self {
            function,
            mining_schema: MiningSchema::default(),
            split_characteristic: SplitCharacteristic::BinarySplit,
            nodes,
        }
    }

    /// Replace the mining schema.
    #[must_use]
    pub fn with_mining_schema(mut self, mining_schema: MiningSchema) -> Self {
        self.mining_schema = mining_schema;
        self
    }

    /// Return the mining function.
    #[must_use]
    pub fn function(&self) -> MiningFunction {
        self.function
    }

    /// Return the mining schema.
    #[must_use]
    pub fn mining_schema(&self) -> &MiningSchema {
        &self.mining_schema
    }

    /// Return the split characteristic.
    #[must_use]
    pub fn split_characteristic(&self) -> SplitCharacteristic {
        self.split_characteristic
    }

    /// Return the root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Return the node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the arena.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.index()]
    }

    /// Return the node arena.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return the number of nodes.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaves.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return arena positions in depth-first pre-order, left before right.
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![NodeIndex::new(0)];
        while let Some(index) = stack.pop() {
            order.push(index);
            if let Some((left, right)) = self.node(index).children() {
                stack.push(right);
                stack.push(left);
            }
        }
        order
    }

    /// Return the depth of the deepest leaf (a lone root has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(NodeIndex::new(0), 0usize)];
        while let Some((index, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some((left, right)) = self.node(index).children() {
                stack.push((left, depth + 1));
                stack.push((right, depth + 1));
            }
        }
        max_depth
    }

    /// Return the names of fields referenced by any predicate, in order of
    /// first appearance during a pre-order walk.
    #[must_use]
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for index in self.preorder() {
            if let Some(field) = self.node(index).predicate().field()
                && !fields.contains(&field)
            {
                fields.push(field);
            }
        }
        fields
    }
}

impl Serialize for TreeModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TreeModel", 4)?;
        state.serialize_field("function", &self.function)?;
        state.serialize_field("split_characteristic", &self.split_characteristic)?;
        state.serialize_field("mining_schema", &self.mining_schema)?;
        state.serialize_field(
            "node",
            &NestedNode {
                tree: self,
                index: NodeIndex::new(0),
            },
        )?;
        state.end()
    }
}

/// Serialization view of the subtree rooted at `index`.
///
/// Nests one call per tree level; callers serializing very deep trees need
/// a thread with a correspondingly large stack.
struct NestedNode<'a> {
    tree: &'a TreeModel,
    index: NodeIndex,
}

impl Serialize for NestedNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.tree.node(self.index);
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("id", &node.id())?;
        map.serialize_entry("predicate", node.predicate())?;
        match node {
            Node::Leaf { score, .. } => map.serialize_entry("score", score)?,
            Node::Split { left, right, .. } => map.serialize_entry(
                "nodes",
                &NestedChildren {
                    tree: self.tree,
                    children: [*left, *right],
                },
            )?,
        }
        map.end()
    }
}

struct NestedChildren<'a> {
    tree: &'a TreeModel,
    children: [NodeIndex; 2],
}

impl Serialize for NestedChildren<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        for index in self.children {
            seq.serialize_element(&NestedNode {
                tree: self.tree,
                index,
            })?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::SimpleOperator;

    fn leaf(id: usize, predicate: Predicate, score: &str) -> Node {
        Node::Leaf {
            id: NodeId::new(id),
            predicate,
            score: score.to_string(),
        }
    }

    // root(1) splits on x; left(2) splits on color; right(3) leaf
    fn make_tree() -> TreeModel {
        let nodes = vec![
            Node::Split {
                id: NodeId::new(1),
                predicate: Predicate::True,
                left: NodeIndex::new(1),
                right: NodeIndex::new(4),
            },
            Node::Split {
                id: NodeId::new(2),
                predicate: Predicate::simple("x", SimpleOperator::LessOrEqual, "2.5"),
                left: NodeIndex::new(2),
                right: NodeIndex::new(3),
            },
            leaf(4, Predicate::is_in("color", vec!["red".into()]), "10"),
            leaf(5, Predicate::is_in("color", vec!["blue".into()]), "20"),
            leaf(3, Predicate::simple("x", SimpleOperator::GreaterThan, "2.5"), "30"),
        ];
        TreeModel::new(MiningFunction::Regression, nodes)
    }

    // `depth` splits, each with a leaf on the left and the rest on the right
    fn chain(depth: usize) -> TreeModel {
        let mut nodes = Vec::with_capacity(2 * depth + 1);
        for level in 0..depth {
            let at = 2 * level;
            nodes.push(Node::Split {
                id: NodeId::new(at + 1),
                predicate: Predicate::True,
                left: NodeIndex::new(at + 1),
                right: NodeIndex::new(at + 2),
            });
            nodes.push(leaf(at + 2, Predicate::True, "0"));
        }
        nodes.push(leaf(2 * depth + 1, Predicate::True, "1"));
        TreeModel::new(MiningFunction::Regression, nodes)
    }

    #[test]
    fn counts() {
        let tree = make_tree();
        assert_eq!(tree.n_nodes(), 5);
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn preorder_visits_left_first() {
        let tree = make_tree();
        let ids: Vec<usize> = tree
            .preorder()
            .into_iter()
            .map(|i| tree.node(i).id().get())
            .collect();
        assert_eq!(ids, [1, 2, 4, 5, 3]);
    }

    #[test]
    fn referenced_fields_in_first_encounter_order() {
        let tree = make_tree();
        assert_eq!(tree.referenced_fields(), ["x", "color"]);
    }

    #[test]
    fn lone_root() {
        let tree = TreeModel::new(
            MiningFunction::Classification,
            vec![leaf(1, Predicate::True, "a")],
        );
        assert_eq!(tree.depth(), 0);
        assert!(tree.referenced_fields().is_empty());
        assert_eq!(tree.root().score(), Some("a"));
    }

    #[test]
    fn deep_tree_serializes_on_a_large_stack() {
        let depth = 5_000;
        let worker = std::thread::Builder::new()
            .stack_size(64 << 20)
            .spawn(move || {
                let tree = chain(depth);
                assert_eq!(tree.depth(), depth);
                let json = serde_json::to_value(&tree).unwrap();
                let mut node = &json["node"];
                for _ in 0..depth {
                    node = &node["nodes"][1];
                }
                node["score"].as_str().map(str::to_string)
            })
            .unwrap();
        assert_eq!(worker.join().unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn serializes_nested() {
        let json = serde_json::to_value(make_tree()).unwrap();
        assert_eq!(json["function"], "regression");
        assert_eq!(json["split_characteristic"], "binarySplit");
        let root = &json["node"];
        assert_eq!(root["id"], 1);
        assert_eq!(root["predicate"]["kind"], "true");
        assert_eq!(root["nodes"][0]["nodes"][1]["score"], "20");
        assert_eq!(root["nodes"][1]["predicate"]["operator"], "greaterThan");
    }
}
