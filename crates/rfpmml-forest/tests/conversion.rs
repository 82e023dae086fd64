//! End-to-end tests: JSON source object -> converter -> document.

use std::path::{Path, PathBuf};

use rfpmml_forest::{CacheMode, ConvertError, ConverterConfig, convert};
use rfpmml_io::{Rexp, RexpReader};
use rfpmml_pmml::{
    DataType, FieldUsage, MiningFunction, MultipleModelMethod, Node, OpType, Pmml, Predicate,
    SimpleOperator, TreeModel,
};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load(name: &str) -> Rexp {
    RexpReader::new(&fixture_path(name))
        .read()
        .expect("fixture should parse")
}

fn convert_fixture(name: &str) -> Pmml {
    convert(&load(name), &ConverterConfig::new()).expect("fixture should convert")
}

/// Predicates and scores of the direct children of `tree`'s root.
fn root_children(tree: &TreeModel) -> (&Node, &Node) {
    let (left, right) = tree.root().children().expect("root should split");
    (tree.node(left), tree.node(right))
}

fn set_literals(predicate: &Predicate) -> Vec<String> {
    match predicate {
        Predicate::SimpleSet { array, .. } => array.values().to_vec(),
        other => panic!("expected a set predicate, got {other}"),
    }
}

#[test]
fn regression_single_split() {
    let doc = convert_fixture("regression_single_split.json");

    let model = doc.model();
    assert_eq!(model.function(), MiningFunction::Regression);
    assert_eq!(model.segmentation().method(), MultipleModelMethod::Average);

    let segments = model.segmentation().segments();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].id(), "1");

    let tree = segments[0].model();
    assert!(tree.root().predicate().is_true());
    let (left, right) = root_children(tree);
    assert_eq!(
        left.predicate(),
        &Predicate::simple("x", SimpleOperator::LessOrEqual, "2.5")
    );
    assert_eq!(left.score(), Some("10"));
    assert_eq!(
        right.predicate(),
        &Predicate::simple("x", SimpleOperator::GreaterThan, "2.5")
    );
    assert_eq!(right.score(), Some("20"));

    let names: Vec<&str> = doc.data_dictionary().iter().map(|f| f.name()).collect();
    assert_eq!(names, ["y", "x"]);
}

#[test]
fn matrix_regression_with_numeric_response() {
    let doc = convert_fixture("regression_matrix_with_y.json");
    assert_eq!(doc.model().function(), MiningFunction::Regression);

    let target = &doc.data_dictionary()[0];
    assert_eq!(target.name(), "_target");
    assert_eq!(target.op_type(), OpType::Continuous);
    assert_eq!(target.data_type(), DataType::Double);
    assert!(target.values().is_empty());

    let tree = doc.model().segmentation().segments()[0].model();
    let (left, right) = root_children(tree);
    assert_eq!(left.score(), Some("10"));
    assert_eq!(right.score(), Some("20"));
}

#[test]
fn classification_with_categorical_split() {
    let doc = convert_fixture("classification_matrix_int.json");

    let model = doc.model();
    assert_eq!(model.function(), MiningFunction::Classification);
    assert_eq!(
        model.segmentation().method(),
        MultipleModelMethod::MajorityVote
    );

    let target = &doc.data_dictionary()[0];
    assert_eq!(target.name(), "_target");
    assert_eq!(target.op_type(), OpType::Categorical);
    assert_eq!(target.values(), &["setosa", "versicolor", "virginica"]);

    let color = &doc.data_dictionary()[2];
    assert_eq!(color.name(), "color");
    assert_eq!(color.data_type(), DataType::String);
    assert_eq!(color.values(), &["red", "green", "light blue"]);

    let segments = model.segmentation().segments();
    assert_eq!(segments.len(), 2);

    let first = segments[0].model();
    let (left, right) = root_children(first);
    assert_eq!(set_literals(left.predicate()), ["red", "light blue"]);
    assert_eq!(set_literals(right.predicate()), ["green"]);
    assert_eq!(
        left.predicate().to_string(),
        "color in [red \"light blue\"]"
    );
    assert_eq!(left.score(), Some("setosa"));

    let (low, high) = {
        let (l, r) = right.children().expect("right child should split");
        (first.node(l), first.node(r))
    };
    assert_eq!(low.predicate().to_string(), "petal width <= 0.8");
    assert_eq!(low.score(), Some("versicolor"));
    assert_eq!(high.score(), Some("virginica"));

    let ids: Vec<usize> = first
        .preorder()
        .into_iter()
        .map(|i| first.node(i).id().get())
        .collect();
    assert_eq!(ids, [1, 2, 3, 4, 5]);

    let schema: Vec<&str> = first.mining_schema().names().collect();
    assert_eq!(schema, ["color", "petal width"]);

    // a lone-leaf tree references no fields
    let second = segments[1].model();
    assert_eq!(second.n_nodes(), 1);
    assert_eq!(second.root().score(), Some("virginica"));
    assert!(second.mining_schema().is_empty());
}

#[test]
fn real_and_integer_encodings_agree() {
    let ints = convert_fixture("classification_matrix_int.json");
    let reals = convert_fixture("classification_matrix_real.json");
    assert_eq!(ints, reals);
    assert_eq!(
        serde_json::to_string(&ints).unwrap(),
        serde_json::to_string(&reals).unwrap()
    );
}

#[test]
fn schemas_sorted_by_name() {
    let doc = convert_fixture("regression_unordered.json");

    // the data dictionary keeps training order
    let dictionary: Vec<&str> = doc.data_dictionary().iter().map(|f| f.name()).collect();
    assert_eq!(dictionary, ["price", "zeta", "flag", "alpha"]);

    let global = doc.model().mining_schema();
    let names: Vec<&str> = global.names().collect();
    assert_eq!(names, ["price", "alpha", "flag", "zeta"]);
    assert_eq!(global.fields()[0].usage(), FieldUsage::Target);

    let tree = doc.model().segmentation().segments()[0].model();
    let used: Vec<&str> = tree.mining_schema().names().collect();
    assert_eq!(used, ["flag", "zeta"]);
    assert!(!used.contains(&"alpha"));
}

#[test]
fn boolean_split_and_negative_zero_score() {
    let doc = convert_fixture("regression_unordered.json");
    let tree = doc.model().segmentation().segments()[0].model();

    let flag = &doc.data_dictionary()[2];
    assert_eq!(flag.data_type(), DataType::Boolean);

    let (left, right) = root_children(tree);
    assert_eq!(
        left.predicate(),
        &Predicate::simple("flag", SimpleOperator::Equal, "true")
    );
    assert_eq!(
        right.predicate(),
        &Predicate::simple("flag", SimpleOperator::Equal, "false")
    );
    assert_eq!(right.score(), Some("1.5"));

    let (l, r) = left.children().expect("left child should split");
    assert_eq!(tree.node(l).predicate().to_string(), "zeta <= 3");
    assert_eq!(tree.node(l).score(), Some("0"));
    assert_eq!(tree.node(r).score(), Some("2"));
}

#[test]
fn cache_mode_does_not_change_output() {
    let source = load("classification_matrix_int.json");
    let cached = convert(&source, &ConverterConfig::new()).unwrap();
    let uncached = convert(
        &source,
        &ConverterConfig::new().with_predicate_cache(CacheMode::Disabled),
    )
    .unwrap();
    assert_eq!(cached, uncached);
}

#[test]
fn target_name_override() {
    let config = ConverterConfig::new().with_target_name("species");
    let doc = convert(&load("classification_matrix_int.json"), &config).unwrap();
    assert_eq!(doc.data_dictionary()[0].name(), "species");

    // formula-trained models keep their own target name
    let doc = convert(&load("regression_single_split.json"), &config).unwrap();
    assert_eq!(doc.data_dictionary()[0].name(), "y");
}

#[test]
fn malformed_tree_aborts_conversion() {
    let err = convert(
        &load("malformed_one_daughter.json"),
        &ConverterConfig::new(),
    )
    .unwrap_err();
    match err {
        ConvertError::MalformedTree { tree, node, .. } => assert_eq!((tree, node), (1, 1)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn document_serializes_nested_nodes() {
    let doc = convert_fixture("regression_single_split.json");
    let value = serde_json::to_value(&doc).unwrap();

    assert_eq!(value["version"], "4.2");
    let node = &value["model"]["segmentation"]["segments"][0]["model"]["node"];
    assert_eq!(node["id"], 1);
    assert_eq!(node["predicate"]["kind"], "true");
    assert_eq!(node["nodes"][0]["score"], "10");
    assert_eq!(node["nodes"][1]["predicate"]["operator"], "greaterThan");
}
