//! End-to-end tests: read, fit, prune and score on deterministic synthetic data.

use approx::assert_relative_eq;

use rusty_tree::data::dataset::Dataset;
use rusty_tree::data::reader::read_str;
use rusty_tree::information::{entropy, feature_counts, gain_ratio, probabilities};
use rusty_tree::metrics::confusion::evaluate;
use rusty_tree::trees::classifier::{build, classify, DecisionTreeClassifier};
use rusty_tree::trees::node::TreeNode;

// ---------------------------------------------------------------------------
// Helper: deterministic synthetic categorical dataset
// ---------------------------------------------------------------------------

/// 150 records with four attributes.
///
/// The decision `d` is "1" when `a = r`, or when `a = g` and `b = s`.
/// `c` and `e` carry no information. With `noisy`, every 11th label is flipped.
fn make_dataset(noisy: bool) -> Dataset {
    let mut columns: [(String, Vec<String>); 5] = [
        ("a".to_string(), Vec::new()),
        ("b".to_string(), Vec::new()),
        ("c".to_string(), Vec::new()),
        ("e".to_string(), Vec::new()),
        ("d".to_string(), Vec::new()),
    ];
    for i in 0..150usize {
        let a = ["r", "g", "b"][i % 3];
        let b = ["s", "t"][(i / 3) % 2];
        let c = ["p", "q", "u", "v"][(i * 7 + 3) % 4];
        let e = ["k", "m"][(i / 7) % 2];
        let mut positive = a == "r" || (a == "g" && b == "s");
        if noisy && i % 11 == 0 {
            positive = !positive;
        }
        let d = if positive { "1" } else { "0" };
        for (column, value) in columns.iter_mut().zip([a, b, c, e, d]) {
            column.1.push(value.to_string());
        }
    }
    Dataset::new(columns.into_iter().collect()).unwrap()
}

fn rows_where(dataset: &Dataset, keep: impl Fn(usize) -> bool) -> Dataset {
    let indices: Vec<usize> = (0..dataset.nrows()).filter(|&i| keep(i)).collect();
    dataset.select_rows(&indices)
}

/// Rows `i % 5` in {0, 1, 2} train, 3 validates, 4 tests.
fn split(dataset: &Dataset) -> (Dataset, Dataset, Dataset) {
    (
        rows_where(dataset, |i| i % 5 < 3),
        rows_where(dataset, |i| i % 5 == 3),
        rows_where(dataset, |i| i % 5 == 4),
    )
}

fn errors(model: &DecisionTreeClassifier, dataset: &Dataset) -> usize {
    let truth = dataset.column("d").unwrap();
    model
        .predict(dataset)
        .unwrap()
        .iter()
        .zip(truth)
        .filter(|(predicted, expected)| predicted.as_deref() != Some(expected.as_str()))
        .count()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn two_value_scenario_from_text() {
    let dataset = read_str("a,d\nx,1\nx,1\ny,0\ny,0\n", true).unwrap();

    let entropies = entropy(&probabilities(&feature_counts(&dataset)));
    assert_relative_eq!(entropies["d"], 1.0);
    assert_relative_eq!(gain_ratio(&dataset, "d").unwrap()["a"], 1.0);

    let tree = build(&dataset, &["a".to_string()], "d").unwrap();
    assert_eq!(
        tree.to_string(),
        "a = x -> Decyzja: 1\na = y -> Decyzja: 0\n"
    );
}

#[test]
fn evaluation_scenario() {
    let result = evaluate(&["1", "1", "0"], &[Some("1"), Some("0"), Some("0")]).unwrap();
    assert_relative_eq!(result.accuracy, 2.0 / 3.0);
    assert_relative_eq!(result.precision, 1.0);
    assert_relative_eq!(result.recall, 0.5);
}

#[test]
fn clean_data_is_fit_exactly() {
    let (train, validation, test) = split(&make_dataset(false));

    let mut model = DecisionTreeClassifier::new();
    model.fit(&train, "d").unwrap();

    let root = model.root().unwrap();
    assert!(matches!(root, TreeNode::Internal { attribute, .. } if attribute == "a"));
    for (index, record) in train.records().enumerate() {
        assert_eq!(
            classify(root, &record).unwrap(),
            train.column("d").unwrap()[index]
        );
    }

    let summary = model.prune(&validation).unwrap();
    assert_eq!(summary.collapsed, 0);

    let result = model.score(&test).unwrap();
    assert_eq!(result.accuracy, 1.0);
    assert_eq!(result.precision, 1.0);
    assert_eq!(result.recall, 1.0);
}

#[test]
fn pruning_noisy_tree_shrinks_it_without_hurting_validation() {
    let (train, validation, test) = split(&make_dataset(true));

    let mut model = DecisionTreeClassifier::new();
    model.fit(&train, "d").unwrap();
    let errors_before = errors(&model, &validation);

    let summary = model.prune(&validation).unwrap();
    let errors_after = errors(&model, &validation);

    assert!(summary.collapsed > 0);
    assert!(
        summary.nodes_after < summary.nodes_before,
        "{} nodes before, {} after",
        summary.nodes_before,
        summary.nodes_after
    );
    assert!(
        errors_after <= errors_before,
        "validation errors went from {} to {}",
        errors_before,
        errors_after
    );

    let result = model.score(&test).unwrap();
    assert!(result.accuracy > 0.85, "test accuracy {}", result.accuracy);
}

#[test]
fn gain_ratios_are_bounded() {
    let dataset = make_dataset(true);
    for (attribute, ratio) in gain_ratio(&dataset, "d").unwrap() {
        assert!(
            (-1e-9..=1.0 + 1e-9).contains(&ratio),
            "gain ratio of {} is {}",
            attribute,
            ratio
        );
    }
}

#[test]
fn probabilities_sum_to_one() {
    let dataset = make_dataset(true);
    for (attribute, distribution) in probabilities(&feature_counts(&dataset)) {
        let total: f64 = distribution.values().sum();
        assert!((total - 1.0).abs() < 1e-9, "{} sums to {}", attribute, total);
    }
}
