//! Reduced-error pruning against a validation set.
use super::{classifier::classify, node::TreeNode};
use crate::{
    data::dataset::Dataset,
    error::Result,
    information::{majority, value_counts},
};
use tracing::{debug, info, instrument};

/// What pruning did to a tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PruneSummary {
    /// Internal nodes replaced by leaves.
    pub collapsed: usize,
    pub nodes_before: usize,
    pub nodes_after: usize,
}

enum Outcome {
    Unchanged,
    Collapse(TreeNode),
}

/// Prunes `tree` bottom-up in a single pass.
///
/// Each internal node is judged on the validation rows that reach it, after its
/// children have been judged on theirs. A node becomes a majority leaf when
/// `e_leaf <= e_sub + confidence * sqrt(e_sub * (1 - e_sub) / P)`, where `P` is the
/// number of validation rows at the node. Nodes no validation row reaches keep
/// their trained shape.
///
/// With `confidence > 0` a collapse may accept a leaf that is slightly worse on
/// the validation rows than the subtree it replaces, trading validation error for
/// a smaller tree. Only `confidence == 0` guarantees that validation error does
/// not increase.
///
/// # Errors
///
/// Returns an error if `validation` lacks the decision attribute or an attribute
/// the tree splits on.
#[instrument(skip_all, fields(decision = decision))]
pub fn prune(
    tree: &mut TreeNode,
    validation: &Dataset,
    decision: &str,
    confidence: f64,
) -> Result<PruneSummary> {
    validation.require_column(decision)?;
    let nodes_before = tree.node_count();

    let mut collapsed = 0;
    if let Outcome::Collapse(leaf) = prune_node(tree, validation, decision, confidence, &mut collapsed)? {
        *tree = leaf;
    }

    let summary = PruneSummary {
        collapsed,
        nodes_before,
        nodes_after: tree.node_count(),
    };
    info!(
        collapsed = summary.collapsed,
        nodes_before = summary.nodes_before,
        nodes_after = summary.nodes_after,
        "pruning complete"
    );
    Ok(summary)
}

fn prune_node(
    node: &mut TreeNode,
    validation: &Dataset,
    decision: &str,
    confidence: f64,
    collapsed: &mut usize,
) -> Result<Outcome> {
    let TreeNode::Internal {
        attribute,
        children,
        depth,
        ..
    } = node
    else {
        return Ok(Outcome::Unchanged);
    };
    let depth = *depth;

    for (value, child) in children.iter_mut() {
        let slice = validation.filter_by(attribute, value)?;
        if slice.is_empty() {
            continue;
        }
        if let Outcome::Collapse(leaf) = prune_node(child, &slice, decision, confidence, collapsed)? {
            *child = leaf;
        }
    }

    if validation.is_empty() {
        return Ok(Outcome::Unchanged);
    }

    let truth = validation.require_column(decision)?;
    let total = validation.nrows() as f64;

    let mut errors = 0usize;
    for (record, expected) in validation.records().zip(truth) {
        match classify(node, &record) {
            Ok(label) if label == *expected => {}
            _ => errors += 1,
        }
    }
    let subtree_error = errors as f64 / total;

    let counts = value_counts(truth);
    let Some((label, hits)) = majority(&counts) else {
        return Ok(Outcome::Unchanged);
    };
    let leaf_error = (validation.nrows() - hits) as f64 / total;

    let margin = confidence * (subtree_error * (1.0 - subtree_error) / total).sqrt();
    if leaf_error <= subtree_error + margin {
        debug!(
            depth,
            label,
            leaf_error,
            subtree_error,
            samples = validation.nrows(),
            "collapsing subtree"
        );
        *collapsed += 1;
        return Ok(Outcome::Collapse(TreeNode::leaf(
            label,
            validation.nrows(),
            depth,
        )));
    }
    Ok(Outcome::Unchanged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TreeError;
    use std::collections::BTreeMap;

    fn column(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn dataset(columns: &[(&str, &[&str])]) -> Dataset {
        Dataset::new(
            columns
                .iter()
                .map(|(name, values)| (name.to_string(), column(values)))
                .collect(),
        )
        .unwrap()
    }

    /// `a` splits into `x -> 1` and `y -> 0`.
    fn stump() -> TreeNode {
        let mut children = BTreeMap::new();
        children.insert("x".to_string(), TreeNode::leaf("1", 2, 1));
        children.insert("y".to_string(), TreeNode::leaf("0", 2, 1));
        TreeNode::Internal {
            attribute: "a".to_string(),
            gain_ratio: 1.0,
            children,
            depth: 0,
        }
    }

    #[test]
    fn test_keeps_useful_split() {
        let mut tree = stump();
        let validation = dataset(&[
            ("a", &["x", "x", "x", "y", "y", "y"]),
            ("d", &["1", "1", "1", "0", "0", "0"]),
        ]);
        let summary = prune(&mut tree, &validation, "d", 1.0).unwrap();
        assert_eq!(summary.collapsed, 0);
        assert_eq!(tree, stump());
    }

    #[test]
    fn test_collapses_useless_split() {
        let mut tree = stump();
        let validation = dataset(&[
            ("a", &["x", "x", "y", "y"]),
            ("d", &["0", "0", "0", "1"]),
        ]);
        let summary = prune(&mut tree, &validation, "d", 1.0).unwrap();
        assert_eq!(summary.collapsed, 1);
        assert_eq!(summary.nodes_before, 3);
        assert_eq!(summary.nodes_after, 1);
        assert_eq!(tree, TreeNode::leaf("0", 4, 0));
    }

    #[test]
    fn test_empty_validation_keeps_tree() {
        let mut tree = stump();
        let validation = dataset(&[("a", &[]), ("d", &[])]);
        let summary = prune(&mut tree, &validation, "d", 1.0).unwrap();
        assert_eq!(summary.collapsed, 0);
        assert_eq!(tree, stump());
    }

    #[test]
    fn test_unreached_child_keeps_shape() {
        let mut inner = BTreeMap::new();
        inner.insert("p".to_string(), TreeNode::leaf("1", 1, 2));
        inner.insert("q".to_string(), TreeNode::leaf("1", 1, 2));
        let mut children = BTreeMap::new();
        children.insert(
            "x".to_string(),
            TreeNode::Internal {
                attribute: "b".to_string(),
                gain_ratio: 0.5,
                children: inner,
                depth: 1,
            },
        );
        children.insert("y".to_string(), TreeNode::leaf("0", 3, 1));
        let mut tree = TreeNode::Internal {
            attribute: "a".to_string(),
            gain_ratio: 1.0,
            children,
            depth: 0,
        };
        let original = tree.clone();

        // no row reaches `x`; the unseen `z` row falls back to the leaf vote ("1")
        let validation = dataset(&[
            ("a", &["y", "y", "z"]),
            ("b", &["p", "q", "p"]),
            ("d", &["0", "0", "1"]),
        ]);
        let summary = prune(&mut tree, &validation, "d", 0.0).unwrap();
        assert_eq!(summary.collapsed, 0);
        assert_eq!(tree, original);
    }

    #[test]
    fn test_standard_error_margin() {
        // subtree error 1/8, leaf error 3/8, standard error about 0.117
        let validation = dataset(&[
            ("a", &["x", "x", "x", "x", "y", "y", "y", "y"]),
            ("d", &["1", "1", "1", "0", "0", "0", "0", "0"]),
        ]);

        let mut strict = stump();
        prune(&mut strict, &validation, "d", 0.0).unwrap();
        assert_eq!(strict, stump());

        let mut lenient = stump();
        prune(&mut lenient, &validation, "d", 3.0).unwrap();
        assert_eq!(lenient, TreeNode::leaf("0", 8, 0));
    }

    #[test]
    fn test_margin_can_raise_validation_error() {
        let validation = dataset(&[
            ("a", &["x", "x", "x", "x", "y", "y", "y", "y"]),
            ("d", &["1", "1", "1", "0", "0", "0", "0", "0"]),
        ]);
        let errors = |tree: &TreeNode| {
            validation
                .records()
                .zip(validation.column("d").unwrap())
                .filter(|(record, expected)| classify(tree, record).unwrap() != **expected)
                .count()
        };

        let mut tree = stump();
        assert_eq!(errors(&tree), 1);
        let summary = prune(&mut tree, &validation, "d", 3.0).unwrap();
        assert_eq!(summary.collapsed, 1);
        assert_eq!(errors(&tree), 3);
    }

    #[test]
    fn test_missing_decision() {
        let mut tree = stump();
        let validation = dataset(&[("a", &["x"])]);
        assert!(matches!(
            prune(&mut tree, &validation, "d", 1.0),
            Err(TreeError::MissingAttribute { .. })
        ));
    }
}
