//! Decision Tree Classifier
use super::{
    node::TreeNode,
    params::TreeParams,
    prune::{prune, PruneSummary},
};
use crate::{
    data::dataset::{Dataset, Record},
    error::{Result, TreeError},
    information::{attribute_gain_ratio, entropy_of, majority, value_counts},
    metrics::confusion::{ClassificationMetrics, EvaluationResult},
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument};

/// Gain-ratio decision tree over categorical attributes.
#[derive(Clone, Debug)]
pub struct DecisionTreeClassifier {
    root: Option<TreeNode>,
    decision: Option<String>,
    tree_params: TreeParams,
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassificationMetrics for DecisionTreeClassifier {}

impl DecisionTreeClassifier {
    /// Creates an unfitted classifier with default parameters.
    pub fn new() -> Self {
        Self {
            root: None,
            decision: None,
            tree_params: TreeParams::new(),
        }
    }

    /// Creates an unfitted classifier with custom parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the maximum depth is 0 or the minimum number of samples to split is 0.
    pub fn with_params(max_depth: Option<u16>, min_samples_split: Option<u16>) -> Result<Self> {
        let mut tree = Self::new();
        tree.tree_params.set_max_depth(max_depth)?;
        tree.tree_params
            .set_min_samples_split(min_samples_split.unwrap_or(1))?;
        Ok(tree)
    }

    pub fn from_tree_params(tree_params: TreeParams) -> Self {
        Self {
            root: None,
            decision: None,
            tree_params,
        }
    }

    pub fn tree_params(&self) -> &TreeParams {
        &self.tree_params
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<()> {
        self.tree_params.set_max_depth(max_depth)
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: u16) -> Result<()> {
        self.tree_params.set_min_samples_split(min_samples_split)
    }

    pub fn set_pruning_confidence(&mut self, pruning_confidence: f64) -> Result<()> {
        self.tree_params.set_pruning_confidence(pruning_confidence)
    }

    /// The fitted tree, if any.
    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    /// The decision attribute the tree was fitted against.
    pub fn decision(&self) -> Option<&str> {
        self.decision.as_deref()
    }

    /// Grows the tree on every non-decision attribute of `dataset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset is empty or lacks the decision attribute.
    #[instrument(skip_all, fields(decision = decision))]
    pub fn fit(&mut self, dataset: &Dataset, decision: &str) -> Result<()> {
        let candidates: Vec<String> = dataset.attributes().to_vec();
        let root = build_with_params(dataset, &candidates, decision, &self.tree_params)?;

        info!(
            n_records = dataset.nrows(),
            n_nodes = root.node_count(),
            n_leaves = root.leaf_count(),
            max_depth = root.max_depth(),
            "decision tree built"
        );

        self.root = Some(root);
        self.decision = Some(decision.to_string());
        Ok(())
    }

    /// Prunes the fitted tree against `validation`.
    ///
    /// # Errors
    ///
    /// Returns an error if the classifier is unfitted or `validation` lacks an attribute the tree uses.
    pub fn prune(&mut self, validation: &Dataset) -> Result<PruneSummary> {
        let decision = self.decision.as_deref().ok_or(TreeError::NotFitted)?;
        let root = self.root.as_mut().ok_or(TreeError::NotFitted)?;
        prune(
            root,
            validation,
            decision,
            self.tree_params.pruning_confidence(),
        )
    }

    /// Labels a single record.
    pub fn predict_record(&self, record: &Record) -> Result<String> {
        let root = self.root.as_ref().ok_or(TreeError::NotFitted)?;
        classify(root, record)
    }

    /// Labels every record of `dataset`; unclassifiable records yield `None`.
    pub fn predict(&self, dataset: &Dataset) -> Result<Vec<Option<String>>> {
        let root = self.root.as_ref().ok_or(TreeError::NotFitted)?;
        dataset
            .records()
            .map(|record| match classify(root, &record) {
                Ok(label) => Ok(Some(label)),
                Err(TreeError::Unclassifiable) => Ok(None),
                Err(err) => Err(err),
            })
            .collect()
    }

    /// Predicts `dataset` and scores the predictions against its decision column.
    pub fn score(&self, dataset: &Dataset) -> Result<EvaluationResult> {
        let decision = self.decision.as_deref().ok_or(TreeError::NotFitted)?;
        let truth = dataset.require_column(decision)?;
        let predictions = self.predict(dataset)?;
        self.evaluate(truth, &predictions)
    }
}

/// Builds a tree with default parameters, splitting only on `candidates`.
///
/// The decision attribute is never a split candidate, even if listed.
///
/// # Errors
///
/// Returns an error if `dataset` has no records or lacks `decision` or a candidate attribute.
pub fn build(dataset: &Dataset, candidates: &[String], decision: &str) -> Result<TreeNode> {
    build_with_params(dataset, candidates, decision, &TreeParams::new())
}

pub fn build_with_params(
    dataset: &Dataset,
    candidates: &[String],
    decision: &str,
    params: &TreeParams,
) -> Result<TreeNode> {
    dataset.require_column(decision)?;
    if dataset.is_empty() {
        return Err(TreeError::EmptyDataset);
    }
    let candidates: BTreeSet<String> = candidates
        .iter()
        .filter(|name| name.as_str() != decision)
        .cloned()
        .collect();
    for name in &candidates {
        dataset.require_column(name)?;
    }

    grow(dataset, &candidates, decision, 0, params)
}

fn grow(
    dataset: &Dataset,
    candidates: &BTreeSet<String>,
    decision: &str,
    depth: usize,
    params: &TreeParams,
) -> Result<TreeNode> {
    let decisions = dataset.require_column(decision)?;
    let depth_reached = params
        .max_depth()
        .is_some_and(|max_depth| depth >= usize::from(max_depth));

    if !depth_reached && dataset.nrows() >= usize::from(params.min_samples_split()) {
        if let Some((attribute, ratio)) = best_split(dataset, candidates, decisions)? {
            if ratio > params.min_gain_ratio() {
                debug!(attribute = %attribute, gain_ratio = ratio, depth, "splitting node");

                let mut remaining = candidates.clone();
                remaining.remove(&attribute);

                let mut children = BTreeMap::new();
                for (value, indices) in dataset.group_indices(&attribute)? {
                    let subset = dataset.select_rows(&indices);
                    let child = grow(&subset, &remaining, decision, depth + 1, params)?;
                    children.insert(value, child);
                }

                return Ok(TreeNode::Internal {
                    attribute,
                    gain_ratio: round6(ratio),
                    children,
                    depth,
                });
            }
        }
    }

    let label = majority(&value_counts(decisions))
        .map(|(label, _)| label.to_string())
        .ok_or(TreeError::EmptyDataset)?;
    debug!(label = %label, samples = dataset.nrows(), depth, "creating leaf");
    Ok(TreeNode::leaf(label, dataset.nrows(), depth))
}

/// Candidate with the strictly largest gain ratio; ties go to the smallest name.
fn best_split(
    dataset: &Dataset,
    candidates: &BTreeSet<String>,
    decisions: &[String],
) -> Result<Option<(String, f64)>> {
    let decision_entropy = entropy_of(decisions);
    let mut best: Option<(String, f64)> = None;

    for name in candidates {
        let values = dataset.require_column(name)?;
        let ratio = attribute_gain_ratio(values, decisions, decision_entropy);
        if best.as_ref().map_or(true, |(_, best_ratio)| ratio > *best_ratio) {
            best = Some((name.clone(), ratio));
        }
    }
    Ok(best)
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Walks `tree` to a leaf for `record`.
///
/// When the record's value for a node's attribute is missing or was never seen
/// during training, the label held by the most leaves below that node is returned.
///
/// # Errors
///
/// Returns [`TreeError::Unclassifiable`] if the fallback finds no leaf.
pub fn classify(tree: &TreeNode, record: &Record) -> Result<String> {
    match tree {
        TreeNode::Leaf { label, .. } => Ok(label.clone()),
        TreeNode::Internal {
            attribute,
            children,
            ..
        } => match record.get(attribute).and_then(|value| children.get(value)) {
            Some(child) => classify(child, record),
            None => tree.majority_vote().ok_or(TreeError::Unclassifiable),
        },
    }
}
