//! Value distributions, entropy and gain-ratio scoring.
//!
//! All tables are keyed by `BTreeMap`, so iteration is in sorted key order and
//! every "first maximum" taken over a table resolves ties to the smallest key.
use crate::data::dataset::Dataset;
use crate::error::Result;
use std::collections::BTreeMap;

/// Occurrences of each distinct value of one attribute.
pub type ValueCounts = BTreeMap<String, usize>;
/// attribute -> value -> count
pub type FeatureCount = BTreeMap<String, ValueCounts>;
/// attribute -> value -> probability
pub type ProbabilityTable = BTreeMap<String, BTreeMap<String, f64>>;
/// attribute -> entropy in bits
pub type EntropyTable = BTreeMap<String, f64>;
/// attribute -> score (conditional information, gain or gain ratio)
pub type AttributeScores = BTreeMap<String, f64>;

/// Gains at or below this are rounding noise and count as no gain.
pub const GAIN_EPSILON: f64 = 1e-12;

pub fn value_counts<S: AsRef<str>>(values: &[S]) -> ValueCounts {
    values.iter().fold(BTreeMap::new(), |mut acc, value| {
        *acc.entry(value.as_ref().to_string()).or_insert(0) += 1;
        acc
    })
}

/// Counts the occurrences of each distinct value, for every attribute.
pub fn feature_counts(dataset: &Dataset) -> FeatureCount {
    dataset
        .columns()
        .map(|(name, values)| (name.to_string(), value_counts(values)))
        .collect()
}

/// Converts counts to relative frequencies.
///
/// An attribute without any counted values maps to an empty distribution.
pub fn probabilities(counts: &FeatureCount) -> ProbabilityTable {
    counts
        .iter()
        .map(|(name, value_counts)| (name.clone(), distribution(value_counts)))
        .collect()
}

fn distribution(counts: &ValueCounts) -> BTreeMap<String, f64> {
    let total: usize = counts.values().sum();
    if total == 0 {
        return BTreeMap::new();
    }
    counts
        .iter()
        .map(|(value, &count)| (value.clone(), count as f64 / total as f64))
        .collect()
}

/// Shannon entropy (base 2) of every attribute's distribution.
pub fn entropy(probabilities: &ProbabilityTable) -> EntropyTable {
    probabilities
        .iter()
        .map(|(name, distribution)| (name.clone(), shannon_entropy(distribution.values().copied())))
        .collect()
}

/// `-Σ p·log2(p)`; zero probabilities contribute nothing.
pub fn shannon_entropy(probabilities: impl IntoIterator<Item = f64>) -> f64 {
    let entropy = probabilities
        .into_iter()
        .filter(|&p| p > 0.0)
        .fold(0.0, |acc, p| acc - p * p.log2());
    // -0.0 from a certain outcome
    entropy.max(0.0)
}

/// Entropy of the empirical distribution of `values`.
pub fn entropy_of<S: AsRef<str>>(values: &[S]) -> f64 {
    shannon_entropy(distribution(&value_counts(values)).into_values())
}

/// Expected entropy of the decision attribute after splitting on each other attribute.
///
/// # Errors
///
/// Returns an error if `decision` is not a column of `dataset`.
pub fn conditional_information(dataset: &Dataset, decision: &str) -> Result<AttributeScores> {
    let decisions = dataset.require_column(decision)?;
    Ok(dataset
        .columns()
        .filter(|(name, _)| *name != decision)
        .map(|(name, values)| (name.to_string(), split_information(values, decisions)))
        .collect())
}

fn split_information(values: &[String], decisions: &[String]) -> f64 {
    let total = values.len();
    let mut partitions: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (value, decision) in values.iter().zip(decisions) {
        partitions.entry(value).or_default().push(decision);
    }

    partitions
        .values()
        .map(|subset| (subset.len() as f64 / total as f64) * entropy_of(subset.as_slice()))
        .sum()
}

/// `entropy(decision) - conditional information` per attribute.
pub fn information_gain(decision_entropy: f64, conditional: &AttributeScores) -> AttributeScores {
    conditional
        .iter()
        .map(|(name, info)| (name.clone(), decision_entropy - info))
        .collect()
}

/// Information gain divided by the attribute's own entropy.
///
/// An attribute with a single observed value has zero entropy and gets ratio 0,
/// as does one whose gain does not exceed [`GAIN_EPSILON`].
///
/// # Errors
///
/// Returns an error if `decision` is not a column of `dataset`.
pub fn gain_ratio(dataset: &Dataset, decision: &str) -> Result<AttributeScores> {
    let decisions = dataset.require_column(decision)?;
    let decision_entropy = entropy_of(decisions);
    Ok(dataset
        .columns()
        .filter(|(name, _)| *name != decision)
        .map(|(name, values)| {
            (
                name.to_string(),
                attribute_gain_ratio(values, decisions, decision_entropy),
            )
        })
        .collect())
}

/// Gain ratio of one attribute column against the decision column.
pub(crate) fn attribute_gain_ratio(
    values: &[String],
    decisions: &[String],
    decision_entropy: f64,
) -> f64 {
    let split_entropy = entropy_of(values);
    if split_entropy <= 0.0 {
        return 0.0;
    }
    let gain = decision_entropy - split_information(values, decisions);
    if gain <= GAIN_EPSILON {
        return 0.0;
    }
    gain / split_entropy
}

/// Most frequent value and its count; ties go to the smallest value.
pub fn majority(counts: &ValueCounts) -> Option<(&str, usize)> {
    let mut best: Option<(&str, usize)> = None;
    for (value, &count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value.as_str(), count));
        }
    }
    best
}

/// Per-attribute summary of a dataset against its decision attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct InformationReport {
    pub decision: String,
    pub entropy: EntropyTable,
    pub information_gain: AttributeScores,
    pub gain_ratio: AttributeScores,
}

impl InformationReport {
    /// # Errors
    ///
    /// Returns an error if `decision` is not a column of `dataset`.
    pub fn compute(dataset: &Dataset, decision: &str) -> Result<Self> {
        let entropy = entropy(&probabilities(&feature_counts(dataset)));
        let conditional = conditional_information(dataset, decision)?;
        let decision_entropy = entropy.get(decision).copied().unwrap_or(0.0);

        Ok(Self {
            decision: decision.to_string(),
            information_gain: information_gain(decision_entropy, &conditional),
            gain_ratio: gain_ratio(dataset, decision)?,
            entropy,
        })
    }
}
