use crate::error::{Result, TreeError};
use nalgebra::Matrix2;

/// Binary confusion matrix; rows are actual classes, columns predicted
/// classes, index 1 is the positive class.
pub type ConfusionMatrix = Matrix2<usize>;

/// Accuracy, precision and recall of a set of predictions.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationResult {
    /// The label treated as the positive class.
    pub positive: Option<String>,
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
}

impl EvaluationResult {
    pub fn true_positives(&self) -> usize {
        self.confusion[(1, 1)]
    }

    pub fn false_positives(&self) -> usize {
        self.confusion[(0, 1)]
    }

    pub fn false_negatives(&self) -> usize {
        self.confusion[(1, 0)]
    }

    pub fn true_negatives(&self) -> usize {
        self.confusion[(0, 0)]
    }

    pub fn f1_score(&self) -> f64 {
        let sum = self.precision + self.recall;
        if sum.abs() < f64::EPSILON {
            return 0.0;
        }
        2.0 * self.precision * self.recall / sum
    }
}

/// The positive class: `"1"` if it is among the true labels, otherwise the
/// first true label in sequence order.
pub fn positive_label<S: AsRef<str>>(y_true: &[S]) -> Option<&str> {
    y_true
        .iter()
        .map(|label| label.as_ref())
        .find(|&label| label == "1")
        .or_else(|| y_true.first().map(|label| label.as_ref()))
}

/// Computes the binary confusion matrix of `y_pred` against `y_true`.
///
/// Correct predictions land on the diagonal. Every incorrect prediction, a
/// missing one included, is a false negative on a positive record and a false
/// positive on a negative record.
///
/// # Errors
///
/// Returns an error if the sequences differ in length.
pub fn confusion_matrix<S: AsRef<str>>(
    y_true: &[S],
    y_pred: &[Option<S>],
) -> Result<ConfusionMatrix> {
    if y_true.len() != y_pred.len() {
        return Err(TreeError::LengthMismatch {
            expected: y_true.len(),
            got: y_pred.len(),
        });
    }

    let mut matrix = ConfusionMatrix::zeros();
    let Some(positive) = positive_label(y_true) else {
        return Ok(matrix);
    };

    for (y_t, y_p) in y_true.iter().zip(y_pred.iter()) {
        let actual = usize::from(y_t.as_ref() == positive);
        let correct = y_p.as_ref().is_some_and(|p| p.as_ref() == y_t.as_ref());
        let predicted = if correct { actual } else { 1 - actual };
        matrix[(actual, predicted)] += 1;
    }

    Ok(matrix)
}

/// Scores predictions against true labels.
///
/// Ratios with a zero denominator are reported as 0.
///
/// # Errors
///
/// Returns an error if the sequences differ in length.
pub fn evaluate<S: AsRef<str>>(y_true: &[S], y_pred: &[Option<S>]) -> Result<EvaluationResult> {
    let confusion = confusion_matrix(y_true, y_pred)?;
    let tp = confusion[(1, 1)];
    let fp = confusion[(0, 1)];
    let fn_ = confusion[(1, 0)];
    let tn = confusion[(0, 0)];

    Ok(EvaluationResult {
        positive: positive_label(y_true).map(str::to_string),
        confusion,
        accuracy: ratio(tp + tn, y_true.len()),
        precision: ratio(tp, tp + fp),
        recall: ratio(tp, tp + fn_),
    })
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

/// Scoring shared by classifiers.
pub trait ClassificationMetrics {
    /// Computes the confusion matrix based on the true labels and predicted labels.
    fn confusion_matrix<S: AsRef<str>>(
        &self,
        y_true: &[S],
        y_pred: &[Option<S>],
    ) -> Result<ConfusionMatrix> {
        confusion_matrix(y_true, y_pred)
    }

    /// Computes accuracy, precision and recall based on the true labels and predicted labels.
    fn evaluate<S: AsRef<str>>(&self, y_true: &[S], y_pred: &[Option<S>]) -> Result<EvaluationResult> {
        evaluate(y_true, y_pred)
    }
}
