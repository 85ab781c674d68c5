/// Errors from decision tree induction, pruning and evaluation.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Returned when a tree is built from a dataset with zero records.
    #[error("dataset has zero records")]
    EmptyDataset,

    /// Returned when a named attribute is not a column of the dataset.
    #[error("attribute '{name}' not found in dataset")]
    MissingAttribute {
        /// The attribute that was looked up.
        name: String,
    },

    /// Returned when a column's length differs from the record count.
    #[error("column '{name}' has {got} values, expected {expected}")]
    ColumnLengthMismatch {
        /// The offending column.
        name: String,
        /// The record count established by the first column.
        expected: usize,
        /// The length of the offending column.
        got: usize,
    },

    /// Returned when a row has a different number of fields than there are attributes.
    #[error("row {row} has {got} fields, expected {expected}")]
    RowLengthMismatch {
        /// Zero-based index of the offending row.
        row: usize,
        /// Number of attributes.
        expected: usize,
        /// Number of fields in the row.
        got: usize,
    },

    /// Returned when two columns share a name.
    #[error("attribute '{name}' appears more than once")]
    DuplicateAttribute {
        /// The repeated attribute name.
        name: String,
    },

    /// Returned when label and prediction sequences differ in length.
    #[error("predictions and labels are of different sizes: {expected} labels, {got} predictions")]
    LengthMismatch {
        /// Number of true labels.
        expected: usize,
        /// Number of predictions.
        got: usize,
    },

    /// Returned when a configuration setter rejects a value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Returned when train/validation/test fractions are out of range.
    #[error("invalid split: {0}")]
    InvalidSplit(String),

    /// Returned when no leaf is reachable from a node.
    #[error("tree has no reachable leaves")]
    Unclassifiable,

    /// Returned when prediction or pruning is requested before `fit`.
    #[error("classifier has not been fitted")]
    NotFitted,

    /// Malformed delimited text.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Underlying I/O failure while reading a data file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TreeError>;
