use crate::error::{Result, TreeError};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::{self, Debug, Formatter};

/// A single record keyed by attribute name.
pub type Record = HashMap<String, String>;

/// Column-oriented table of categorical values.
///
/// Every column holds exactly `nrows` values; attribute order is the order the
/// columns were supplied in.
#[derive(Clone, PartialEq)]
pub struct Dataset {
    attributes: Vec<String>,
    columns: Vec<Vec<String>>,
    nrows: usize,
}

impl Debug for Dataset {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset {{")?;
        for (name, column) in self.attributes.iter().zip(self.columns.iter()) {
            write!(f, "    {}: [", name)?;
            for value in column {
                write!(f, "{}, ", value)?;
            }
            writeln!(f, "],")?;
        }
        write!(f, "}}")
    }
}

impl Dataset {
    /// Creates a dataset from `(attribute, values)` columns.
    ///
    /// # Errors
    ///
    /// Returns an error if an attribute name repeats or if the columns differ in length.
    pub fn new(columns: Vec<(String, Vec<String>)>) -> Result<Self> {
        let nrows = columns.first().map_or(0, |(_, values)| values.len());
        let mut seen = HashSet::new();
        let mut attributes = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());

        for (name, column) in columns {
            if !seen.insert(name.clone()) {
                return Err(TreeError::DuplicateAttribute { name });
            }
            if column.len() != nrows {
                return Err(TreeError::ColumnLengthMismatch {
                    name,
                    expected: nrows,
                    got: column.len(),
                });
            }
            attributes.push(name);
            values.push(column);
        }

        Ok(Self {
            attributes,
            columns: values,
            nrows,
        })
    }

    /// Creates a dataset from a header and row-major records.
    ///
    /// # Errors
    ///
    /// Returns an error if a row's width differs from the header or a header name repeats.
    pub fn from_rows(attributes: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut columns = vec![Vec::with_capacity(rows.len()); attributes.len()];
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != attributes.len() {
                return Err(TreeError::RowLengthMismatch {
                    row: row_index,
                    expected: attributes.len(),
                    got: row.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }
        Self::new(attributes.into_iter().zip(columns).collect())
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nrows == 0
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|name| name == attribute)
    }

    /// Returns the values of `attribute`, if present.
    pub fn column(&self, attribute: &str) -> Option<&[String]> {
        self.attributes
            .iter()
            .position(|name| name == attribute)
            .map(|index| self.columns[index].as_slice())
    }

    /// Like [`Dataset::column`] but reports a missing attribute as an error.
    pub fn require_column(&self, attribute: &str) -> Result<&[String]> {
        self.column(attribute)
            .ok_or_else(|| TreeError::MissingAttribute {
                name: attribute.to_string(),
            })
    }

    /// Iterates over `(attribute, values)` pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.attributes
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Materializes row `index` as a [`Record`].
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn record(&self, index: usize) -> Record {
        self.columns()
            .map(|(name, values)| (name.to_string(), values[index].clone()))
            .collect()
    }

    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        (0..self.nrows).map(|index| self.record(index))
    }

    /// Returns a new dataset holding the rows at `indices`, in that order.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|column| indices.iter().map(|&index| column[index].clone()).collect())
            .collect();

        Self {
            attributes: self.attributes.clone(),
            columns,
            nrows: indices.len(),
        }
    }

    /// Row indices grouped by each distinct value of `attribute`.
    pub fn group_indices(&self, attribute: &str) -> Result<BTreeMap<String, Vec<usize>>> {
        let column = self.require_column(attribute)?;
        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (index, value) in column.iter().enumerate() {
            groups.entry(value.clone()).or_default().push(index);
        }
        Ok(groups)
    }

    /// Rows where `attribute` equals `value`. The result may be empty.
    pub fn filter_by(&self, attribute: &str, value: &str) -> Result<Self> {
        let indices: Vec<usize> = self
            .require_column(attribute)?
            .iter()
            .enumerate()
            .filter(|(_, candidate)| candidate.as_str() == value)
            .map(|(index, _)| index)
            .collect();
        Ok(self.select_rows(&indices))
    }

    /// Shuffles the rows and splits them into disjoint train and test sets.
    ///
    /// # Errors
    ///
    /// Returns an error if `train_size` is outside `[0.0, 1.0]`.
    pub fn train_test_split(&self, train_size: f64, seed: Option<u64>) -> Result<(Self, Self)> {
        let ratios = SplitRatios::new(train_size, 0.0)?.with_seed(seed);
        let (train, _, test) = self.train_validation_test_split(&ratios)?;
        Ok((train, test))
    }

    /// Shuffles the rows and splits them into disjoint train, validation and test sets.
    ///
    /// The test set receives every row not taken by the first two.
    pub fn train_validation_test_split(&self, ratios: &SplitRatios) -> Result<(Self, Self, Self)> {
        ratios.validate()?;
        let mut rng = match ratios.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut indices = (0..self.nrows).collect::<Vec<_>>();
        indices.shuffle(&mut rng);

        let train_end = (self.nrows as f64 * ratios.train).floor() as usize;
        let validation_end =
            (train_end + (self.nrows as f64 * ratios.validation).floor() as usize).min(self.nrows);

        Ok((
            self.select_rows(&indices[..train_end]),
            self.select_rows(&indices[train_end..validation_end]),
            self.select_rows(&indices[validation_end..]),
        ))
    }
}

/// Fractions of rows assigned to the train and validation sets.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitRatios {
    pub train: f64,
    pub validation: f64,
    pub seed: Option<u64>,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.6,
            validation: 0.2,
            seed: None,
        }
    }
}

impl SplitRatios {
    /// # Errors
    ///
    /// Returns an error if either fraction is outside `[0.0, 1.0]` or they sum above 1.
    pub fn new(train: f64, validation: f64) -> Result<Self> {
        let ratios = Self {
            train,
            validation,
            seed: None,
        };
        ratios.validate()?;
        Ok(ratios)
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn test(&self) -> f64 {
        (1.0 - self.train - self.validation).max(0.0)
    }

    fn validate(&self) -> Result<()> {
        for (name, fraction) in [("train", self.train), ("validation", self.validation)] {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(TreeError::InvalidSplit(format!(
                    "{} size should be between 0.0 and 1.0, got {}",
                    name, fraction
                )));
            }
        }
        if self.train + self.validation > 1.0 + f64::EPSILON {
            return Err(TreeError::InvalidSplit(format!(
                "train and validation sizes sum to {}",
                self.train + self.validation
            )));
        }
        Ok(())
    }
}
