//! Delimited text ingestion.
use super::dataset::Dataset;
use crate::error::{Result, TreeError};
use csv::ReaderBuilder;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Delimiters tried by [`sniff_delimiter`], in priority order.
pub const CANDIDATE_DELIMITERS: [u8; 4] = [b'\t', b';', b',', b' '];

const SNIFF_LINES: usize = 5;

/// Guesses the field delimiter from the first few lines of `raw`.
///
/// A candidate qualifies when it occurs the same, non-zero number of times on
/// every inspected non-blank line. The qualifying candidate with the highest
/// per-line count wins; `,` is used when nothing qualifies.
pub fn sniff_delimiter(raw: &str) -> u8 {
    let lines: Vec<&str> = raw
        .lines()
        .take(SNIFF_LINES)
        .filter(|line| !line.trim().is_empty())
        .collect();

    let mut best: Option<(u8, usize)> = None;
    for &delimiter in CANDIDATE_DELIMITERS.iter() {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| line.bytes().filter(|&b| b == delimiter).count())
            .collect();
        let Some(&first) = counts.first() else {
            continue;
        };
        if first > 0 && counts.iter().all(|&count| count == first) {
            if best.map_or(true, |(_, count)| first > count) {
                best = Some((delimiter, first));
            }
        }
    }

    match best {
        Some((delimiter, _)) => delimiter,
        None => {
            warn!("could not determine the delimiter unambiguously, falling back to ','");
            b','
        }
    }
}

/// Drops one pair of double quotes wrapping the whole input.
///
/// Inputs with quotes anywhere else are returned unchanged, so quoted fields are
/// left to the csv parser.
fn strip_wrapping_quotes(raw: &str) -> &str {
    let trimmed = raw.trim_end();
    match trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) if !inner.contains('"') => inner,
        _ => raw,
    }
}

/// Parses delimited text into a [`Dataset`].
///
/// Without a header row, attributes are named `c1..c{n-1}` and the last one `d`.
///
/// # Errors
///
/// Returns an error on malformed input or rows of uneven width.
pub fn read_str(raw: &str, has_headers: bool) -> Result<Dataset> {
    let raw = strip_wrapping_quotes(raw.trim_start_matches('\u{feff}'));
    let delimiter = sniff_delimiter(raw);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(false)
        .from_reader(raw.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let attributes = if has_headers {
        if rows.is_empty() {
            Vec::new()
        } else {
            rows.remove(0)
        }
    } else {
        default_attribute_names(rows.first().map_or(0, Vec::len))
    };

    let shown = (delimiter as char).escape_default().to_string();
    debug!(
        delimiter = %shown,
        n_attributes = attributes.len(),
        n_records = rows.len(),
        "parsed delimited data"
    );

    Dataset::from_rows(attributes, rows)
}

/// Reads and parses the file at `path`, see [`read_str`].
pub fn read_path(path: impl AsRef<Path>, has_headers: bool) -> Result<Dataset> {
    let raw = fs::read_to_string(path)?;
    read_str(&raw, has_headers)
}

/// Names `c1..c{width-1}` followed by `d` for the decision column.
pub fn default_attribute_names(width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    (1..width)
        .map(|i| format!("c{}", i))
        .chain(std::iter::once("d".to_string()))
        .collect()
}

/// Resolves a decision column given by name or by 1-based index.
pub fn resolve_decision(dataset: &Dataset, selector: &str) -> Result<String> {
    if dataset.contains(selector) {
        return Ok(selector.to_string());
    }
    selector
        .parse::<usize>()
        .ok()
        .and_then(|index| index.checked_sub(1))
        .and_then(|index| dataset.attributes().get(index))
        .cloned()
        .ok_or_else(|| TreeError::MissingAttribute {
            name: selector.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("a;b;c\n1;2;3\n"), b';');
        assert_eq!(sniff_delimiter("a\tb\n1\t2\n"), b'\t');
        assert_eq!(sniff_delimiter("a b,c\n1 2,3\n"), b',');
    }

    #[test]
    fn test_sniff_delimiter_prefers_highest_count() {
        // both ',' and ' ' are consistent, ' ' occurs more often per line
        assert_eq!(sniff_delimiter("a b c,d\ne f g,h\n"), b' ');
    }

    #[test]
    fn test_sniff_delimiter_fallback() {
        assert_eq!(sniff_delimiter("a;b\n1,2\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn test_sniff_delimiter_skips_blank_lines() {
        assert_eq!(sniff_delimiter("a;b\n\n1;2\n"), b';');
    }

    #[test]
    fn test_read_str_with_headers() {
        let dataset = read_str("\u{feff}outlook;play\nsunny;no\nrain;yes\n", true).unwrap();
        assert_eq!(dataset.attributes(), &["outlook".to_string(), "play".to_string()]);
        assert_eq!(dataset.nrows(), 2);
        assert_eq!(dataset.column("play").unwrap()[1], "yes");
    }

    #[test]
    fn test_read_str_without_headers() {
        let dataset = read_str("x,a,1\ny,b,0\n", false).unwrap();
        assert_eq!(
            dataset.attributes(),
            &["c1".to_string(), "c2".to_string(), "d".to_string()]
        );
        assert_eq!(dataset.column("d").unwrap()[0], "1");
    }

    #[test]
    fn test_read_str_strips_wrapping_quotes() {
        let dataset = read_str("\"a,d\nx,1\ny,0\"", true).unwrap();
        assert_eq!(dataset.attributes(), &["a".to_string(), "d".to_string()]);
        assert_eq!(dataset.nrows(), 2);
        assert_eq!(dataset.column("d").unwrap()[1], "0");
    }

    #[test]
    fn test_read_str_keeps_quoted_fields() {
        let dataset = read_str("\"a\",\"d\"\n\"x\",\"1\"", true).unwrap();
        assert_eq!(dataset.attributes(), &["a".to_string(), "d".to_string()]);
        assert_eq!(dataset.column("a").unwrap()[0], "x");
    }

    #[test]
    fn test_read_str_ragged_rows() {
        assert!(read_str("a,b\n1,2\n3,4,5\n", true).is_err());
    }

    #[test]
    fn test_resolve_decision() {
        let dataset = read_str("a,b,salary\nx,y,1\n", true).unwrap();
        assert_eq!(resolve_decision(&dataset, "salary").unwrap(), "salary");
        assert_eq!(resolve_decision(&dataset, "2").unwrap(), "b");
        assert!(resolve_decision(&dataset, "0").is_err());
        assert!(resolve_decision(&dataset, "4").is_err());
        assert!(resolve_decision(&dataset, "age").is_err());
    }
}
