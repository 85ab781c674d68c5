/// Column-oriented categorical dataset
pub mod dataset;
/// Delimited text reader with delimiter sniffing
pub mod reader;
