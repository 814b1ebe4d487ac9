use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Required input file not found: {}", path.display())]
    MissingInputFile { path: PathBuf },

    #[error("Malformed table {}: {source}", path.display())]
    MalformedTable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed date '{value}': expected MM/DD/YYYY")]
    MalformedDate { value: String },

    #[error("{table}.{field} = {id} does not resolve to an existing record")]
    UnknownForeignKey {
        table: &'static str,
        field: &'static str,
        id: u64,
    },

    #[error("Customer record {index} has unknown segment '{value}'")]
    UnknownSegment { index: usize, value: String },

    #[error("Customer record {index} has unknown compliance maturity '{value}'")]
    UnknownMaturity { index: usize, value: String },

    #[error("Framework '{name}' missing from the catalog")]
    MissingFramework { name: String },

    #[error("Adoption {adoption_id} completes before it starts")]
    InvalidTimeline { adoption_id: u64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type GenResult<T> = Result<T, GenError>;
