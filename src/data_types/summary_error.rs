use std::path::PathBuf;

use crate::data_types::hit_record::HitCategory;

/// Failures that stop a summary from being built
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SummaryError {
    #[error("{category} hit table is missing required column \"{column}\"")]
    MalformedInput { category: HitCategory, column: String },
    #[error("{category} hit table line {line} has no value for \"{column}\"")]
    MissingValue { category: HitCategory, line: usize, column: String },
    #[error("isolate name \"{name}\" is derived from both {first:?} and {second:?}")]
    AmbiguousIsolateName { name: String, first: PathBuf, second: PathBuf },
    #[error("no isolate name can be derived from {path:?}")]
    EmptyIsolateName { path: PathBuf }
}
