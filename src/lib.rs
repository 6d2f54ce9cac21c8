/// Command line interface functionality
pub mod cli;
/// Contains the hit, isolate, and summary data types
pub mod data_types;
/// Tooling for parsing input files into meaningful structs / data
pub mod parsing;
/// Core logic for collapsing hit tables into a per-isolate summary
pub mod summarizer;
/// Various utility functions that tend to be very generic
pub mod util;
/// All output writers
pub mod writers;
