/*!
# Writers module
Contains the logic for writing the summary outputs.
*/
/// Generates the per-isolate summary file
pub mod summary;
