/*!
# CLI module
Command line interface functionality for building isolate summaries.
*/

/// The main CLI module that contains the top-level CLI parser and help text
pub mod core;
/// The summarize CLI subcommand
pub mod summarize;
