/// Contains the collection of hits from a single detection tool
pub mod hit_collection;
/// Contains a single detection hit and the tool categories
pub mod hit_record;
/// Contains the set of scanned isolates and the isolate naming rule
pub mod isolate_set;
/// Errors raised while building a summary
pub mod summary_error;
/// Contains the per-isolate summary output table
pub mod summary_table;
