/// Loads the per-tool hit tables into memory
pub mod hit_table;
