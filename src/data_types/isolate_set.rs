use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::data_types::summary_error::SummaryError;

/// Derives an isolate identifier from a scanned file path.
/// This is the text after the last path separator with exactly one trailing extension removed, e.g. `dir/sample.1.fasta` -> `sample.1`.
/// Leading dots never start an extension, so `.hidden` and `..` are kept whole.
/// Returns None if nothing is left, which includes paths ending in a separator.
pub fn isolate_name(path: &Path) -> Option<String> {
    let full = path.to_string_lossy();
    let base = full.rsplit(std::path::is_separator).next().unwrap_or_default();

    let leading_dots = base.len() - base.trim_start_matches('.').len();
    let stem = match base[leading_dots..].rfind('.') {
        Some(dot) => &base[..leading_dots + dot],
        None => base
    };

    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

/// The unique identifiers of every isolate that was scanned, including those without hits.
/// Iteration is always in ascending identifier order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IsolateSet {
    /// Lookup from identifier to the path it was derived from
    names: BTreeMap<String, PathBuf>
}

impl IsolateSet {
    /// Builds the set from scanned file paths.
    /// # Arguments
    /// * `paths` - one path per scanned isolate
    /// # Errors
    /// * if a path does not have a usable file name
    /// * if two different paths derive the same identifier
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self, SummaryError> {
        let mut names: BTreeMap<String, PathBuf> = Default::default();
        for path in paths.iter().map(|p| p.as_ref()) {
            let name = isolate_name(path)
                .ok_or_else(|| SummaryError::EmptyIsolateName { path: path.to_path_buf() })?;

            match names.entry(name) {
                Entry::Vacant(entry) => {
                    entry.insert(path.to_path_buf());
                },
                Entry::Occupied(entry) => {
                    // the same file listed twice is harmless, two files collapsing to one name is not
                    if entry.get() != path {
                        return Err(SummaryError::AmbiguousIsolateName {
                            name: entry.key().clone(),
                            first: entry.get().clone(),
                            second: path.to_path_buf()
                        });
                    }
                }
            };
        }

        Ok(Self {
            names
        })
    }

    /// Builds the set directly from identifiers, with no source paths
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        Self {
            names: names.into_iter()
                .map(|n| (n.into(), PathBuf::default()))
                .collect()
        }
    }

    /// Iterates over the identifiers in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(|n| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolate_name() {
        assert_eq!(isolate_name(Path::new("data/genomes/iso1.fasta")).as_deref(), Some("iso1"));
        assert_eq!(isolate_name(Path::new("iso2.fna")).as_deref(), Some("iso2"));
        assert_eq!(isolate_name(Path::new("/abs/path/iso3")).as_deref(), Some("iso3"));
        // only one extension is removed
        assert_eq!(isolate_name(Path::new("reads/iso4.contigs.fasta")).as_deref(), Some("iso4.contigs"));
        assert_eq!(isolate_name(Path::new("")), None);
        assert_eq!(isolate_name(Path::new("/")), None);
    }

    #[test]
    fn test_isolate_name_edge_paths() {
        // a trailing separator leaves no file name
        assert_eq!(isolate_name(Path::new("g/iso1.fasta/")), None);
        assert_eq!(isolate_name(Path::new("g/..")).as_deref(), Some(".."));
        assert_eq!(isolate_name(Path::new("g/.hidden")).as_deref(), Some(".hidden"));
        assert_eq!(isolate_name(Path::new("g/.hidden.fasta")).as_deref(), Some(".hidden"));
        assert_eq!(isolate_name(Path::new("g/iso5.")).as_deref(), Some("iso5"));
    }

    #[test]
    fn test_from_paths() {
        let paths = ["b/iso2.fasta", "a/iso1.fasta", "iso3.fna"];
        let isolates = IsolateSet::from_paths(&paths).unwrap();
        assert_eq!(isolates.len(), 3);
        assert_eq!(isolates.iter().collect::<Vec<_>>(), vec!["iso1", "iso2", "iso3"]);
    }

    #[test]
    fn test_repeated_path() {
        let paths = ["a/iso1.fasta", "a/iso1.fasta"];
        let isolates = IsolateSet::from_paths(&paths).unwrap();
        assert_eq!(isolates.len(), 1);
    }

    #[test]
    fn test_ambiguous_name() {
        let paths = ["a/iso1.fasta", "b/iso1.fna"];
        let result = IsolateSet::from_paths(&paths);
        assert_eq!(result, Err(SummaryError::AmbiguousIsolateName {
            name: "iso1".to_string(),
            first: PathBuf::from("a/iso1.fasta"),
            second: PathBuf::from("b/iso1.fna")
        }));
    }

    #[test]
    fn test_empty_name() {
        let result = IsolateSet::from_paths(&["/"]);
        assert_eq!(result, Err(SummaryError::EmptyIsolateName { path: PathBuf::from("/") }));
    }

    #[test]
    fn test_from_names() {
        let isolates = IsolateSet::from_names(["iso3", "iso1"]);
        assert_eq!(isolates.iter().collect::<Vec<_>>(), vec!["iso1", "iso3"]);
        assert!(IsolateSet::default().is_empty());
    }
}
