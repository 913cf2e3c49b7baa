//! Skip rules for OS metadata and hidden entries.
//!
//! Applied to every segment of a candidate path, root to leaf. Any matching
//! segment disqualifies the whole entry, so a filtered directory takes its
//! entire subtree with it.

/// File names that never belong in an upload archive.
pub const IGNORED_NAMES: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

/// Name prefixes marking archive-tool metadata directories.
pub const IGNORED_PREFIXES: &[&str] = &["__MACOSX"];

/// Pure predicate deciding whether a candidate path is skipped during
/// collection. No side effects, no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathFilter;

impl PathFilter {
    /// True when `segment` alone disqualifies a path: an exact ignored
    /// name, a dot-prefixed (hidden) name, or an ignored prefix.
    pub fn skips_segment(&self, segment: &str) -> bool {
        IGNORED_NAMES.contains(&segment)
            || segment.starts_with('.')
            || IGNORED_PREFIXES.iter().any(|p| segment.starts_with(p))
    }

    /// True when any segment of a slash-delimited path matches a skip rule.
    pub fn skips_path(&self, path: &str) -> bool {
        path.split('/').any(|segment| self.skips_segment(segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_exact_ignored_names() {
        let filter = PathFilter;
        assert!(filter.skips_path("export/.DS_Store"));
        assert!(filter.skips_path("export/Thumbs.db"));
        assert!(filter.skips_path("export/desktop.ini"));
    }

    #[test]
    fn skips_hidden_segments_anywhere_in_the_path() {
        let filter = PathFilter;
        assert!(filter.skips_path(".git"));
        assert!(filter.skips_path("export/.cache/index.json"));
        assert!(filter.skips_path("export/labs/.hidden.pdf"));
    }

    #[test]
    fn skips_ignored_prefixes() {
        let filter = PathFilter;
        assert!(filter.skips_path("__MACOSX/export/report.xml"));
        assert!(filter.skips_path("export/__MACOSX_extra/x.bin"));
    }

    #[test]
    fn keeps_ordinary_paths() {
        let filter = PathFilter;
        assert!(!filter.skips_path("export/report.xml"));
        assert!(!filter.skips_path("export/labs/2024/panel.json"));
        // A dot inside a name is not a hidden marker.
        assert!(!filter.skips_path("export/notes.v2/summary.txt"));
    }

    #[test]
    fn case_sensitive_like_the_underlying_filesystem_names() {
        let filter = PathFilter;
        assert!(!filter.skips_path("export/thumbs.db"));
        assert!(!filter.skips_path("export/ds_store"));
    }
}
