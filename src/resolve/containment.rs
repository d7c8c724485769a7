//! Root containment check.
//!
//! A purely textual prefix test on already-normalized paths. Case is folded
//! when the host filesystem is case-insensitive.

use std::borrow::Cow;
use std::path::{is_separator, Path};

#[derive(Debug, Clone)]
pub struct Containment {
    root: String,
    case_insensitive: bool,
}

impl Containment {
    /// Containment for `root`, folding case on Windows hosts.
    pub fn new(root: &Path) -> Self {
        Self::with_case_folding(root, cfg!(windows))
    }

    pub fn with_case_folding(root: &Path, case_insensitive: bool) -> Self {
        let root = root.to_string_lossy();
        let root = if case_insensitive {
            root.to_lowercase()
        } else {
            root.into_owned()
        };
        Self {
            root,
            case_insensitive,
        }
    }

    /// True when `path` is the root or lies below it.
    ///
    /// The prefix has to end on a separator: root `/srv` does not contain `/srv-old`.
    /// Stricter than a bare string-prefix test (`indexOf(root) === 0`).
    pub fn contains(&self, path: &Path) -> bool {
        let candidate = path.to_string_lossy();
        let candidate = if self.case_insensitive {
            Cow::Owned(candidate.to_lowercase())
        } else {
            candidate
        };

        match candidate.strip_prefix(self.root.as_str()) {
            Some(rest) => {
                rest.is_empty() || self.root.ends_with(is_separator) || rest.starts_with(is_separator)
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_root_and_children() {
        let check = Containment::with_case_folding(Path::new("/srv"), false);
        assert!(check.contains(Path::new("/srv")));
        assert!(check.contains(Path::new("/srv/a/b.txt")));
        assert!(!check.contains(Path::new("/etc/passwd")));
        assert!(!check.contains(Path::new("/")));
    }

    #[test]
    fn test_prefix_must_end_on_separator() {
        let check = Containment::with_case_folding(Path::new("/srv"), false);
        assert!(!check.contains(Path::new("/srv-old/secret")));
        assert!(!check.contains(Path::new("/srvx")));
    }

    #[test]
    fn test_filesystem_root() {
        let check = Containment::with_case_folding(Path::new("/"), false);
        assert!(check.contains(Path::new("/anything/at/all")));
    }

    #[test]
    fn test_case_folding_depends_only_on_flag() {
        let sensitive = Containment::with_case_folding(Path::new("/Srv/Site"), false);
        let insensitive = Containment::with_case_folding(Path::new("/Srv/Site"), true);
        let path = Path::new("/srv/site/index.html");

        assert!(!sensitive.contains(path));
        assert!(insensitive.contains(path));
        assert!(sensitive.contains(Path::new("/Srv/Site/index.html")));
        assert!(insensitive.contains(Path::new("/SRV/SITE/index.html")));
    }
}
