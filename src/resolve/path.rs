//! Lexical path helpers.
//!
//! Nothing here touches the filesystem: `..` is collapsed textually and
//! symlinks are not followed.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Error decoding a request path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("malformed percent-encoding at byte {0}")]
    MalformedEscape(usize),
    #[error("request path is not valid UTF-8")]
    InvalidUtf8,
    #[error("request path contains a NUL byte")]
    NulByte,
}

/// Characters `%XX` escapes are left alone for, so that an encoded `/` can
/// never introduce a new path segment.
const RESERVED: &[u8] = b";/?:@&=+$,#";

/// Decode percent-escapes in a raw URI path, once.
///
/// Escapes of reserved characters stay encoded. A malformed escape, invalid
/// UTF-8 or a NUL byte is rejected.
pub fn decode_request_path(raw: &str) -> Result<String, PathError> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let decoded = bytes
            .get(i + 1..i + 3)
            .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
            .and_then(|hex| std::str::from_utf8(hex).ok())
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            .ok_or(PathError::MalformedEscape(i))?;
        if RESERVED.contains(&decoded) {
            out.extend_from_slice(&bytes[i..i + 3]);
        } else {
            out.push(decoded);
        }
        i += 3;
    }

    if out.contains(&0) {
        return Err(PathError::NulByte);
    }
    String::from_utf8(out).map_err(|_| PathError::InvalidUtf8)
}

/// Collapse `.` and `..` components. `..` at the filesystem root is dropped.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Resolve a request path (always rooted, `/`-separated) against `root`.
///
/// `..` segments may climb above `root`; the containment check rejects them.
pub fn resolve_request(root: &Path, req_path: &str) -> PathBuf {
    normalize(&root.join(req_path.trim_start_matches('/')))
}

/// Resolve a filesystem path produced by a template against `root`.
/// An absolute `value` replaces `root` entirely.
pub fn resolve_under(root: &Path, value: &str) -> PathBuf {
    normalize(&root.join(value))
}

/// Directory part of a `/`-separated path, `dirname(1)` style.
pub fn dir_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.starts_with('/') { "/" } else { "." };
    }
    match trimmed.rfind('/') {
        Some(i) => {
            let dir = trimmed[..i].trim_end_matches('/');
            if dir.is_empty() {
                "/"
            } else {
                dir
            }
        }
        None => ".",
    }
}

/// Last segment of a `/`-separated path, ignoring trailing slashes.
pub fn file_name(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
}

/// Split a file name into `(basename, suffix)` on its final `.`.
///
/// Names starting with `.` or without another `.` have an empty suffix.
pub fn split_file_name(name: &str) -> (&str, &str) {
    if name.starts_with('.') {
        return (name, "");
    }
    match name.rfind('.') {
        Some(dot) => (&name[..dot], &name[dot + 1..]),
        None => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_and_escaped() {
        assert_eq!(decode_request_path("/a/b.txt").unwrap(), "/a/b.txt");
        assert_eq!(decode_request_path("/hello%20world").unwrap(), "/hello world");
        assert_eq!(decode_request_path("/caf%C3%A9").unwrap(), "/café");
    }

    #[test]
    fn test_decode_keeps_reserved_escapes() {
        assert_eq!(decode_request_path("/..%2Fetc%2fpasswd").unwrap(), "/..%2Fetc%2fpasswd");
        assert_eq!(decode_request_path("/a%3Fb").unwrap(), "/a%3Fb");
        assert_eq!(decode_request_path("/%2e%2e/x").unwrap(), "/../x");
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert_eq!(decode_request_path("/%zz"), Err(PathError::MalformedEscape(1)));
        assert_eq!(decode_request_path("/abc%4"), Err(PathError::MalformedEscape(4)));
        assert_eq!(decode_request_path("/%FF"), Err(PathError::InvalidUtf8));
        assert_eq!(decode_request_path("/a%00b"), Err(PathError::NulByte));
    }

    #[test]
    fn test_resolve_request() {
        let root = Path::new("/srv");
        assert_eq!(resolve_request(root, "/"), Path::new("/srv"));
        assert_eq!(resolve_request(root, "/a/./b/"), Path::new("/srv/a/b"));
        assert_eq!(resolve_request(root, "/a/../b"), Path::new("/srv/b"));
        assert_eq!(resolve_request(root, "/../etc/passwd"), Path::new("/etc/passwd"));
        assert_eq!(resolve_request(root, "/../../../../x"), Path::new("/x"));
        assert_eq!(resolve_request(root, "//double//slash"), Path::new("/srv/double/slash"));
    }

    #[test]
    fn test_resolve_under() {
        let root = Path::new("/srv");
        assert_eq!(resolve_under(root, "a/b"), Path::new("/srv/a/b"));
        assert_eq!(resolve_under(root, "/etc/passwd"), Path::new("/etc/passwd"));
        assert_eq!(resolve_under(root, "/srv/../etc"), Path::new("/etc"));
        assert_eq!(resolve_under(root, ""), Path::new("/srv"));
    }

    #[test]
    fn test_dir_and_file_name() {
        assert_eq!(dir_name("/a/b.txt"), "/a");
        assert_eq!(dir_name("/a"), "/");
        assert_eq!(dir_name("/"), "/");
        assert_eq!(dir_name("/a/b/"), "/a");
        assert_eq!(dir_name("a"), ".");

        assert_eq!(file_name("/a/b.txt"), "b.txt");
        assert_eq!(file_name("/a/b/"), "b");
        assert_eq!(file_name("/"), "");
    }

    #[test]
    fn test_split_file_name() {
        assert_eq!(split_file_name("b.txt"), ("b", "txt"));
        assert_eq!(split_file_name("app.min.js"), ("app.min", "js"));
        assert_eq!(split_file_name("README"), ("README", ""));
        assert_eq!(split_file_name(".bashrc"), (".bashrc", ""));
        assert_eq!(split_file_name(".config.json"), (".config.json", ""));
        assert_eq!(split_file_name("trailing."), ("trailing", ""));
        assert_eq!(split_file_name(""), ("", ""));
    }
}
