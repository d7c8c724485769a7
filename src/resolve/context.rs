//! Per-request parameter context.
//!
//! # Responsibilities
//! - Resolve the request path against the root (`absPath`)
//! - Decompose the request path (`reqDir`, `fileName`, `basename`, `suffix`)
//! - Expose request headers to templates and predicates
//!
//! # Design Decisions
//! - Built once per request, read-only afterwards, never shared
//! - Computed fields are written after headers, so a client can't spoof them
//! - A header named `absPath` is skipped outright

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::http::HeaderMap;

use crate::resolve::path::{dir_name, file_name, resolve_request, split_file_name};

pub const ABS_PATH: &str = "absPath";
pub const REQ_PATH: &str = "reqPath";
pub const REQ_DIR: &str = "reqDir";
pub const ABS_DIR: &str = "absDir";
pub const FILE_NAME: &str = "fileName";
pub const BASENAME: &str = "basename";
pub const SUFFIX: &str = "suffix";

/// Named string values describing one request.
#[derive(Debug, Clone)]
pub struct ParameterContext {
    abs_path: PathBuf,
    req_path: String,
    params: HashMap<String, String>,
}

impl ParameterContext {
    /// Build the context for a decoded request path.
    pub fn build(root: &Path, req_path: &str, headers: &HeaderMap) -> Self {
        let abs_path = resolve_request(root, req_path);
        let mut params = HashMap::with_capacity(headers.keys_len() + 7);

        for name in headers.keys() {
            if name.as_str().eq_ignore_ascii_case(ABS_PATH) {
                continue;
            }
            let value = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()))
                .collect::<Vec<_>>()
                .join(", ");
            params.insert(name.as_str().to_string(), value);
        }

        let abs_dir = abs_path.parent().unwrap_or(&abs_path);
        let name = file_name(req_path);
        let (basename, suffix) = split_file_name(name);

        params.insert(ABS_PATH.to_string(), abs_path.to_string_lossy().into_owned());
        params.insert(ABS_DIR.to_string(), abs_dir.to_string_lossy().into_owned());
        params.insert(REQ_PATH.to_string(), req_path.to_string());
        params.insert(REQ_DIR.to_string(), dir_name(req_path).to_string());
        params.insert(FILE_NAME.to_string(), name.to_string());
        params.insert(BASENAME.to_string(), basename.to_string());
        params.insert(SUFFIX.to_string(), suffix.to_string());

        Self {
            abs_path,
            req_path: req_path.to_string(),
            params,
        }
    }

    /// Look up a parameter by name. Header names are lowercase.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The request path as received (after percent-decoding).
    pub fn req_path(&self) -> &str {
        &self.req_path
    }

    /// The request path resolved against the server root.
    pub fn abs_path(&self) -> &Path {
        &self.abs_path
    }

    /// Every parameter, computed fields and headers alike, in no fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_computed_fields() {
        let ctx = ParameterContext::build(Path::new("/srv"), "/a/b.txt", &HeaderMap::new());

        assert_eq!(ctx.abs_path(), Path::new("/srv/a/b.txt"));
        assert_eq!(ctx.get(ABS_PATH), Some("/srv/a/b.txt"));
        assert_eq!(ctx.get(ABS_DIR), Some("/srv/a"));
        assert_eq!(ctx.get(REQ_PATH), Some("/a/b.txt"));
        assert_eq!(ctx.get(REQ_DIR), Some("/a"));
        assert_eq!(ctx.get(FILE_NAME), Some("b.txt"));
        assert_eq!(ctx.get(BASENAME), Some("b"));
        assert_eq!(ctx.get(SUFFIX), Some("txt"));
    }

    #[test]
    fn test_name_without_extension() {
        let ctx = ParameterContext::build(Path::new("/srv"), "/docs/.htaccess", &HeaderMap::new());
        assert_eq!(ctx.get(BASENAME), Some(".htaccess"));
        assert_eq!(ctx.get(SUFFIX), Some(""));
    }

    #[test]
    fn test_headers_are_copied() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("example.com"));
        headers.append("accept", HeaderValue::from_static("text/html"));
        headers.append("accept", HeaderValue::from_static("*/*"));

        let ctx = ParameterContext::build(Path::new("/srv"), "/", &headers);
        assert_eq!(ctx.get("host"), Some("example.com"));
        assert_eq!(ctx.get("accept"), Some("text/html, */*"));
        assert_eq!(ctx.get("Host"), None);
    }

    #[test]
    fn test_abs_path_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("abspath", HeaderValue::from_static("/etc/passwd"));

        let ctx = ParameterContext::build(Path::new("/srv"), "/index.html", &headers);
        assert_eq!(ctx.get(ABS_PATH), Some("/srv/index.html"));
        assert_eq!(ctx.get("abspath"), None);
    }

    #[test]
    fn test_computed_fields_win_over_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("basename", HeaderValue::from_static("spoofed"));
        headers.insert("suffix", HeaderValue::from_static("exe"));

        let ctx = ParameterContext::build(Path::new("/srv"), "/real.txt", &headers);
        assert_eq!(ctx.get(BASENAME), Some("real"));
        assert_eq!(ctx.get(SUFFIX), Some("txt"));
    }

    #[test]
    fn test_iter_lists_computed_fields_and_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("example.com"));

        let ctx = ParameterContext::build(Path::new("/srv"), "/a/b.txt", &headers);
        let mut keys: Vec<&str> = ctx.iter().map(|(key, _)| key).collect();
        keys.sort_unstable();

        assert_eq!(
            keys,
            [ABS_DIR, ABS_PATH, BASENAME, FILE_NAME, "host", REQ_DIR, REQ_PATH, SUFFIX]
        );
    }
}
