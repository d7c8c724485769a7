//! File-serving collaborator.
//!
//! # Responsibilities
//! - Stat the resolved path and pick the response kind
//! - Stream regular files (ranges, conditional requests, MIME via `ServeFile`)
//! - Serve `index.html` for directories, or an HTML listing when enabled
//!
//! # Design Decisions
//! - Stat failure is 404, a node that is neither file nor directory is 400
//! - Listing is off by default; without it a bare directory is 404

use std::io;
use std::path::Path;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tower::ServiceExt;
use tower_http::services::ServeFile;

/// Characters escaped in the path part of listing links.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped in a single file name.
const SEGMENT: &AsciiSet = &PATH.add(b'/').add(b'%');

/// What a resolved path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeTarget {
    File,
    Directory,
    /// Exists but is neither a regular file nor a directory.
    Special,
    NotFound,
}

impl ServeTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServeTarget::File => "file",
            ServeTarget::Directory => "directory",
            ServeTarget::Special => "special",
            ServeTarget::NotFound => "not_found",
        }
    }
}

/// Stat `path`, following symlinks.
pub async fn classify(path: &Path) -> ServeTarget {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => ServeTarget::File,
        Ok(meta) if meta.is_dir() => ServeTarget::Directory,
        Ok(_) => ServeTarget::Special,
        Err(_) => ServeTarget::NotFound,
    }
}

/// Answer `request` with whatever lives at the resolved `path`.
pub async fn serve_path(
    path: &Path,
    req_path: &str,
    directory_listing: bool,
    request: Request<Body>,
) -> Response {
    match classify(path).await {
        ServeTarget::File => serve_file(path, request).await,
        ServeTarget::Directory => serve_dir(path, req_path, directory_listing, request).await,
        ServeTarget::Special => StatusCode::BAD_REQUEST.into_response(),
        ServeTarget::NotFound => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn serve_file(path: &Path, request: Request<Body>) -> Response {
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

async fn serve_dir(
    dir: &Path,
    req_path: &str,
    directory_listing: bool,
    request: Request<Body>,
) -> Response {
    let index = dir.join("index.html");
    if classify(&index).await == ServeTarget::File {
        return serve_file(&index, request).await;
    }
    if !directory_listing {
        return StatusCode::NOT_FOUND.into_response();
    }

    match render_listing(dir, req_path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "Failed to list directory");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Render a sorted HTML listing of `dir`, linked relative to `req_path`.
pub async fn render_listing(dir: &Path, req_path: &str) -> io::Result<String> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
        names.push((entry.file_name().to_string_lossy().into_owned(), is_dir));
    }
    names.sort();

    let base = if req_path.ends_with('/') {
        req_path.to_string()
    } else {
        format!("{req_path}/")
    };
    let base_href = utf8_percent_encode(&base, PATH).to_string();
    let title = escape_html(&base);

    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Index of {title}</title></head>\n<body>\n<h1>Index of {title}</h1>\n<ul>\n"
    );
    if base != "/" {
        html.push_str("<li><a href=\"../\">../</a></li>\n");
    }
    for (name, is_dir) in &names {
        let slash = if *is_dir { "/" } else { "" };
        html.push_str(&format!(
            "<li><a href=\"{base_href}{}{slash}\">{}{slash}</a></li>\n",
            utf8_percent_encode(name, SEGMENT),
            escape_html(name),
        ));
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    Ok(html)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
