//! Serve-path templates.
//!
//! A template string may reference parameters with `<% name %>`. Unknown names
//! expand to the empty string. There is no escaping and no nesting.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};

use crate::resolve::context::ParameterContext;
use crate::resolve::path::resolve_under;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<%\s*(.+?)\s*%>").expect("placeholder pattern is valid")
});

/// Caller-supplied path generator.
pub type Generator = Arc<dyn Fn(&ParameterContext) -> String + Send + Sync>;

/// One candidate serve path of an alias rule.
#[derive(Clone)]
pub enum ServeTemplate {
    /// Placeholder template, resolved relative to the server root.
    Template(String),
    /// Function of the context, resolved relative to the server root.
    Generator(Generator),
    /// The root-resolved request path itself.
    Identity,
}

impl ServeTemplate {
    pub fn template(template: impl Into<String>) -> Self {
        ServeTemplate::Template(template.into())
    }

    pub fn generator<F>(f: F) -> Self
    where
        F: Fn(&ParameterContext) -> String + Send + Sync + 'static,
    {
        ServeTemplate::Generator(Arc::new(f))
    }

    /// Compute the candidate absolute path for a request.
    ///
    /// Expanded values are filesystem paths, not URLs: an absolute result
    /// replaces `root`, and `..` is collapsed without clamping at the root.
    pub fn candidate(&self, ctx: &ParameterContext, root: &Path) -> PathBuf {
        match self {
            ServeTemplate::Template(template) => resolve_under(root, &expand(template, ctx)),
            ServeTemplate::Generator(f) => resolve_under(root, &f(ctx)),
            ServeTemplate::Identity => ctx.abs_path().to_path_buf(),
        }
    }
}

impl fmt::Debug for ServeTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServeTemplate::Template(template) => f.debug_tuple("Template").field(template).finish(),
            ServeTemplate::Generator(_) => f.write_str("Generator(<fn>)"),
            ServeTemplate::Identity => f.write_str("Identity"),
        }
    }
}

/// Substitute every `<% name %>` in `template` from `ctx`.
pub fn expand<'a>(template: &'a str, ctx: &ParameterContext) -> Cow<'a, str> {
    PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
        ctx.get(caps[1].trim()).unwrap_or_default().to_string()
    })
}
