//! Resolve a single request path offline and print the decision as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use clap::Parser;
use serde_json::{json, Map, Value};

use static_alias::config::load_config;
use static_alias::http::files::classify;
use static_alias::observability::logging;
use static_alias::resolve::{
    decode_request_path, ParameterContext, Resolution, Resolver, TracingLogger,
};

#[derive(Parser)]
#[command(name = "alias-resolve")]
#[command(about = "Show which file a request path resolves to", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Request header, as "name: value". Repeatable.
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Log each resolution step to stderr and include the template parameters.
    #[arg(short, long)]
    verbose: bool,

    /// Request path, e.g. /css/app.css (percent-encoding allowed).
    path: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let mut resolver = Resolver::from_config(&config)?;
    if cli.verbose {
        logging::init_logging("info");
        resolver = resolver.with_logger(Arc::new(TracingLogger));
    }

    let mut headers = HeaderMap::new();
    for raw in &cli.headers {
        let (name, value) = raw
            .split_once(':')
            .ok_or_else(|| format!("header {raw:?} is not \"name: value\""))?;
        headers.append(
            HeaderName::from_bytes(name.trim().as_bytes())?,
            HeaderValue::from_str(value.trim())?,
        );
    }

    let req_path = decode_request_path(&cli.path)?;
    let mut report = match resolver.resolve(&req_path, &headers) {
        Resolution::ServePath(path) => json!({
            "request": req_path,
            "outcome": "serve",
            "path": path.display().to_string(),
            "target": classify(&path).await.as_str(),
        }),
        Resolution::Forbidden => json!({
            "request": req_path,
            "outcome": "forbidden",
        }),
    };

    if cli.verbose {
        let ctx = ParameterContext::build(resolver.root(), &req_path, &headers);
        let params: Map<String, Value> = ctx
            .iter()
            .map(|(key, value)| (key.to_string(), Value::from(value)))
            .collect();
        report["params"] = Value::Object(params);
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
