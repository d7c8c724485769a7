//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the root directory exists
//! - Check that every alias pattern compiles
//! - Validate value ranges (timeouts > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::schema::{MatchConfig, ServerConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("root {0:?} is not a directory")]
    RootNotDirectory(PathBuf),
    #[error("alias[{rule}] match[{matcher}]: invalid pattern: {message}")]
    InvalidPattern {
        rule: usize,
        matcher: usize,
        message: String,
    },
    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),
    #[error("timeout {0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !config.root.is_dir() {
        errors.push(ValidationError::RootNotDirectory(config.root.clone()));
    }

    for (rule, alias) in config.alias.as_slice().iter().enumerate() {
        for (matcher, entry) in alias.matches.as_slice().iter().enumerate() {
            if let MatchConfig::Pattern { regex } = entry {
                if let Err(e) = regex::Regex::new(regex) {
                    errors.push(ValidationError::InvalidPattern {
                        rule,
                        matcher,
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.timeouts.resolve_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("resolve_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
