// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Tracing subscriber setup

use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Install a global fmt subscriber filtered by `RUST_LOG` plus `directive`
/// (for example `"sessionkit=info"`).
///
/// Fails if the directive does not parse or a global subscriber is already set.
pub fn init_tracing(directive: &str) -> Result<()> {
    let directive = directive
        .parse::<Directive>()
        .map_err(|e| Error::Config(format!("Invalid log directive '{}': {}", directive, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .try_init()
        .map_err(|e| Error::Config(format!("Logging already initialized: {}", e)))
}
