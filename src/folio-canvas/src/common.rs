// Copyright 2026 The Folio Canvas Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::result;

use thiserror::Error;

/// Errors raised at the edges of the engine: decoding input and validating
/// configuration. Layout operations themselves never fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid config: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },
    #[error("malformed input: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
