//! JSON reporter
//!
//! Outputs reports and batch summaries as pretty-printed JSON. A
//! not-computable accuracy is `null` in `accuracy` and carries its reason in
//! `accuracy_detail`.

use anyhow::Result;
use serde::Serialize;

/// Render as JSON
pub fn render<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
