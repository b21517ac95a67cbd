// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// File name used when exporting without an explicit path.
pub const DEFAULT_EXPORT_NAME: &str = "input.txt";

/// Read `path` as the new text.  Invalid UTF-8 is replaced, not rejected.
pub fn import(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "imported text");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write `text` to `path`, creating parent directories as needed.
pub fn export(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), "exported text");
    Ok(())
}
