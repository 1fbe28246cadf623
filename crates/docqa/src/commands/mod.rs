//! Command implementations.

use std::io::Read;

use anyhow::{Context, bail};
use camino::Utf8Path;

pub mod analyze;
pub mod info;
#[cfg(feature = "mcp")]
pub mod serve;

/// File extensions `analyze` accepts.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// Path that means "read standard input".
pub const STDIN_PATH: &str = "-";

/// Read a document from a file (or stdin for `-`) and validate its size
/// against the configured limit.
pub fn read_input(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    if path.as_str() == STDIN_PATH {
        let mut content = String::new();
        std::io::stdin()
            .lock()
            .read_to_string(&mut content)
            .context("failed to read standard input")?;
        docqa_core::validate_input_size(&content, max_bytes)
            .context("standard input rejected")?;
        return Ok(content);
    }
    check_extension(path)?;
    read_input_file(path, max_bytes)
}

/// Reject files whose extension is not a supported document type.
pub fn check_extension(path: &Utf8Path) -> anyhow::Result<()> {
    let ext = path.extension().map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext) => Ok(()),
        _ => bail!(
            "unsupported file type: {path} (expected one of: {})",
            SUPPORTED_EXTENSIONS
                .iter()
                .map(|e| format!(".{e}"))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > max {
            bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}
