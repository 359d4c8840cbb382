use anyhow::{Context, Result};
use log::LevelFilter;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Ensures that the directory for the given file path exists
///
/// # Arguments
/// * `file_path` - The path to the file including the filename
pub fn ensure_directory_exists(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Installs the process logger at `level` with a stable line format.
///
/// `RUST_LOG` still refines individual targets on top of the level.
pub fn init_logger(level: LevelFilter) -> Result<()> {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
        .context("Failed to initialize logger")
}
