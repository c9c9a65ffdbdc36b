use crate::commands::Out;
use crate::{Config, Result};
use anyhow::{ensure, Context};
use std::path::{Path, PathBuf};

/// Writes a configuration file holding the default settings to `path`, or to the default location
/// when `path` is `None`.
///
/// # Errors
/// - Returns an error if the file exists and `force` is false.
/// - Returns an error if no path is given and the platform has no configuration directory.
/// - Returns an error if any file operations fail.
pub fn init(path: Option<&Path>, force: bool) -> Result<Out<PathBuf>> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()
            .context("Unable to find a configuration directory, please pass --path")?,
    };
    ensure!(
        force || !path.exists(),
        "The file {} already exists, pass --force to replace it",
        path.display()
    );

    Config::default()
        .save(&path)
        .context("Unable to create the configuration file")?;
    Ok(Out::new(
        format!("Wrote the default configuration to {}", path.display()),
        path,
    ))
}
