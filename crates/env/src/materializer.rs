use std::io::Write;
use std::path::PathBuf;
use vgm_core::{Environment, Error, Result, ResultExt};

use crate::scanner::SecretDeclaration;

/// Write a resolved secret into the environment
///
/// Inline declarations set the variable to the secret itself. File-backed
/// declarations write the secret as the entire content of their temp file,
/// close it, keep it on disk for the child, and set the variable to the
/// file's absolute path.
pub fn materialize(env: &mut Environment, declaration: SecretDeclaration, secret: &str) -> Result<()> {
    let variable = declaration.variable().into_owned();
    let (name, reference, file) = declaration.into_parts();

    match file {
        None => {
            env.set_plain(name, secret);
            tracing::info!(
                variable = %variable,
                path = %reference.path(),
                key = %reference.key(),
                "replacing variable with vault secret"
            );
        }
        Some(mut file) => {
            let temp_path = file.path().to_path_buf();
            file.write_all(secret.as_bytes())
                .and_then(|()| file.flush())
                .map_err(|e| Error::file_system(&temp_path, "write", e))
                .for_variable(&variable)?;

            // Dropping the returned handle closes the file; the path survives.
            let (_, kept) = file
                .keep()
                .map_err(|e| Error::file_system(&temp_path, "keep", e.error))
                .for_variable(&variable)?;
            let path = absolute(kept).for_variable(&variable)?;

            env.set_plain(name, path.into_os_string());
            tracing::info!(
                variable = %variable,
                path = %reference.path(),
                key = %reference.key(),
                "replacing variable with path to temp file containing vault secret"
            );
        }
    }

    Ok(())
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .map_err(|e| Error::file_system(&path, "resolve", e))
}
