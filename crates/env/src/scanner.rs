use std::borrow::Cow;
use std::ffi::OsString;
use std::path::Path;
use tempfile::NamedTempFile;
use vgm_core::constants::TEMP_FILE_PREFIX;
use vgm_core::{Environment, Error, Materialization, Result, ResultExt, SecretReference};

/// One secret declared by an environment variable
///
/// File-backed declarations own a temp file created when the environment was
/// scanned. The file is removed again if the declaration is dropped before it
/// is materialized.
#[derive(Debug)]
pub struct SecretDeclaration {
    name: OsString,
    reference: SecretReference,
    file: Option<NamedTempFile>,
}

impl SecretDeclaration {
    /// The declaring variable's name for messages
    #[must_use]
    pub fn variable(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }

    #[must_use]
    pub fn reference(&self) -> &SecretReference {
        &self.reference
    }

    /// Path of the temp file for a file-backed declaration
    #[must_use]
    pub fn temp_path(&self) -> Option<&Path> {
        self.file.as_ref().map(NamedTempFile::path)
    }

    pub(crate) fn into_parts(self) -> (OsString, SecretReference, Option<NamedTempFile>) {
        (self.name, self.reference, self.file)
    }
}

/// Extract secret declarations in environment order
///
/// Temp files for file-backed declarations are created in `temp_dir` before
/// anything is resolved, so a file system problem aborts the run before any
/// network call.
pub fn scan(env: &Environment, temp_dir: &Path) -> Result<Vec<SecretDeclaration>> {
    let mut declarations = Vec::new();

    for (name, reference) in env.secret_refs() {
        if name.is_empty() {
            continue;
        }

        let file = match reference.materialization() {
            Materialization::Inline => None,
            Materialization::FileBacked => Some(
                tempfile::Builder::new()
                    .prefix(TEMP_FILE_PREFIX)
                    .tempfile_in(temp_dir)
                    .map_err(|e| Error::file_system(temp_dir, "create temp file", e))
                    .for_variable(&name.to_string_lossy())?,
            ),
        };

        tracing::debug!(
            variable = %name.to_string_lossy(),
            path = %reference.path(),
            key = %reference.key(),
            mode = %reference.materialization(),
            "found secret declaration"
        );

        declarations.push(SecretDeclaration {
            name: name.to_os_string(),
            reference: reference.clone(),
            file,
        });
    }

    Ok(declarations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fields(declarations: &[SecretDeclaration]) -> Vec<(String, String, String, Materialization)> {
        declarations
            .iter()
            .map(|d| {
                (
                    d.variable().into_owned(),
                    d.reference().path().to_string(),
                    d.reference().key().to_string(),
                    d.reference().materialization(),
                )
            })
            .collect()
    }

    #[test]
    fn test_scans_declarations_in_order() {
        let temp = TempDir::new().unwrap();
        let env = Environment::from_vars([
            ("FOO", "vgm:secret/app:password"),
            ("HOME", "/home/app"),
            ("BAR", "vgm_file:secret/app:cert"),
        ]);

        let declarations = scan(&env, temp.path()).unwrap();
        assert_eq!(
            fields(&declarations),
            vec![
                (
                    "FOO".to_string(),
                    "secret/app".to_string(),
                    "password".to_string(),
                    Materialization::Inline
                ),
                (
                    "BAR".to_string(),
                    "secret/app".to_string(),
                    "cert".to_string(),
                    Materialization::FileBacked
                ),
            ]
        );
        assert!(declarations[0].temp_path().is_none());
    }

    #[test]
    fn test_file_declarations_get_fresh_temp_files() {
        let temp = TempDir::new().unwrap();
        let env = Environment::from_vars([
            ("A", "vgm_file:secret/app:cert"),
            ("B", "vgm_file:secret/app:cert"),
        ]);

        let declarations = scan(&env, temp.path()).unwrap();
        let a = declarations[0].temp_path().unwrap();
        let b = declarations[1].temp_path().unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with(temp.path()));
        assert!(a
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(TEMP_FILE_PREFIX));
        assert!(a.exists() && b.exists());
    }

    #[test]
    fn test_dropped_declarations_remove_temp_files() {
        let temp = TempDir::new().unwrap();
        let env = Environment::from_vars([("A", "vgm_file:secret/app:cert")]);

        let declarations = scan(&env, temp.path()).unwrap();
        let path = declarations[0].temp_path().unwrap().to_path_buf();
        drop(declarations);
        assert!(!path.exists());
    }

    #[test]
    fn test_malformed_declarations_are_skipped() {
        let temp = TempDir::new().unwrap();
        let env = Environment::from_vars([
            ("A", "vgm:onlyonepart"),
            ("B", "vgm::key"),
            ("C", "vgm_file:path:"),
            ("D", "plain"),
        ]);

        let declarations = scan(&env, temp.path()).unwrap();
        assert!(declarations.is_empty());
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_rescanning_yields_identical_fields() {
        let temp = TempDir::new().unwrap();
        let env = Environment::from_vars([
            ("FOO", "vgm:secret/app:password"),
            ("BAR", "vgm_file:secret/app:cert"),
        ]);

        let first = scan(&env, temp.path()).unwrap();
        let second = scan(&env, temp.path()).unwrap();
        assert_eq!(fields(&first), fields(&second));
        assert_ne!(first[1].temp_path(), second[1].temp_path());
    }

    #[test]
    fn test_temp_file_failure_names_variable() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("does-not-exist");
        let env = Environment::from_vars([("BAR", "vgm_file:secret/app:cert")]);

        let err = scan(&env, &missing).unwrap_err();
        assert_eq!(err.variable(), Some("BAR"));
        assert!(err.to_string().contains("create temp file"), "{err}");
    }
}
