//! Secret injection pipeline
//!
//! Scan, acquire one token, resolve every declaration in order, then
//! materialize. Everything is resolved before anything is materialized, so a
//! failed lookup leaves no secret on disk.

use std::path::PathBuf;
use vgm_core::{Environment, Result, ResultExt, VaultToken};
use vgm_vault::{SecretStore, TokenProvider};

use crate::materializer::materialize;
use crate::scanner::{scan, SecretDeclaration};

/// Resolves the secret declarations of an environment
pub struct SecretInjector<T, S> {
    tokens: T,
    store: S,
    temp_dir: PathBuf,
}

impl<T: TokenProvider, S: SecretStore> SecretInjector<T, S> {
    /// Create an injector writing file-backed secrets to the system temp dir
    pub fn new(tokens: T, store: S) -> Self {
        Self {
            tokens,
            store,
            temp_dir: std::env::temp_dir(),
        }
    }

    /// Write file-backed secrets to `temp_dir` instead
    #[must_use]
    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    /// Replace every secret declaration in `env` with its resolved value
    ///
    /// Malformed declarations are left untouched. The token is requested on
    /// every run, even one without declarations. Any failure aborts the whole
    /// injection.
    pub fn inject(&self, mut env: Environment) -> Result<Environment> {
        let declarations = scan(&env, &self.temp_dir)?;

        tracing::info!("requesting vault token");
        let token = self.tokens.acquire_token()?;

        let resolved = declarations
            .into_iter()
            .map(|declaration| -> Result<(SecretDeclaration, String)> {
                let secret = self.resolve(&token, &declaration)?;
                Ok((declaration, secret))
            })
            .collect::<Result<Vec<_>>>()?;

        for (declaration, secret) in resolved {
            materialize(&mut env, declaration, &secret)?;
        }

        Ok(env)
    }

    fn resolve(&self, token: &VaultToken, declaration: &SecretDeclaration) -> Result<String> {
        let reference = declaration.reference();
        tracing::info!(
            path = %reference.path(),
            key = %reference.key(),
            "fetching vault secret"
        );

        self.store
            .read_secret(token, reference.path(), reference.key())
            .for_variable(&declaration.variable())
    }
}
