//! Environment-related types for domain-specific operations

use indexmap::IndexMap;
use std::ffi::{OsStr, OsString};

use super::secret::SecretReference;

/// One environment value, classified when the environment is snapshotted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvValue {
    /// Ordinary configuration, passed through untouched
    Plain(OsString),
    /// A secret declaration awaiting resolution
    SecretRef(SecretReference),
}

impl EnvValue {
    /// Classify a raw value. Only valid UTF-8 values can carry declarations.
    #[must_use]
    pub fn classify(value: OsString) -> Self {
        match value.to_str().and_then(SecretReference::parse) {
            Some(reference) => EnvValue::SecretRef(reference),
            None => EnvValue::Plain(value),
        }
    }

    /// The value as the child process would see it
    #[must_use]
    pub fn to_os_string(&self) -> OsString {
        match self {
            EnvValue::Plain(value) => value.clone(),
            EnvValue::SecretRef(reference) => reference.to_string().into(),
        }
    }

    #[must_use]
    pub fn as_secret_ref(&self) -> Option<&SecretReference> {
        match self {
            EnvValue::SecretRef(reference) => Some(reference),
            EnvValue::Plain(_) => None,
        }
    }
}

/// Ordered snapshot of a process environment
///
/// Entries keep the order in which they were inserted. The launcher mutates
/// this model and hands it to the child command in one step; the ambient
/// process environment is never written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment(IndexMap<OsString, EnvValue>);

impl Environment {
    /// Snapshot the current process environment
    #[must_use]
    pub fn from_process() -> Self {
        Self::from_vars(std::env::vars_os())
    }

    /// Build an environment from name/value pairs, classifying each value
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self(
            vars.into_iter()
                .map(|(k, v)| (k.into(), EnvValue::classify(v.into())))
                .collect(),
        )
    }

    /// Get a variable by name
    #[must_use]
    pub fn get(&self, name: impl AsRef<OsStr>) -> Option<&EnvValue> {
        self.0.get(name.as_ref())
    }

    /// Get a variable's value as the child would see it
    #[must_use]
    pub fn value_of(&self, name: impl AsRef<OsStr>) -> Option<OsString> {
        self.get(name).map(EnvValue::to_os_string)
    }

    /// Set a variable to a plain value, keeping its position if it exists
    pub fn set_plain(
        &mut self,
        name: impl Into<OsString>,
        value: impl Into<OsString>,
    ) -> Option<EnvValue> {
        self.0.insert(name.into(), EnvValue::Plain(value.into()))
    }

    /// Iterate over the secret declarations in environment order
    pub fn secret_refs(&self) -> impl Iterator<Item = (&OsStr, &SecretReference)> {
        self.0
            .iter()
            .filter_map(|(name, value)| Some((name.as_os_str(), value.as_secret_ref()?)))
    }

    /// Iterate over every variable as the child would see it
    pub fn vars_os(&self) -> impl Iterator<Item = (&OsStr, OsString)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_os_str(), value.to_os_string()))
    }

    /// Get an iterator over the variables
    pub fn iter(&self) -> indexmap::map::Iter<'_, OsString, EnvValue> {
        self.0.iter()
    }
}
