use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown {kind} backend '{name}' (available: {known})")]
    Unknown {
        kind: &'static str,
        name: String,
        known: String,
    },
}

type Constructor<C, T> = Box<dyn Fn(&C) -> Box<T>>;

/// Name → constructor table for one family of pluggable backends.
///
/// `C` is the configuration handed to each constructor and `T` the trait object
/// it produces. Registries are filled once at startup; lookups of names that
/// were never registered are configuration errors.
pub struct Registry<C, T: ?Sized> {
    kind: &'static str,
    entries: BTreeMap<String, Constructor<C, T>>,
}

impl<C, T: ?Sized> Registry<C, T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }

    /// Register (or replace) a constructor under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, ctor: F) -> &mut Self
    where
        F: Fn(&C) -> Box<T> + 'static,
    {
        self.entries.insert(name.into(), Box::new(ctor));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn create(&self, name: &str, config: &C) -> Result<Box<T>, RegistryError> {
        match self.entries.get(name) {
            Some(ctor) => Ok(ctor(config)),
            None => Err(RegistryError::Unknown {
                kind: self.kind,
                name: name.to_string(),
                known: self.names().join(", "),
            }),
        }
    }
}
