//! Where definition and test-vector text comes from.

use std::collections::HashMap;

use crate::error::{GatesimError, Result};

/// Supplies the text of a named circuit or test file.
pub trait DefinitionSource {
    /// Return the full text stored under `name` (without the `.txt` extension).
    fn read(&self, name: &str) -> Result<String>;
}

/// In-memory files keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file, builder style.
    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    /// Add or replace a file.
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.files.insert(name.into(), text.into());
    }
}

impl<N: Into<String>, T: Into<String>> FromIterator<(N, T)> for MemorySource {
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (name, text) in iter {
            source.insert(name, text);
        }
        source
    }
}

impl DefinitionSource for MemorySource {
    fn read(&self, name: &str) -> Result<String> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| GatesimError::MissingDefinition {
                circuit: name.to_string(),
            })
    }
}

/// Files named `<name>.txt` inside one directory.
#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: std::path::PathBuf,
}

#[cfg(feature = "cli")]
impl DirectorySource {
    /// Read definitions from `root`.
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the file holding `name`.
    pub fn path_of(&self, name: &str) -> std::path::PathBuf {
        self.root.join(format!("{}.txt", name))
    }
}

#[cfg(feature = "cli")]
impl DefinitionSource for DirectorySource {
    fn read(&self, name: &str) -> Result<String> {
        let path = self.path_of(name);
        std::fs::read_to_string(&path).map_err(|e| GatesimError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })
    }
}
