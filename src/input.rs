//! Collect the adventure text and supplementary lore documents
//!
//! Only plain-text and Markdown files are accepted. Lore files are keyed by
//! file name; adding a second file with the same name is ignored.

use std::path::{Path, PathBuf};

use crate::core::error::{CodexError, Result};

/// Extensions accepted for adventure and lore files
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// A named supplementary document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoreText {
    pub name: String,
    pub content: String,
}

impl LoreText {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Everything the pipeline needs as input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdventureInput {
    pub primary: String,
    pub lore: Vec<LoreText>,
    /// Files that were not loaded because of their extension
    pub skipped: Vec<PathBuf>,
}

/// True for `.txt` and `.md` files, ignoring case
pub fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl AdventureInput {
    /// Start from the adventure text; blank text is rejected
    pub fn new(primary: impl Into<String>) -> Result<Self> {
        let primary = primary.into();
        if primary.trim().is_empty() {
            return Err(CodexError::Input("adventure text is empty".into()));
        }
        Ok(Self {
            primary,
            lore: Vec::new(),
            skipped: Vec::new(),
        })
    }

    /// Add a lore document; returns false if one with that name exists
    pub fn add_lore(&mut self, lore: LoreText) -> bool {
        if self.lore.iter().any(|existing| existing.name == lore.name) {
            return false;
        }
        self.lore.push(lore);
        true
    }

    /// Remove a lore document by name
    pub fn remove_lore(&mut self, name: &str) -> bool {
        let before = self.lore.len();
        self.lore.retain(|l| l.name != name);
        self.lore.len() != before
    }

    /// Load the adventure file and lore files from disk
    ///
    /// The adventure file must be `.txt` or `.md`. Lore files with other
    /// extensions are skipped and listed in `skipped`.
    pub fn load(primary: &Path, lore: &[PathBuf]) -> Result<Self> {
        if !is_supported_file(primary) {
            return Err(CodexError::Input(format!(
                "the adventure file must be a .txt or .md file: {}",
                primary.display()
            )));
        }
        let text = std::fs::read_to_string(primary)?;
        let mut input = Self::new(text)?;

        for path in lore {
            if !is_supported_file(path) {
                tracing::warn!(
                    path = %path.display(),
                    "skipping lore file with unsupported extension"
                );
                input.skipped.push(path.clone());
                continue;
            }
            let content = std::fs::read_to_string(path)?;
            let name = file_name(path);
            if !input.add_lore(LoreText::new(name.clone(), content)) {
                tracing::debug!(%name, "duplicate lore file name ignored");
            }
        }

        tracing::info!(
            primary_chars = input.primary.len(),
            lore_files = input.lore.len(),
            "input collected"
        );
        Ok(input)
    }
}
