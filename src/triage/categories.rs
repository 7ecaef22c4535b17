use std::path::Path;

use crate::error::{Result, TriageError};

const SEPARATOR: char = ',';

/// Ordered label-prefix to category table, loaded once per run
#[derive(Debug, Clone, Default)]
pub struct CategoryMapping {
    entries: Vec<(String, String)>,
}

impl CategoryMapping {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TriageError::io(path, e))?;
        Self::parse(&text)
    }

    /// Parse `prefix,category` lines in file order.
    ///
    /// Blank lines are skipped. Fields after the second are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = line.split(SEPARATOR);
            let prefix = fields.next().unwrap_or_default().trim();
            let category = fields.next().map(str::trim).ok_or_else(|| {
                TriageError::InvalidInput(format!(
                    "category mapping line {} has no separator: {:?}",
                    line_no + 1,
                    line
                ))
            })?;

            if prefix.is_empty() || category.is_empty() {
                return Err(TriageError::InvalidInput(format!(
                    "category mapping line {} has an empty field: {:?}",
                    line_no + 1,
                    line
                )));
            }

            entries.push((prefix.to_string(), category.to_string()));
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves label names to categories
pub trait CategoryResolver: Send + Sync {
    fn resolve(&self, label: &str) -> Option<&str>;
}

impl CategoryResolver for CategoryMapping {
    /// First entry whose key is a prefix of `label`, in file order
    fn resolve(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(prefix, _)| label.starts_with(prefix.as_str()))
            .map(|(_, category)| category.as_str())
    }
}
