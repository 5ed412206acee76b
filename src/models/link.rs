//! Link registry entry model.

use serde::{Deserialize, Serialize};

/// Title and canonical link for one document, as listed in the registry CSV.
///
/// Either field may be empty; an empty field means "no override".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRegistryEntry {
    pub title: String,
    pub web_link: String,
}

impl LinkRegistryEntry {
    /// Create an entry, trimming both fields
    pub fn new(title: impl AsRef<str>, web_link: impl AsRef<str>) -> Self {
        Self {
            title: title.as_ref().trim().to_string(),
            web_link: web_link.as_ref().trim().to_string(),
        }
    }

    /// Registry title, if non-empty
    pub fn title(&self) -> Option<&str> {
        Some(self.title.as_str()).filter(|t| !t.is_empty())
    }

    /// Registry web link, if non-empty
    pub fn web_link(&self) -> Option<&str> {
        Some(self.web_link.as_str()).filter(|l| !l.is_empty())
    }
}
