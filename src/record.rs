use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const TITLE: &str = "title";

/// Flat field-name to text mapping for one listing. Keys keep insertion
/// order, and `title` is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingRecord {
    fields: IndexMap<String, String>,
}

impl ListingRecord {
    pub fn new(title: impl Into<String>) -> Self {
        let mut fields = IndexMap::new();
        fields.insert(TITLE.to_string(), title.into());
        ListingRecord { fields }
    }

    /// Sets `key`, keeping its original position if it was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn title(&self) -> &str {
        self.get(TITLE).unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Keys starting with `prefix`, in insertion order.
    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.keys().filter(move |k| k.starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}
