#![cfg_attr(docsrs, doc(cfg(feature = "serde")))]

//! Provides [`serde::Serialize`] support for [`Document`]
//!
//! A document serializes as a map from section name to a map from key to the
//! list of values for that key. Entries before the first section header go
//! under the `""` section.

use crate::Document;
use serde::ser::{Serialize, SerializeMap, Serializer};

#[cfg(test)]
#[path = "./impl_serde_tests.rs"]
mod tests;

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // `[]` headers cannot be addressed apart from the global scope.
        let sections: Vec<String> = self
            .sections()
            .into_iter()
            .filter(|section| !section.is_empty())
            .collect();
        let global = self.scope("").next().is_some();

        let mut map = serializer.serialize_map(Some(sections.len() + usize::from(global)))?;
        if global {
            map.serialize_entry("", &Section { doc: self, name: "" })?;
        }
        for name in &sections {
            map.serialize_entry(name, &Section { doc: self, name })?;
        }
        map.end()
    }
}

struct Section<'a> {
    doc: &'a Document,
    name: &'a str,
}

impl Serialize for Section<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let keys = self.doc.keys(self.name);
        let mut map = serializer.serialize_map(Some(keys.len()))?;
        for key in &keys {
            map.serialize_entry(key, &self.doc.read_strings(self.name, key))?;
        }
        map.end()
    }
}
