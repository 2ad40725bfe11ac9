//! Multiline output parsing
//!
//! nmcli's `--mode multiline` output is one flat stream of `KEY: VALUE`
//! lines with no explicit record separator. The tool emits the same key
//! set, in the same order, once per item, so the re-appearance of a key
//! already seen in the current record is the boundary signal. If an item
//! ever omits the key that would start the next record, adjacent records
//! merge; that is an accepted limit of the format.

use indexmap::IndexMap;
use serde::Serialize;

/// One record reconstructed from a block of `KEY: VALUE` lines.
/// Field order follows emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field by exact key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Overlay another record's fields onto this one, keeping the
    /// original position of keys present in both. Used by view refresh.
    pub fn merge(&mut self, other: &Record) {
        for (key, value) in &other.fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Parse multiline output into an ordered sequence of records.
///
/// Lines that are blank after trimming, or that carry no colon, are
/// skipped. Key and value are trimmed. A key repeating within the
/// current record starts the next one.
pub fn parse_multiline<S: AsRef<str>>(lines: &[S]) -> Vec<Record> {
    let mut records: Vec<Record> = Vec::new();
    let mut i = 0;

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if records.get(i).is_some_and(|r| r.has(key)) {
            i += 1;
        }
        if records.len() <= i {
            records.push(Record::new());
        }
        records[i].insert(key, value);
    }

    records
}
