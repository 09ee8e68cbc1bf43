use indexmap::IndexMap;
use serde::Serialize;

/// One completed network fetch, correlated from its trace events
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRecord {
    pub url: String,
    pub mime_type: String,
    /// Bytes transferred over the wire
    pub encoded_bytes: u64,
    /// Bytes after content decoding
    pub decoded_bytes: u64,
    pub failed: bool,
}

impl ResourceRecord {
    pub fn new(
        url: impl Into<String>,
        mime_type: impl Into<String>,
        encoded_bytes: u64,
        decoded_bytes: u64,
    ) -> Self {
        Self {
            url: url.into(),
            mime_type: mime_type.into(),
            encoded_bytes,
            decoded_bytes,
            failed: false,
        }
    }
}

/// Resource records keyed by URL, in first-insertion order
///
/// A second record for a URL already present replaces the stored value but
/// keeps the original position, so repeated fetches of one URL are counted once.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResourceRecordSet {
    records: IndexMap<String, ResourceRecord>,
}

impl ResourceRecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under its URL, returning the record it replaced
    pub fn insert(&mut self, record: ResourceRecord) -> Option<ResourceRecord> {
        self.records.insert(record.url.clone(), record)
    }

    pub fn get(&self, url: &str) -> Option<&ResourceRecord> {
        self.records.get(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.records.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.records.values()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a ResourceRecordSet {
    type Item = &'a ResourceRecord;
    type IntoIter = indexmap::map::Values<'a, String, ResourceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}

impl FromIterator<ResourceRecord> for ResourceRecordSet {
    fn from_iter<I: IntoIterator<Item = ResourceRecord>>(iter: I) -> Self {
        let mut set = Self::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_url_overwrites_in_place() {
        let mut set = ResourceRecordSet::new();
        set.insert(ResourceRecord::new("https://a.test/", "text/html", 10, 20));
        set.insert(ResourceRecord::new("https://a.test/app.js", "text/javascript", 5, 5));

        let replaced = set.insert(ResourceRecord::new("https://a.test/", "text/html", 99, 99));

        assert_eq!(replaced.unwrap().encoded_bytes, 10);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("https://a.test/").unwrap().encoded_bytes, 99);

        let urls: Vec<_> = set.urls().collect();
        assert_eq!(urls, vec!["https://a.test/", "https://a.test/app.js"]);
    }

    #[test]
    fn test_collect_from_records() {
        let set: ResourceRecordSet = vec![
            ResourceRecord::new("https://a.test/1.png", "image/png", 1, 1),
            ResourceRecord::new("https://a.test/2.png", "image/png", 2, 2),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 2);
        assert!(set.contains("https://a.test/2.png"));
        assert!(!set.is_empty());
    }
}
