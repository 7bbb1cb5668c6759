use super::{RData, SoaRecord, ZoneRecord};

/// A parsed zone: origin, optional default TTL, and its records in
/// encounter order. Encounter order is load-bearing: the converted
/// document lists owners and values in the order the source stated them.
#[derive(Debug, Clone)]
pub struct Zone {
    /// Zone origin (e.g., "example.com")
    pub origin: String,
    /// Default TTL from $TTL, when the source declared one
    pub default_ttl: Option<u32>,
    /// All records, in the order they appeared
    records: Vec<ZoneRecord>,
    /// Zone file path (if loaded from file)
    pub file_path: Option<String>,
}

impl Zone {
    pub fn new(origin: String, default_ttl: Option<u32>) -> Self {
        Self {
            origin: origin.trim_end_matches('.').to_lowercase(),
            default_ttl,
            records: Vec::new(),
            file_path: None,
        }
    }

    pub fn push(&mut self, record: ZoneRecord) {
        self.records.push(record);
    }

    /// Iterate over all records in encounter order
    pub fn records(&self) -> impl Iterator<Item = &ZoneRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a (normalized) owner name is the zone apex
    pub fn is_apex(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(&self.origin)
    }

    /// The first SOA record's fields, if any
    pub fn soa(&self) -> Option<&SoaRecord> {
        self.records.iter().find_map(|r| match &r.rdata {
            RData::SOA(soa) => Some(soa),
            _ => None,
        })
    }
}
