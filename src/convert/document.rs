use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Zone serial: an explicit value from the SOA record, or the `auto`
/// marker when the source carried none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Serial {
    #[default]
    Auto,
    Explicit(u32),
}

impl Serialize for Serial {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Auto => serializer.serialize_str("auto"),
            Self::Explicit(serial) => serializer.serialize_u32(*serial),
        }
    }
}

/// Start-of-authority metadata, populated only from an apex SOA record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoaFields {
    pub primary: String,
    pub admin: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

/// One apex mail exchanger. Field order doubles as the sort order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct MxEntry {
    pub priority: u16,
    pub host: String,
}

/// One formatted record value: a bare scalar when the TTL matches the
/// zone default (or either is absent), otherwise value plus TTL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Value(String),
    WithTtl { value: String, ttl: u32 },
}

/// The value under one (owner, type) key: a single entry until a second
/// record for the same pair promotes it to an ordered list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecordValue {
    Single(Entry),
    Many(Vec<Entry>),
}

impl RecordValue {
    /// Append another entry, promoting a single value to a list.
    /// Appends keep encounter order and are never deduplicated.
    pub fn push(&mut self, entry: Entry) {
        match self {
            Self::Single(first) => {
                *self = Self::Many(vec![first.clone(), entry]);
            }
            Self::Many(entries) => entries.push(entry),
        }
    }
}

/// Per-owner mapping from record type name to value, in first-encounter
/// order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMap {
    entries: Vec<(String, RecordValue)>,
}

impl TypeMap {
    pub fn append(&mut self, rtype: &str, entry: Entry) {
        match self.entries.iter_mut().find(|(name, _)| name == rtype) {
            Some((_, value)) => value.push(entry),
            None => self
                .entries
                .push((rtype.to_string(), RecordValue::Single(entry))),
        }
    }

    pub fn get(&self, rtype: &str) -> Option<&RecordValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == rtype)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for TypeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (rtype, value) in &self.entries {
            map.serialize_entry(rtype, value)?;
        }
        map.end()
    }
}

/// Owner-key → per-type table, in first-encounter order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTable {
    nodes: Vec<(String, TypeMap)>,
}

impl RecordTable {
    /// The per-type table for an owner, created on first use
    pub fn node_mut(&mut self, owner: &str) -> &mut TypeMap {
        let idx = match self.nodes.iter().position(|(name, _)| name == owner) {
            Some(idx) => idx,
            None => {
                self.nodes.push((owner.to_string(), TypeMap::default()));
                self.nodes.len() - 1
            }
        };
        &mut self.nodes[idx].1
    }

    pub fn get(&self, owner: &str) -> Option<&TypeMap> {
        self.nodes
            .iter()
            .find(|(name, _)| name == owner)
            .map(|(_, types)| types)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for RecordTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for (owner, types) in &self.nodes {
            map.serialize_entry(owner, types)?;
        }
        map.end()
    }
}

/// The canonical output document. Key order is declaration order;
/// absent collections are omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneDocument {
    pub zone: String,
    pub serial: Serial,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soa: Option<SoaFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nameservers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mx: Option<Vec<MxEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<RecordTable>,
}

impl ZoneDocument {
    pub fn new(zone: String) -> Self {
        Self {
            zone,
            serial: Serial::Auto,
            ttl: None,
            soa: None,
            nameservers: None,
            mx: None,
            records: None,
        }
    }

    /// Render to YAML (block style, keys in declaration/insertion order)
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_promotes_to_list() {
        let mut types = TypeMap::default();
        types.append("A", Entry::Value("192.0.2.1".into()));
        assert_eq!(
            types.get("A"),
            Some(&RecordValue::Single(Entry::Value("192.0.2.1".into())))
        );

        types.append("A", Entry::Value("192.0.2.2".into()));
        types.append("A", Entry::Value("192.0.2.1".into()));
        assert_eq!(
            types.get("A"),
            Some(&RecordValue::Many(vec![
                Entry::Value("192.0.2.1".into()),
                Entry::Value("192.0.2.2".into()),
                Entry::Value("192.0.2.1".into()),
            ]))
        );
    }

    #[test]
    fn test_minimal_document_yaml() {
        let doc = ZoneDocument::new("example.com".into());
        assert_eq!(doc.to_yaml().unwrap(), "zone: example.com\nserial: auto\n");
    }

    #[test]
    fn test_explicit_serial_yaml() {
        let mut doc = ZoneDocument::new("example.com".into());
        doc.serial = Serial::Explicit(2024010100);
        assert_eq!(
            doc.to_yaml().unwrap(),
            "zone: example.com\nserial: 2024010100\n"
        );
    }

    #[test]
    fn test_record_table_yaml_keeps_insertion_order() {
        let mut doc = ZoneDocument::new("example.com".into());
        let mut records = RecordTable::default();
        records
            .node_mut("www")
            .append("A", Entry::Value("192.0.2.2".into()));
        records.node_mut("mail").append(
            "A",
            Entry::WithTtl {
                value: "192.0.2.3".into(),
                ttl: 300,
            },
        );
        records
            .node_mut("www")
            .append("TXT", Entry::Value("hello".into()));
        doc.records = Some(records);

        let yaml = doc.to_yaml().unwrap();
        let expected = "\
zone: example.com
serial: auto
records:
  www:
    A: 192.0.2.2
    TXT: hello
  mail:
    A:
      value: 192.0.2.3
      ttl: 300
";
        assert_eq!(yaml, expected);
    }

    #[test]
    fn test_list_value_yaml() {
        let mut doc = ZoneDocument::new("example.com".into());
        let mut records = RecordTable::default();
        records
            .node_mut("www")
            .append("A", Entry::Value("192.0.2.1".into()));
        records.node_mut("www").append(
            "A",
            Entry::WithTtl {
                value: "192.0.2.2".into(),
                ttl: 60,
            },
        );
        doc.records = Some(records);

        let yaml = doc.to_yaml().unwrap();
        let expected = "\
zone: example.com
serial: auto
records:
  www:
    A:
    - 192.0.2.1
    - value: 192.0.2.2
      ttl: 60
";
        assert_eq!(yaml, expected);
    }

    #[test]
    fn test_mx_sort_order() {
        let mut mx = vec![
            MxEntry {
                priority: 20,
                host: "mx2.example.com".into(),
            },
            MxEntry {
                priority: 10,
                host: "mxb.example.com".into(),
            },
            MxEntry {
                priority: 10,
                host: "mxa.example.com".into(),
            },
        ];
        mx.sort();
        let hosts: Vec<_> = mx.iter().map(|m| m.host.as_str()).collect();
        assert_eq!(hosts, vec!["mxa.example.com", "mxb.example.com", "mx2.example.com"]);
    }
}
