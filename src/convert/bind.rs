use tracing::debug;

use crate::convert::document::{MxEntry, RecordTable, Serial, SoaFields, ZoneDocument};
use crate::convert::{Assembly, owner, value};
use crate::zone::{RData, Zone};

/// Assemble the canonical document from a parsed BIND-style zone.
///
/// Apex SOA/NS/MX records are lifted into the document's `soa`,
/// `nameservers`, and `mx` collections; everything else lands under
/// `records[<owner key>][<type>]` in encounter order.
pub fn assemble(zone: &Zone) -> Assembly {
    let mut warnings = Vec::new();
    let mut document = ZoneDocument::new(zone.origin.clone());
    document.ttl = zone.default_ttl;

    let mut nameservers: Vec<String> = Vec::new();
    let mut mx: Vec<MxEntry> = Vec::new();
    let mut records = RecordTable::default();

    for record in zone.records() {
        let rtype = record.rtype();
        if !rtype.is_supported() {
            warnings.push(format!(
                "unsupported record type '{}' at '{}', emitting its textual form",
                rtype, record.name
            ));
        }

        let apex = zone.is_apex(&record.name);
        match &record.rdata {
            RData::SOA(soa) if apex => {
                if document.soa.is_some() {
                    // First SOA wins
                    debug!("ignoring extra SOA record at the apex");
                    continue;
                }
                document.soa = Some(SoaFields {
                    primary: strip_dot(&soa.primary),
                    admin: strip_dot(&soa.admin),
                    serial: soa.serial,
                    refresh: soa.refresh,
                    retry: soa.retry,
                    expire: soa.expire,
                    minimum: soa.minimum,
                });
                document.serial = Serial::Explicit(soa.serial);
                continue;
            }
            RData::NS(target) if apex => {
                nameservers.push(strip_dot(target));
                continue;
            }
            RData::MX {
                preference,
                exchange,
            } if apex => {
                mx.push(MxEntry {
                    priority: *preference,
                    host: strip_dot(exchange),
                });
                continue;
            }
            _ => {}
        }

        let key = owner::owner_key(&record.name, &zone.origin);
        let formatted = value::present(&record.rdata);
        let entry = value::entry(formatted, record.ttl, zone.default_ttl);
        records.node_mut(&key).append(rtype.as_str(), entry);
    }

    if !nameservers.is_empty() {
        nameservers.sort();
        nameservers.dedup();
        document.nameservers = Some(nameservers);
    }
    if !mx.is_empty() {
        mx.sort();
        mx.dedup();
        document.mx = Some(mx);
    }
    if !records.is_empty() {
        document.records = Some(records);
    }

    Assembly {
        document,
        warnings,
    }
}

fn strip_dot(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::document::{Entry, RecordValue};
    use crate::zone::{RecordClass, RecordType, SoaRecord, ZoneRecord};

    fn record(name: &str, ttl: Option<u32>, rdata: RData) -> ZoneRecord {
        ZoneRecord::new(name.to_string(), ttl, RecordClass::IN, rdata)
    }

    fn sample_zone() -> Zone {
        let mut zone = Zone::new("example.com".to_string(), Some(3600));
        zone.push(record(
            "example.com",
            Some(3600),
            RData::SOA(SoaRecord {
                primary: "ns1.example.com.".into(),
                admin: "admin.example.com.".into(),
                serial: 2024010100,
                refresh: 3600,
                retry: 900,
                expire: 604800,
                minimum: 300,
            }),
        ));
        zone.push(record(
            "example.com",
            Some(3600),
            RData::NS("ns2.example.com.".into()),
        ));
        zone.push(record(
            "example.com",
            Some(3600),
            RData::NS("ns1.example.com.".into()),
        ));
        zone.push(record(
            "www.example.com",
            Some(3600),
            RData::A("192.0.2.2".parse().unwrap()),
        ));
        zone.push(record(
            "mail.example.com",
            Some(300),
            RData::A("192.0.2.3".parse().unwrap()),
        ));
        zone
    }

    #[test]
    fn test_apex_extraction() {
        let assembly = assemble(&sample_zone());
        let doc = &assembly.document;

        assert_eq!(doc.zone, "example.com");
        assert_eq!(doc.serial, Serial::Explicit(2024010100));
        assert_eq!(doc.ttl, Some(3600));

        let soa = doc.soa.as_ref().expect("soa populated");
        assert_eq!(soa.primary, "ns1.example.com");
        assert_eq!(soa.admin, "admin.example.com");
        assert_eq!(soa.refresh, 3600);
        assert_eq!(soa.minimum, 300);

        // Deduplicated and sorted
        assert_eq!(
            doc.nameservers,
            Some(vec![
                "ns1.example.com".to_string(),
                "ns2.example.com".to_string()
            ])
        );

        // Apex records never show up under records["@"]
        let records = doc.records.as_ref().expect("records populated");
        assert!(records.get("@").is_none());
        assert!(assembly.warnings.is_empty());
    }

    #[test]
    fn test_ttl_override_per_record() {
        let assembly = assemble(&sample_zone());
        let records = assembly.document.records.as_ref().unwrap();

        assert_eq!(
            records.get("www").unwrap().get("A"),
            Some(&RecordValue::Single(Entry::Value("192.0.2.2".into())))
        );
        assert_eq!(
            records.get("mail").unwrap().get("A"),
            Some(&RecordValue::Single(Entry::WithTtl {
                value: "192.0.2.3".into(),
                ttl: 300
            }))
        );
    }

    #[test]
    fn test_nameserver_dedup() {
        let mut zone = Zone::new("example.com".to_string(), None);
        zone.push(record("example.com", None, RData::NS("ns1.example.com.".into())));
        zone.push(record("example.com", None, RData::NS("ns1.example.com.".into())));

        let assembly = assemble(&zone);
        assert_eq!(
            assembly.document.nameservers,
            Some(vec!["ns1.example.com".to_string()])
        );
    }

    #[test]
    fn test_mx_sorted_by_priority_then_host() {
        let mut zone = Zone::new("example.com".to_string(), None);
        for (preference, exchange) in [
            (20u16, "backup.example.com."),
            (10, "mxb.example.com."),
            (10, "mxa.example.com."),
        ] {
            zone.push(record(
                "example.com",
                None,
                RData::MX {
                    preference,
                    exchange: exchange.into(),
                },
            ));
        }

        let assembly = assemble(&zone);
        let mx = assembly.document.mx.as_ref().unwrap();
        let hosts: Vec<_> = mx.iter().map(|m| (m.priority, m.host.as_str())).collect();
        assert_eq!(
            hosts,
            vec![
                (10, "mxa.example.com"),
                (10, "mxb.example.com"),
                (20, "backup.example.com")
            ]
        );
    }

    #[test]
    fn test_non_apex_ns_and_mx_stay_in_records() {
        let mut zone = Zone::new("example.com".to_string(), None);
        zone.push(record(
            "sub.example.com",
            None,
            RData::NS("ns1.sub.example.com.".into()),
        ));
        zone.push(record(
            "sub.example.com",
            None,
            RData::MX {
                preference: 5,
                exchange: "mail.sub.example.com.".into(),
            },
        ));

        let assembly = assemble(&zone);
        let doc = &assembly.document;
        assert!(doc.nameservers.is_none());
        assert!(doc.mx.is_none());

        let sub = doc.records.as_ref().unwrap().get("sub").unwrap();
        assert_eq!(
            sub.get("NS"),
            Some(&RecordValue::Single(Entry::Value(
                "ns1.sub.example.com".into()
            )))
        );
        assert_eq!(
            sub.get("MX"),
            Some(&RecordValue::Single(Entry::Value(
                "5 mail.sub.example.com".into()
            )))
        );
    }

    #[test]
    fn test_rrset_promotes_to_list_in_order() {
        let mut zone = Zone::new("example.com".to_string(), None);
        for addr in ["192.0.2.1", "192.0.2.2", "192.0.2.3"] {
            zone.push(record(
                "www.example.com",
                None,
                RData::A(addr.parse().unwrap()),
            ));
        }

        let assembly = assemble(&zone);
        let www = assembly.document.records.as_ref().unwrap().get("www").unwrap();
        assert_eq!(
            www.get("A"),
            Some(&RecordValue::Many(vec![
                Entry::Value("192.0.2.1".into()),
                Entry::Value("192.0.2.2".into()),
                Entry::Value("192.0.2.3".into()),
            ]))
        );
    }

    #[test]
    fn test_unsupported_type_warns_and_degrades() {
        let mut zone = Zone::new("example.com".to_string(), None);
        zone.push(record(
            "foo.example.com",
            None,
            RData::Other {
                rtype: RecordType::Unknown("LOC".into()),
                rdata: "31 0 0.000 N 100 0 0.000 W 10m".into(),
            },
        ));

        let assembly = assemble(&zone);
        assert_eq!(assembly.warnings.len(), 1);
        assert!(assembly.warnings[0].contains("LOC"));
        assert!(assembly.warnings[0].contains("foo.example.com"));

        let foo = assembly.document.records.as_ref().unwrap().get("foo").unwrap();
        assert_eq!(
            foo.get("LOC"),
            Some(&RecordValue::Single(Entry::Value(
                "31 0 0.000 N 100 0 0.000 W 10m".into()
            )))
        );
    }

    #[test]
    fn test_first_soa_wins() {
        let mut zone = Zone::new("example.com".to_string(), None);
        for serial in [111, 222] {
            zone.push(record(
                "example.com",
                None,
                RData::SOA(SoaRecord {
                    primary: "ns1.example.com.".into(),
                    admin: "admin.example.com.".into(),
                    serial,
                    refresh: 3600,
                    retry: 900,
                    expire: 604800,
                    minimum: 300,
                }),
            ));
        }

        let assembly = assemble(&zone);
        assert_eq!(assembly.document.serial, Serial::Explicit(111));
        assert_eq!(assembly.document.soa.as_ref().unwrap().serial, 111);
    }

    #[test]
    fn test_empty_collections_are_omitted() {
        let zone = Zone::new("example.com".to_string(), None);
        let assembly = assemble(&zone);
        let doc = &assembly.document;
        assert_eq!(doc.serial, Serial::Auto);
        assert!(doc.soa.is_none());
        assert!(doc.nameservers.is_none());
        assert!(doc.mx.is_none());
        assert!(doc.records.is_none());
    }
}
