use crate::convert::document::Entry;
use crate::zone::RData;

/// Canonical presentation of one record's data, by type
pub fn present(rdata: &RData) -> String {
    match rdata {
        RData::A(addr) => addr.to_string(),
        RData::AAAA(addr) => addr.to_string(),
        RData::CNAME(target) => strip_dot(target),
        RData::NS(target) => strip_dot(target),
        RData::TXT(segments) => segments.join(" "),
        RData::MX {
            preference,
            exchange,
        } => format!("{} {}", preference, strip_dot(exchange)),
        RData::SRV {
            priority,
            weight,
            port,
            target,
        } => format!("{} {} {} {}", priority, weight, port, strip_dot(target)),
        // The trailing newline is part of the .dnszone presentation
        // contract for CAA values
        RData::CAA { flags, tag, value } => format!("{} {} {}\n", flags, tag, value),
        RData::SOA(soa) => format!(
            "{} {} {} {} {} {} {}",
            strip_dot(&soa.primary),
            strip_dot(&soa.admin),
            soa.serial,
            soa.refresh,
            soa.retry,
            soa.expire,
            soa.minimum
        ),
        RData::Other { rdata, .. } => rdata.clone(),
    }
}

/// TTL-override decision, identical for every record type: a bare value
/// unless this record's TTL is present, a zone default is present, and
/// they differ
pub fn entry(value: String, ttl: Option<u32>, default_ttl: Option<u32>) -> Entry {
    match (ttl, default_ttl) {
        (Some(ttl), Some(default)) if ttl != default => Entry::WithTtl { value, ttl },
        _ => Entry::Value(value),
    }
}

fn strip_dot(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}
