use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use super::{Result, ZoneError};

/// Resource record types the converter knows by name.
///
/// Types in this set are "supported" in the sense that converting them is
/// not worth a warning; only a subset gets dedicated rdata parsing, the
/// rest keep their textual presentation form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    MX,
    NS,
    TXT,
    SRV,
    CAA,
    SOA,
    PTR,
    SPF,
    NSAP,
    SSHFP,
    TLSA,
    SVCB,
    HTTPS,
    NAPTR,
    /// Anything else, carrying the mnemonic as written
    Unknown(String),
}

impl RecordType {
    /// Parse a type mnemonic. Never fails; unrecognized mnemonics become
    /// `Unknown` so their records can degrade to the textual fallback.
    pub fn from_token(token: &str) -> Self {
        match token.to_uppercase().as_str() {
            "A" => Self::A,
            "AAAA" => Self::AAAA,
            "CNAME" => Self::CNAME,
            "MX" => Self::MX,
            "NS" => Self::NS,
            "TXT" => Self::TXT,
            "SRV" => Self::SRV,
            "CAA" => Self::CAA,
            "SOA" => Self::SOA,
            "PTR" => Self::PTR,
            "SPF" => Self::SPF,
            "NSAP" => Self::NSAP,
            "SSHFP" => Self::SSHFP,
            "TLSA" => Self::TLSA,
            "SVCB" => Self::SVCB,
            "HTTPS" => Self::HTTPS,
            "NAPTR" => Self::NAPTR,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::AAAA => "AAAA",
            Self::CNAME => "CNAME",
            Self::MX => "MX",
            Self::NS => "NS",
            Self::TXT => "TXT",
            Self::SRV => "SRV",
            Self::CAA => "CAA",
            Self::SOA => "SOA",
            Self::PTR => "PTR",
            Self::SPF => "SPF",
            Self::NSAP => "NSAP",
            Self::SSHFP => "SSHFP",
            Self::TLSA => "TLSA",
            Self::SVCB => "SVCB",
            Self::HTTPS => "HTTPS",
            Self::NAPTR => "NAPTR",
            Self::Unknown(name) => name,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record class (usually IN)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordClass {
    #[default]
    IN,
    CS,
    CH,
    HS,
}

impl RecordClass {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_uppercase().as_str() {
            "IN" => Some(Self::IN),
            "CS" => Some(Self::CS),
            "CH" => Some(Self::CH),
            "HS" => Some(Self::HS),
            _ => None,
        }
    }
}

/// SOA rdata fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaRecord {
    pub primary: String,
    pub admin: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

/// Typed rdata, one variant per record type with dedicated presentation
/// logic. Everything else keeps its presentation text in `Other`.
#[derive(Debug, Clone, PartialEq)]
pub enum RData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    CNAME(String),
    NS(String),
    MX { preference: u16, exchange: String },
    TXT(Vec<String>),
    SRV { priority: u16, weight: u16, port: u16, target: String },
    CAA { flags: u8, tag: String, value: String },
    SOA(SoaRecord),
    Other { rtype: RecordType, rdata: String },
}

impl RData {
    /// Parse rdata fields (already split respecting quoted strings) for
    /// the given record type.
    pub fn parse(rtype: &RecordType, parts: &[String]) -> Result<Self> {
        match rtype {
            RecordType::A => {
                let addr: Ipv4Addr = require_one(rtype, parts)?
                    .parse()
                    .map_err(|_| invalid(rtype, "IPv4 address", parts))?;
                Ok(Self::A(addr))
            }
            RecordType::AAAA => {
                let addr: Ipv6Addr = require_one(rtype, parts)?
                    .parse()
                    .map_err(|_| invalid(rtype, "IPv6 address", parts))?;
                Ok(Self::AAAA(addr))
            }
            RecordType::CNAME => Ok(Self::CNAME(require_one(rtype, parts)?.to_string())),
            RecordType::NS => Ok(Self::NS(require_one(rtype, parts)?.to_string())),
            RecordType::MX => {
                // MX format: preference exchange
                if parts.len() != 2 {
                    return Err(field_count(rtype, 2, parts.len()));
                }
                let preference: u16 = parts[0]
                    .parse()
                    .map_err(|_| invalid(rtype, "preference", parts))?;
                Ok(Self::MX {
                    preference,
                    exchange: parts[1].clone(),
                })
            }
            RecordType::TXT => {
                // Each quoted character-string stays its own segment
                Ok(Self::TXT(
                    parts.iter().map(|p| unquote(p).to_string()).collect(),
                ))
            }
            RecordType::SRV => {
                // SRV format: priority weight port target
                if parts.len() != 4 {
                    return Err(field_count(rtype, 4, parts.len()));
                }
                let priority: u16 = parts[0]
                    .parse()
                    .map_err(|_| invalid(rtype, "priority", parts))?;
                let weight: u16 = parts[1]
                    .parse()
                    .map_err(|_| invalid(rtype, "weight", parts))?;
                let port: u16 = parts[2]
                    .parse()
                    .map_err(|_| invalid(rtype, "port", parts))?;
                Ok(Self::SRV {
                    priority,
                    weight,
                    port,
                    target: parts[3].clone(),
                })
            }
            RecordType::CAA => {
                // CAA format: flags tag value
                if parts.len() != 3 {
                    return Err(field_count(rtype, 3, parts.len()));
                }
                let flags: u8 = parts[0]
                    .parse()
                    .map_err(|_| invalid(rtype, "flags", parts))?;
                Ok(Self::CAA {
                    flags,
                    tag: parts[1].clone(),
                    value: unquote(&parts[2]).to_string(),
                })
            }
            RecordType::SOA => {
                // SOA format: mname rname serial refresh retry expire minimum
                if parts.len() != 7 {
                    return Err(field_count(rtype, 7, parts.len()));
                }
                let mut numbers = [0u32; 5];
                for (slot, part) in numbers.iter_mut().zip(parts.iter().skip(2)) {
                    *slot = part.parse().map_err(|_| {
                        ZoneError::InvalidRecord(format!("Invalid SOA numeric value: {}", part))
                    })?;
                }
                Ok(Self::SOA(SoaRecord {
                    primary: parts[0].clone(),
                    admin: parts[1].clone(),
                    serial: numbers[0],
                    refresh: numbers[1],
                    retry: numbers[2],
                    expire: numbers[3],
                    minimum: numbers[4],
                }))
            }
            // Supported-but-untyped and unknown types keep their text
            _ => Ok(Self::Other {
                rtype: rtype.clone(),
                rdata: parts.join(" "),
            }),
        }
    }

    /// The record type this rdata belongs to
    pub fn rtype(&self) -> RecordType {
        match self {
            Self::A(_) => RecordType::A,
            Self::AAAA(_) => RecordType::AAAA,
            Self::CNAME(_) => RecordType::CNAME,
            Self::NS(_) => RecordType::NS,
            Self::MX { .. } => RecordType::MX,
            Self::TXT(_) => RecordType::TXT,
            Self::SRV { .. } => RecordType::SRV,
            Self::CAA { .. } => RecordType::CAA,
            Self::SOA(_) => RecordType::SOA,
            Self::Other { rtype, .. } => rtype.clone(),
        }
    }
}

/// A zone record represents a single resource record in a zone file
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRecord {
    /// Fully qualified owner name, lowercase, no trailing dot
    pub name: String,
    /// Time to live in seconds, if one applies to this record
    pub ttl: Option<u32>,
    /// Record class (usually IN)
    pub class: RecordClass,
    /// Typed record data
    pub rdata: RData,
}

impl ZoneRecord {
    pub fn new(name: String, ttl: Option<u32>, class: RecordClass, rdata: RData) -> Self {
        Self {
            name,
            ttl,
            class,
            rdata,
        }
    }

    pub fn rtype(&self) -> RecordType {
        self.rdata.rtype()
    }
}

/// Strip one layer of surrounding double quotes, if present
pub(crate) fn unquote(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn require_one<'a>(rtype: &RecordType, parts: &'a [String]) -> Result<&'a str> {
    if parts.len() != 1 {
        return Err(field_count(rtype, 1, parts.len()));
    }
    Ok(&parts[0])
}

fn field_count(rtype: &RecordType, wanted: usize, got: usize) -> ZoneError {
    ZoneError::InvalidRecord(format!(
        "{} record requires {} fields, got {}",
        rtype, wanted, got
    ))
}

fn invalid(rtype: &RecordType, what: &str, parts: &[String]) -> ZoneError {
    ZoneError::InvalidRecord(format!("Invalid {} {}: {}", rtype, what, parts.join(" ")))
}
