use std::fs;
use std::path::Path;

use crate::convert::document::{Entry, MxEntry, RecordTable, ZoneDocument};
use crate::convert::{Assembly, owner, value};
use crate::error::Result;

/// Zone name used until a delegation line names the zone
const UNKNOWN_ZONE: &str = "UNKNOWN";

/// Assemble the canonical document from djbdns (tinydns) data lines.
///
/// Each line's first character selects the record kind; the remainder is
/// a colon-delimited field list. Malformed and unknown lines are skipped
/// with a warning, never fatally.
pub fn assemble(contents: &str, origin_hint: Option<&str>) -> Assembly {
    let mut assembler = LineAssembler::new(origin_hint);
    for (index, line) in contents.lines().enumerate() {
        assembler.line(index + 1, line);
    }
    assembler.finish()
}

/// Read and assemble a data file from disk
pub fn assemble_file<P: AsRef<Path>>(path: P, origin_hint: Option<&str>) -> Result<Assembly> {
    let contents = fs::read_to_string(path.as_ref())?;
    Ok(assemble(&contents, origin_hint))
}

struct LineAssembler {
    origin: Option<String>,
    nameservers: Vec<String>,
    mx: Vec<MxEntry>,
    records: RecordTable,
    warnings: Vec<String>,
}

impl LineAssembler {
    fn new(origin_hint: Option<&str>) -> Self {
        let origin = origin_hint.map(normalize);
        let mut warnings = Vec::new();
        if origin.is_none() {
            warnings.push(
                "no origin supplied; the first '&' delegation line's domain names the zone"
                    .to_string(),
            );
        }
        Self {
            origin,
            nameservers: Vec::new(),
            mx: Vec::new(),
            records: RecordTable::default(),
            warnings,
        }
    }

    fn line(&mut self, number: usize, raw: &str) {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }

        let Some(sigil) = line.chars().next() else {
            return;
        };
        let rest = &line[sigil.len_utf8()..];
        let fields: Vec<&str> = rest.split(':').collect();

        let result = match sigil {
            '.' | '=' | '+' => self.host_line(&fields),
            '&' => self.delegation_line(&fields),
            'C' => self.cname_line(&fields),
            '@' => self.mx_line(&fields),
            '\'' => self.txt_line(&fields),
            other => Err(format!("unsupported line type '{}'", other)),
        };

        if let Err(reason) = result {
            self.warnings
                .push(format!("line {} skipped: {} ({})", number, reason, line));
        }
    }

    /// `.host:address[:ttl]` (and the `=`/`+` aliases): an A record
    fn host_line(&mut self, fields: &[&str]) -> std::result::Result<(), String> {
        if fields.len() < 2 {
            return Err("expected host:address".to_string());
        }
        let ttl = optional_ttl(fields.get(2))?;
        let key = self.key_for(fields[0]);
        let entry = value::entry(fields[1].to_string(), ttl, None);
        self.records.node_mut(&key).append("A", entry);
        Ok(())
    }

    /// `&domain:ns[:ttl]`: an apex nameserver, or a delegation for a
    /// subdomain. The first delegation names the zone when no origin
    /// was supplied.
    fn delegation_line(&mut self, fields: &[&str]) -> std::result::Result<(), String> {
        if fields.len() < 2 {
            return Err("expected domain:nameserver".to_string());
        }
        optional_ttl(fields.get(2))?;

        let domain = normalize(fields[0]);
        if self.origin.is_none() {
            self.origin = Some(domain.clone());
        }
        let ns = fields[1].trim_end_matches('.').to_string();

        if self.origin.as_deref() == Some(domain.as_str()) {
            self.nameservers.push(ns);
        } else {
            let key = self.key_for(&domain);
            self.records
                .node_mut(&key)
                .append("NS", Entry::Value(ns));
        }
        Ok(())
    }

    /// `Chost:target[:ttl]`: a CNAME record
    fn cname_line(&mut self, fields: &[&str]) -> std::result::Result<(), String> {
        if fields.len() < 2 {
            return Err("expected host:target".to_string());
        }
        let ttl = optional_ttl(fields.get(2))?;
        let key = self.key_for(fields[0]);
        let target = fields[1].trim_end_matches('.').to_string();
        let entry = value::entry(target, ttl, None);
        self.records.node_mut(&key).append("CNAME", entry);
        Ok(())
    }

    /// `@domain:host[:priority]`: a mail exchanger (default priority 10)
    fn mx_line(&mut self, fields: &[&str]) -> std::result::Result<(), String> {
        if fields.len() < 2 {
            return Err("expected domain:host".to_string());
        }
        let priority = match fields.get(2) {
            Some(s) if !s.is_empty() => s
                .parse::<u16>()
                .map_err(|_| format!("invalid MX priority '{}'", s))?,
            _ => 10,
        };
        let domain = normalize(fields[0]);
        let host = fields[1].trim_end_matches('.').to_string();

        let apex = match &self.origin {
            Some(origin) => *origin == domain || domain.is_empty(),
            None => true,
        };
        if apex {
            self.mx.push(MxEntry { priority, host });
        } else {
            let key = self.key_for(&domain);
            self.records
                .node_mut(&key)
                .append("MX", Entry::Value(format!("{} {}", priority, host)));
        }
        Ok(())
    }

    /// `'host:text`: a TXT record
    fn txt_line(&mut self, fields: &[&str]) -> std::result::Result<(), String> {
        if fields.len() < 2 {
            return Err("expected host:text".to_string());
        }
        let key = self.key_for(fields[0]);
        let text = fields[1..].join(":");
        self.records
            .node_mut(&key)
            .append("TXT", Entry::Value(text));
        Ok(())
    }

    /// Owner key for a host field: empty means the apex; otherwise the
    /// host relativized against the origin once one is known
    fn key_for(&self, host: &str) -> String {
        let host = host.trim_end_matches('.');
        if host.is_empty() {
            return "@".to_string();
        }
        match &self.origin {
            Some(origin) => owner::owner_key(host, origin),
            None => host.to_lowercase(),
        }
    }

    fn finish(self) -> Assembly {
        let mut document =
            ZoneDocument::new(self.origin.unwrap_or_else(|| UNKNOWN_ZONE.to_string()));

        let mut nameservers = self.nameservers;
        if !nameservers.is_empty() {
            nameservers.sort();
            nameservers.dedup();
            document.nameservers = Some(nameservers);
        }
        let mut mx = self.mx;
        if !mx.is_empty() {
            mx.sort();
            mx.dedup();
            document.mx = Some(mx);
        }
        if !self.records.is_empty() {
            document.records = Some(self.records);
        }

        Assembly {
            document,
            warnings: self.warnings,
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().trim_end_matches('.').to_lowercase()
}

fn optional_ttl(field: Option<&&str>) -> std::result::Result<Option<u32>, String> {
    match field {
        Some(s) if !s.is_empty() => s
            .parse::<u32>()
            .map(Some)
            .map_err(|_| format!("invalid TTL '{}'", s)),
        _ => Ok(None),
    }
}
