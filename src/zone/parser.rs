use std::fs;
use std::path::Path;

use tracing::{debug, trace};

use super::{RData, RecordClass, RecordType, Result, Zone, ZoneError, ZoneRecord, constants};

/// RFC 1035 zone file parser
pub struct ZoneParser {
    /// Current origin for qualifying relative names
    current_origin: Option<String>,
    /// The zone's own name: first origin discovered (hint, $ORIGIN, or SOA owner)
    zone_origin: Option<String>,
    /// Current default TTL from $TTL
    default_ttl: Option<u32>,
    /// Current class
    current_class: RecordClass,
    /// Previous owner name, for records starting with whitespace
    last_owner: Option<String>,
    /// Line number for error reporting
    line_number: usize,
}

impl ZoneParser {
    /// Create a new zone parser
    pub fn new() -> Self {
        Self {
            current_origin: None,
            zone_origin: None,
            default_ttl: None,
            current_class: RecordClass::IN,
            last_owner: None,
            line_number: 0,
        }
    }

    /// Create a parser with an origin hint, for files without $ORIGIN
    pub fn with_origin(origin: &str) -> Self {
        let origin = normalize_origin(origin);
        Self {
            current_origin: Some(origin.clone()),
            zone_origin: Some(origin),
            ..Self::new()
        }
    }

    /// Parse a zone file from path
    pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Zone> {
        let path = path.as_ref();

        let contents =
            fs::read_to_string(path).map_err(|e| ZoneError::IoError(e.to_string()))?;

        if contents.len() > constants::MAX_ZONE_FILE_SIZE {
            return Err(ZoneError::FileTooLarge);
        }

        let mut zone = self.parse(&contents)?;
        zone.file_path = Some(path.to_string_lossy().to_string());

        Ok(zone)
    }

    /// Parse zone file contents
    pub fn parse(&mut self, contents: &str) -> Result<Zone> {
        self.line_number = 0;

        let mut records = Vec::new();

        // Buffer for multi-line records
        let mut multi_line_buffer = String::new();
        let mut in_parentheses = false;
        let mut paren_start_line = 0;

        for line in contents.lines() {
            self.line_number += 1;

            let line = strip_comments(line);
            if line.trim().is_empty() && !in_parentheses {
                continue;
            }

            trace!("Parsing line {}: {}", self.line_number, line);

            if in_parentheses {
                multi_line_buffer.push(' ');
                multi_line_buffer.push_str(line.trim());

                if line.contains(')') && !line.contains('(') {
                    in_parentheses = false;
                    let complete_line = std::mem::take(&mut multi_line_buffer);
                    let end_line = self.line_number;

                    let record = self.parse_record(&complete_line).map_err(|e| {
                        ZoneError::ParseError(format!(
                            "Lines {}-{}: {}",
                            paren_start_line, end_line, e
                        ))
                    })?;
                    records.push(record);
                }
                continue;
            }

            if line.contains('(') && !line.contains(')') {
                in_parentheses = true;
                paren_start_line = self.line_number;
                multi_line_buffer = line.to_string();
                continue;
            }

            if line.trim_start().starts_with('$') {
                self.parse_directive(line, &mut records)?;
                continue;
            }

            let line_number = self.line_number;
            let record = self
                .parse_record(line)
                .map_err(|e| ZoneError::ParseError(format!("Line {}: {}", line_number, e)))?;
            records.push(record);
        }

        if in_parentheses {
            return Err(ZoneError::ParseError(format!(
                "Unclosed parentheses starting at line {}",
                paren_start_line
            )));
        }

        let origin = self.zone_origin.clone().ok_or(ZoneError::MissingOrigin)?;
        let mut zone = Zone::new(origin, self.default_ttl);
        for record in records {
            zone.push(record);
        }

        debug!("Parsed zone {} with {} records", zone.origin, zone.len());

        Ok(zone)
    }

    /// Parse a directive line
    fn parse_directive(&mut self, line: &str, records: &mut Vec<ZoneRecord>) -> Result<()> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(());
        }

        match parts[0].to_uppercase().as_str() {
            "$ORIGIN" => {
                if parts.len() < 2 {
                    return Err(ZoneError::ParseError(
                        "$ORIGIN requires domain name".to_string(),
                    ));
                }
                let origin = normalize_origin(parts[1]);
                self.current_origin = Some(origin.clone());
                // The zone keeps the first origin; later $ORIGIN lines
                // only reroot relative names
                self.zone_origin.get_or_insert(origin.clone());
                debug!("Set origin to: {}", origin);
            }
            "$TTL" => {
                if parts.len() < 2 {
                    return Err(ZoneError::ParseError("$TTL requires value".to_string()));
                }
                let ttl = parse_ttl(parts[1])?;
                self.default_ttl = Some(ttl);
                debug!("Set default TTL to: {}", ttl);
            }
            "$INCLUDE" => {
                if parts.len() < 2 {
                    return Err(ZoneError::ParseError(
                        "$INCLUDE requires file path".to_string(),
                    ));
                }

                let include_path = parts[1];
                let include_origin = parts.get(2).map(|o| normalize_origin(o));
                self.include(include_path, include_origin, records)?;
            }
            _ => {
                debug!("Unknown directive: {}", parts[0]);
            }
        }

        Ok(())
    }

    /// Process an $INCLUDE file: records only, with relative names rooted
    /// under the include origin when one is given
    fn include(
        &mut self,
        path: &str,
        include_origin: Option<String>,
        records: &mut Vec<ZoneRecord>,
    ) -> Result<()> {
        debug!("Processing $INCLUDE {} {:?}", path, include_origin);

        let contents = fs::read_to_string(path).map_err(|e| {
            ZoneError::ParseError(format!("Failed to read include file {}: {}", path, e))
        })?;

        // Save parse state around the included file
        let saved_origin = self.current_origin.clone();
        let saved_owner = self.last_owner.take();
        let saved_line = self.line_number;
        if include_origin.is_some() {
            self.current_origin = include_origin;
        }
        self.line_number = 0;

        for line in contents.lines() {
            self.line_number += 1;

            let line = strip_comments(line);
            if line.trim().is_empty() {
                continue;
            }

            if line.trim_start().starts_with('$') {
                if line.trim_start().to_uppercase().starts_with("$INCLUDE") {
                    self.parse_directive(line, records)?;
                }
                // $ORIGIN and $TTL inside includes are skipped
                continue;
            }

            let line_number = self.line_number;
            let record = self.parse_record(line).map_err(|e| {
                ZoneError::ParseError(format!(
                    "Error in included file {} line {}: {}",
                    path, line_number, e
                ))
            })?;
            records.push(record);
        }

        self.current_origin = saved_origin;
        self.last_owner = saved_owner;
        self.line_number = saved_line;

        debug!("Successfully processed $INCLUDE {}", path);
        Ok(())
    }

    /// Parse a resource record line
    fn parse_record(&mut self, line: &str) -> Result<ZoneRecord> {
        let parts = split_fields(line);
        if parts.is_empty() {
            return Err(ZoneError::ParseError("Empty record line".to_string()));
        }

        let mut idx = 0;
        let mut ttl = self.default_ttl;
        let mut class = self.current_class;
        let mut rtype = None;

        // A record starting with whitespace inherits the previous owner
        let raw_name = if line.starts_with(' ') || line.starts_with('\t') {
            None
        } else {
            idx += 1;
            Some(parts[0].clone())
        };

        // Optional TTL and class may precede the type, in either order
        while idx < parts.len() {
            let field = &parts[idx];

            if let Ok(ttl_value) = parse_ttl(field) {
                ttl = Some(ttl_value);
                idx += 1;
                continue;
            }

            if let Some(parsed_class) = RecordClass::from_token(field) {
                class = parsed_class;
                idx += 1;
                continue;
            }

            rtype = Some(RecordType::from_token(field));
            idx += 1;
            break;
        }

        let rtype = rtype.ok_or_else(|| ZoneError::ParseError("Missing record type".to_string()))?;

        if idx >= parts.len() {
            return Err(ZoneError::ParseError("Missing RDATA".to_string()));
        }

        // An absolute SOA owner names the zone when nothing else has yet
        if rtype == RecordType::SOA && self.current_origin.is_none() {
            if let Some(name) = raw_name.as_deref() {
                if name.ends_with('.') {
                    let origin = normalize_origin(name);
                    self.current_origin = Some(origin.clone());
                    self.zone_origin.get_or_insert(origin);
                }
            }
        }

        let name = self.qualify(raw_name.as_deref())?;
        self.last_owner = Some(name.clone());
        self.current_class = class;

        let rdata = RData::parse(&rtype, &parts[idx..])?;

        Ok(ZoneRecord::new(name, ttl, class, rdata))
    }

    /// Resolve a raw owner name to a fully qualified lowercase name
    fn qualify(&self, raw: Option<&str>) -> Result<String> {
        let raw = match raw {
            None => {
                return match &self.last_owner {
                    Some(owner) => Ok(owner.clone()),
                    None => self.origin_or_err(),
                };
            }
            Some(raw) => raw.trim(),
        };

        if raw == "@" || raw.is_empty() {
            self.origin_or_err()
        } else if let Some(absolute) = raw.strip_suffix('.') {
            Ok(absolute.to_lowercase())
        } else {
            let origin = self.origin_or_err()?;
            Ok(format!("{}.{}", raw.to_lowercase(), origin))
        }
    }

    fn origin_or_err(&self) -> Result<String> {
        self.current_origin
            .clone()
            .ok_or_else(|| ZoneError::ParseError("owner name used before any origin".to_string()))
    }
}

impl Default for ZoneParser {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_origin(origin: &str) -> String {
    origin.trim().trim_end_matches('.').to_lowercase()
}

/// Strip a ; comment, leaving semicolons inside quoted strings alone
fn strip_comments(line: &str) -> &str {
    let mut in_quotes = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Split a record line into fields, keeping quoted strings whole and
/// dropping grouping parentheses
fn split_fields(line: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            '(' | ')' if !in_quotes => {}
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

/// Parse TTL value (supports suffixes like 1h, 30m, etc.)
fn parse_ttl(s: &str) -> Result<u32> {
    let s = s.to_lowercase();

    let (number, unit) = match s.strip_suffix(['s', 'm', 'h', 'd', 'w']) {
        Some(prefix) => {
            let unit = match s.as_bytes()[s.len() - 1] {
                b'm' => 60,
                b'h' => 3600,
                b'd' => 86400,
                b'w' => 604800,
                _ => 1,
            };
            (prefix, unit)
        }
        None => (s.as_str(), 1),
    };

    number
        .parse::<u32>()
        .map(|n| n * unit)
        .map_err(|_| ZoneError::InvalidTTL(s.to_string()))
}
