use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use clap::ValueEnum;

/// Input server/platform type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ServerType {
    #[default]
    Auto,
    Bind,
    Djbdns,
    Powerdns,
}

impl ServerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Bind => "bind",
            Self::Djbdns => "djbdns",
            Self::Powerdns => "powerdns",
        }
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sigils that open tinydns data lines. '@' is deliberately missing:
/// a BIND apex record line starts with '@' as well.
const TINYDNS_SIGILS: [char; 7] = ['#', '.', '&', 'C', '+', '=', '\''];

/// Best-guess classification of an input file, from its first 10 lines.
/// Unreadable or ambiguous input defaults to BIND; this never fails.
pub fn detect<P: AsRef<Path>>(path: P) -> ServerType {
    let Ok(file) = File::open(path.as_ref()) else {
        return ServerType::Bind;
    };

    let reader = BufReader::new(file);
    for line in reader.lines().map_while(|line| line.ok()).take(10) {
        let starts_with_sigil = line
            .chars()
            .next()
            .is_some_and(|c| TINYDNS_SIGILS.contains(&c));
        if starts_with_sigil {
            return ServerType::Djbdns;
        }
    }

    ServerType::Bind
}
