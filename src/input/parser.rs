//! Command line parser for the registration protocol.
//!
//! Examples:
//!   "CHARGER Automne"        -> cmd="CHARGER", arg="Automne"
//!   "INSCRIRE"               -> cmd="INSCRIRE", arg=""
//!   "  CHARGER   Ete  2024 " -> cmd="CHARGER", arg="Ete 2024"
//!
//! Parsing never fails; deciding whether `cmd` means anything is up to the dispatcher.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    pub cmd: String,
    pub arg: String,
}

pub fn parse_command_line(line: &str) -> CommandLine {
    let mut tokens = line.split_whitespace();
    let cmd = tokens.next().unwrap_or_default().to_string();
    let arg = tokens.collect::<Vec<_>>().join(" ");
    CommandLine { cmd, arg }
}

/// Command keywords understood on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// `CHARGER <session>`
    Load,
    /// `INSCRIRE`, followed by a registration form frame
    Register,
}

impl Keyword {
    pub const ALL: [Keyword; 2] = [Keyword::Load, Keyword::Register];

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Load => "CHARGER",
            Keyword::Register => "INSCRIRE",
        }
    }

    /// Exact, case-sensitive match against the wire keyword.
    pub fn parse(cmd: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == cmd)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ---- Tests (basic) ----
//
