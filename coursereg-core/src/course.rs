use serde::{Deserialize, Serialize};
use std::fmt;

/// Session names offered to clients. The server treats a session as an opaque
/// string and never checks against this list.
pub const KNOWN_SESSIONS: &[&str] = &["Automne", "Hiver", "Ete"];

/// A course offering as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    #[serde(default)]
    pub title: String,
    pub session: String,
}

impl Course {
    pub fn new(code: impl Into<String>, title: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            session: session.into(),
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) - {}", self.code, self.session, self.title)
    }
}
