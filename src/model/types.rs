use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Internal numeric IDs (indexes into Vecs).
pub type GroupId = usize;
pub type NamespaceId = usize;

/// One entry of the build change log.
///
/// The log is append-only and ordered by time of the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeEvent {
    /// A reference dump was loaded; the index was (re)built from scratch.
    ReferenceLoaded {
        source: String,
        groups: usize,
        at: DateTime<Utc>,
    },

    /// A namespace was registered by a user table.
    NamespaceAdded { name: String, at: DateTime<Utc> },

    /// More IDs were merged into an already registered namespace.
    NamespaceExtended { name: String, at: DateTime<Utc> },
}

impl ChangeEvent {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            ChangeEvent::ReferenceLoaded { at, .. }
            | ChangeEvent::NamespaceAdded { at, .. }
            | ChangeEvent::NamespaceExtended { at, .. } => *at,
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stamp = self.at().format("%c");
        match self {
            ChangeEvent::ReferenceLoaded { source, groups, .. } => {
                write!(f, "Loaded reference {source} ({groups} genes) on {stamp}")
            }
            ChangeEvent::NamespaceAdded { name, .. } => write!(f, "Added {name} on {stamp}"),
            ChangeEvent::NamespaceExtended { name, .. } => {
                write!(f, "Extended {name} on {stamp}")
            }
        }
    }
}

/// Version tag, build date and change log stored alongside the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub version: String,
    pub build_date: DateTime<Utc>,
    pub change_log: Vec<ChangeEvent>,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            build_date: Utc::now(),
            change_log: Vec::new(),
        }
    }
}
