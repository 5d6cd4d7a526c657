use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::log::LogEntry;

/// A field that is kept verbatim when it does not have the expected shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Parsed(T),
    Raw(Value),
}

impl<T> Lenient<T> {
    pub fn parsed(&self) -> Option<&T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Raw(_) => None,
        }
    }
}

/// Result of the shape check on `projectPhases`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseValidity {
    /// A sequence with at least one phase
    Valid,

    /// A sequence with no phases
    EmptyPhases,

    /// Missing, or not a sequence
    Malformed,
}

impl PhaseValidity {
    pub fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// A project snapshot as sent by the client.
///
/// Only `projectPhases` and `logs` are interpreted; everything else,
/// including fields this type does not name, is carried through as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_phases: Option<Lenient<Vec<Value>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Lenient<Vec<LogEntry>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectData {
    /// Empty project with the given log and version, used for bootstrap data
    pub fn empty(logs: Vec<LogEntry>, version: impl Into<String>) -> Self {
        Self {
            project_phases: Some(Lenient::Parsed(Vec::new())),
            logs: Some(Lenient::Parsed(logs)),
            version: Some(Value::String(version.into())),
            extra: Map::new(),
        }
    }

    pub fn validate(&self) -> PhaseValidity {
        match self.project_phases.as_ref().and_then(Lenient::parsed) {
            Some(phases) if !phases.is_empty() => PhaseValidity::Valid,
            Some(_) => PhaseValidity::EmptyPhases,
            None => PhaseValidity::Malformed,
        }
    }

    pub fn phases(&self) -> &[Value] {
        self.project_phases
            .as_ref()
            .and_then(Lenient::parsed)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Parsed log entries, `None` when the logs are present but malformed
    pub fn log_entries(&self) -> Option<&[LogEntry]> {
        match &self.logs {
            None => Some(&[]),
            Some(Lenient::Parsed(logs)) => Some(logs),
            Some(Lenient::Raw(_)) => None,
        }
    }

    pub fn version_tag(&self) -> Option<&str> {
        self.version.as_ref().and_then(Value::as_str)
    }

    /// Replace the log sequence. Malformed logs are left untouched and
    /// `false` is returned.
    pub fn replace_logs(&mut self, logs: Vec<LogEntry>) -> bool {
        if matches!(self.logs, Some(Lenient::Raw(_))) {
            return false;
        }
        self.logs = Some(Lenient::Parsed(logs));
        true
    }

    /// Append one entry. Malformed logs are left untouched and `false` is
    /// returned.
    pub fn push_log(&mut self, entry: LogEntry) -> bool {
        match &mut self.logs {
            Some(Lenient::Parsed(logs)) => {
                logs.push(entry);
                true
            }
            Some(Lenient::Raw(_)) => false,
            None => {
                self.logs = Some(Lenient::Parsed(vec![entry]));
                true
            }
        }
    }
}
