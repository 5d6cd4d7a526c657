use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of a log entry, carried on the wire as the `type` field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogKind {
    /// Snapshot pushed to the cloud store
    CloudBackup,

    /// Snapshot handed back to a client
    Restore,

    /// Bootstrap project created for a new user
    SystemInit,

    /// Any type written by clients that this service does not interpret
    Other(String),
}

impl LogKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::CloudBackup => "CLOUD_BACKUP",
            Self::Restore => "RESTORE",
            Self::SystemInit => "SYSTEM_INIT",
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for LogKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "CLOUD_BACKUP" => Self::CloudBackup,
            "RESTORE" => Self::Restore,
            "SYSTEM_INIT" => Self::SystemInit,
            _ => Self::Other(kind),
        }
    }
}

impl From<LogKind> for String {
    fn from(kind: LogKind) -> Self {
        match kind {
            LogKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry of a project's append-only log.
///
/// Fields are kept as raw JSON so that entries written by clients survive a
/// save/restore cycle unchanged whatever their types: a numeric `timestamp`
/// or a non-string `type` stays as sent. Unknown fields live in `details`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,

    /// Type-specific fields
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl LogEntry {
    pub fn new(kind: LogKind, message: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: Some(Value::String(timestamp.into())),
            message: Some(Value::String(message.into())),
            kind: Some(Value::String(kind.into())),
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// The entry's type, `None` when absent or not a string
    pub fn kind(&self) -> Option<LogKind> {
        self.kind
            .as_ref()
            .and_then(Value::as_str)
            .map(|kind| LogKind::from(kind.to_string()))
    }

    pub fn is_kind(&self, kind: &LogKind) -> bool {
        self.kind.as_ref().and_then(Value::as_str) == Some(kind.as_str())
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().and_then(Value::as_str)
    }

    pub fn timestamp(&self) -> Option<&Value> {
        self.timestamp.as_ref()
    }
}
