use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Build/run state of a remote script. Only `FAIL` and `SUCCESS` are final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScriptStatus {
    Success,
    Fail,
    Other(String),
}

impl ScriptStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScriptStatus::Success | ScriptStatus::Fail)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ScriptStatus::Success => "SUCCESS",
            ScriptStatus::Fail => "FAIL",
            ScriptStatus::Other(s) => s,
        }
    }
}

impl From<String> for ScriptStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "SUCCESS" => ScriptStatus::Success,
            "FAIL" => ScriptStatus::Fail,
            _ => ScriptStatus::Other(s),
        }
    }
}

impl From<ScriptStatus> for String {
    fn from(status: ScriptStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for ScriptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub register_date: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl LogEntry {
    /// Server timestamps without an offset are UTC.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_server_timestamp(&self.register_date)
    }
}

pub fn parse_server_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub status: ScriptStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}
