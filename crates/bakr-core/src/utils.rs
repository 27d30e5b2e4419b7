use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde::Serialize;

use crate::{domain::Concert, errors::Error, formatting::truncate_text, Result};

// ============== Timestamp Helpers ==============

/// RFC3339 timestamp in UTC (for logs/telemetry).
pub fn iso_timestamp_utc() -> String {
    Utc::now().to_rfc3339()
}

// ============== Audit Logging ==============

const AUDIT_MAX_TEXT: usize = 500;

#[derive(Clone, Debug, Serialize)]
pub struct AuditEvent {
    pub timestamp: String,
    pub event: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub concert: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl AuditEvent {
    fn base(event: &str, user_id: i64, chat_id: i64) -> Self {
        Self {
            timestamp: iso_timestamp_utc(),
            event: event.to_string(),
            user_id: Some(user_id),
            chat_id: Some(chat_id),
            concert: None,
            content: None,
            error: None,
            context: None,
        }
    }

    pub fn concert_created(user_id: i64, chat_id: i64, concert: &Concert) -> Self {
        Self {
            concert: serde_json::to_value(concert).ok(),
            ..Self::base("concert_created", user_id, chat_id)
        }
    }

    pub fn concert_deleted(user_id: i64, chat_id: i64, concert: &Concert) -> Self {
        Self {
            concert: serde_json::to_value(concert).ok(),
            ..Self::base("concert_deleted", user_id, chat_id)
        }
    }

    pub fn error(
        user_id: i64,
        chat_id: i64,
        error: &str,
        context: &str,
        content: Option<&str>,
    ) -> Self {
        Self {
            error: Some(error.to_string()),
            context: Some(context.to_string()),
            content: content.map(|s| s.to_string()),
            ..Self::base("error", user_id, chat_id)
        }
    }
}

/// Append-only audit trail of data changes. A logger without a path drops events.
#[derive(Clone, Debug)]
pub struct AuditLogger {
    path: Option<PathBuf>,
    json: bool,
}

impl AuditLogger {
    pub fn new(path: impl Into<PathBuf>, json: bool) -> Self {
        Self {
            path: Some(path.into()),
            json,
        }
    }

    pub fn disabled() -> Self {
        Self {
            path: None,
            json: false,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn write(&self, mut event: AuditEvent) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(s) = &event.content {
            event.content = Some(truncate_text(s, AUDIT_MAX_TEXT));
        }
        if let Some(s) = &event.error {
            event.error = Some(truncate_text(s, AUDIT_MAX_TEXT));
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        if self.json {
            let line = serde_json::to_string(&event)?;
            writeln!(file, "{line}")?;
            return Ok(());
        }

        // Plain text format for readability.
        let mut out = String::new();
        out.push('\n');
        out.push_str(&"=".repeat(60));

        let value = serde_json::to_value(&event)?;
        let Some(obj) = value.as_object() else {
            return Err(Error::External(
                "audit event is not a JSON object".to_string(),
            ));
        };
        for (k, v) in obj {
            out.push('\n');
            out.push_str(k);
            out.push_str(": ");
            out.push_str(&json_value_to_display(v));
        }
        out.push('\n');

        file.write_all(out.as_bytes())?;
        Ok(())
    }
}

fn json_value_to_display(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.to_string(),
        other => serde_json::to_string(other).unwrap_or_else(|_| "<unprintable>".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConcertId;
    use chrono::NaiveDate;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bakr-audit-{}-{name}", std::process::id()))
    }

    fn concert() -> Concert {
        Concert {
            concert_id: ConcertId(3),
            planned_to: NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
            city_on: "Бишкек".to_string(),
            institution_on: "Филармония".to_string(),
            link_to: "https://example.com".to_string(),
        }
    }

    #[test]
    fn json_audit_lines_include_concert() {
        let path = temp_path("json.log");
        let _ = std::fs::remove_file(&path);

        let logger = AuditLogger::new(&path, true);
        logger
            .write(AuditEvent::concert_created(1, 2, &concert()))
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let line: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(line["event"], "concert_created");
        assert_eq!(line["concert"]["concert_id"], 3);
        assert_eq!(line["concert"]["planned_to"], "2024-12-25");
        assert!(line.get("error").is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn plain_audit_truncates_long_content() {
        let path = temp_path("plain.log");
        let _ = std::fs::remove_file(&path);

        let logger = AuditLogger::new(&path, false);
        let long = "x".repeat(AUDIT_MAX_TEXT + 50);
        logger
            .write(AuditEvent::error(1, 2, "boom", "create_concert", Some(&long)))
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("event: error"));
        assert!(text.contains("context: create_concert"));
        assert!(text.contains(&format!("{}...", "x".repeat(AUDIT_MAX_TEXT))));
        assert!(!text.contains(&long));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn disabled_logger_is_a_no_op() {
        let logger = AuditLogger::disabled();
        assert!(logger.path().is_none());
        logger
            .write(AuditEvent::concert_deleted(1, 2, &concert()))
            .unwrap();
    }
}
