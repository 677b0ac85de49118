//! Structured logging to stderr
//!
//! Fields are classified by key before they are printed:
//! - secrets (keys, seeds, signatures) are fully redacted
//! - addresses and object ids are shortened to prefix and suffix
//! - digests are shortened
//!
//! Debug entries are dropped unless `enable_debug` was called.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

pub fn enable_debug() {
    DEBUG_ENABLED.store(true, Ordering::SeqCst);
}

pub fn disable_debug() {
    DEBUG_ENABLED.store(false, Ordering::SeqCst);
}

pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::SeqCst)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// How a field value is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Secret,
    Address,
    Digest,
    Plain,
}

const SECRET_KEYS: &[&str] = &[
    "private_key", "secret", "seed", "mnemonic", "password", "user_key", "sponsor_key",
    "signing_key", "signature",
];

const ADDRESS_KEYS: &[&str] = &["address", "recipient", "sender", "owner", "object_id"];

const DIGEST_KEYS: &[&str] = &["digest", "hash"];

fn classify(key: &str) -> FieldKind {
    let key = key.to_lowercase();
    let matches = |keys: &[&str]| keys.iter().any(|k| key.contains(k));

    if matches(SECRET_KEYS) {
        FieldKind::Secret
    } else if matches(ADDRESS_KEYS) {
        FieldKind::Address
    } else if matches(DIGEST_KEYS) {
        FieldKind::Digest
    } else {
        FieldKind::Plain
    }
}

/// Structured log entry
#[derive(Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    pub module: &'static str,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl LogEntry {
    pub fn new(level: LogLevel, module: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            module,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field, redacted according to its key
    pub fn field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        let rendered = match classify(key) {
            FieldKind::Secret => redact_value(&value),
            FieldKind::Address => shorten(&value, 8, 4),
            FieldKind::Digest => shorten(&value, 10, 6),
            FieldKind::Plain => value,
        };
        self.fields.push((key, rendered));
        self
    }

    /// Render as `[timestamp] LEVEL [module] message | k=v ...`
    pub fn render(&self) -> String {
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
        let mut line = format!("[{}] {} [{}] {}", timestamp, self.level, self.module, self.message);
        if !self.fields.is_empty() {
            let fields = self
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(" ");
            line.push_str(" | ");
            line.push_str(&fields);
        }
        line
    }

    pub fn log(self) {
        if self.level == LogLevel::Debug && !is_debug_enabled() {
            return;
        }
        eprintln!("{}", self.render());
    }
}

fn redact_value(value: &str) -> String {
    match value.len() {
        0 => "[EMPTY]".to_string(),
        1..=4 => "[REDACTED]".to_string(),
        n => format!("[REDACTED:{}chars]", n),
    }
}

/// Keep `prefix` and `suffix` characters; short values pass through
fn shorten(value: &str, prefix: usize, suffix: usize) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "[EMPTY]".to_string();
    }
    if !trimmed.is_ascii() || trimmed.len() <= prefix + suffix + 3 {
        return trimmed.to_string();
    }
    format!("{}...{}", &trimmed[..prefix], &trimmed[trimmed.len() - suffix..])
}

#[macro_export]
macro_rules! log_debug {
    ($module:expr, $msg:expr) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Debug,
            $module,
            $msg
        ).log()
    };
    ($module:expr, $msg:expr, $($key:ident = $value:expr),* $(,)?) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Debug,
            $module,
            $msg
        )
        $(.field(stringify!($key), &$value))*
        .log()
    };
}

#[macro_export]
macro_rules! log_info {
    ($module:expr, $msg:expr) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Info,
            $module,
            $msg
        ).log()
    };
    ($module:expr, $msg:expr, $($key:ident = $value:expr),* $(,)?) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Info,
            $module,
            $msg
        )
        $(.field(stringify!($key), &$value))*
        .log()
    };
}

#[macro_export]
macro_rules! log_warn {
    ($module:expr, $msg:expr) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Warn,
            $module,
            $msg
        ).log()
    };
    ($module:expr, $msg:expr, $($key:ident = $value:expr),* $(,)?) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Warn,
            $module,
            $msg
        )
        $(.field(stringify!($key), &$value))*
        .log()
    };
}

#[macro_export]
macro_rules! log_error {
    ($module:expr, $msg:expr) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Error,
            $module,
            $msg
        ).log()
    };
    ($module:expr, $msg:expr, $($key:ident = $value:expr),* $(,)?) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Error,
            $module,
            $msg
        )
        $(.field(stringify!($key), &$value))*
        .log()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0xe7adfa0df2a0ab8892ebcf2950050bd6906789c709f1defcca2e3b4b120529de";

    #[test]
    fn test_classify_keys() {
        assert_eq!(classify("user_key"), FieldKind::Secret);
        assert_eq!(classify("sponsor_signature"), FieldKind::Secret);
        assert_eq!(classify("gas_owner"), FieldKind::Address);
        assert_eq!(classify("recipient"), FieldKind::Address);
        assert_eq!(classify("tx_hash"), FieldKind::Digest);
        assert_eq!(classify("amount"), FieldKind::Plain);
    }

    #[test]
    fn test_redact_value() {
        assert_eq!(redact_value(""), "[EMPTY]");
        assert_eq!(redact_value("abc"), "[REDACTED]");
        assert_eq!(redact_value("16/DxkhBCdKkCBOEXsWonMeEM"), "[REDACTED:25chars]");
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten(ADDRESS, 8, 4), "0xe7adfa...29de");
        assert_eq!(shorten("0x2", 8, 4), "0x2");
        assert_eq!(shorten("  ", 8, 4), "[EMPTY]");
    }

    #[test]
    fn test_log_entry_fields() {
        let entry = LogEntry::new(LogLevel::Info, "test", "Paying")
            .field("amount", 100)
            .field("user_key", "16/DxkhBCdKkCBOEXsWonMeEM/g8E+IjFZx6EUMlCng=")
            .field("recipient", ADDRESS);

        assert_eq!(entry.fields[0], ("amount", "100".to_string()));
        assert!(entry.fields[1].1.starts_with("[REDACTED"));
        assert_eq!(entry.fields[2].1, "0xe7adfa...29de");

        let line = entry.render();
        assert!(line.contains("INFO [test] Paying | amount=100"));
        assert!(!line.contains("DxkhBC"));
    }
}
