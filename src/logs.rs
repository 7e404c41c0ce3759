//! Leveled console logging for pipeline progress.
//!
//! Progress lines go to stderr so stdout stays reserved for the
//! report tables and JSON dumps.

/// Log level for console display
#[derive(Debug, Clone, Copy)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    fn prefix(self) -> &'static str {
        match self {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠",
            LogLevel::Error => "   ✗",
        }
    }
}

fn emit(level: LogLevel, message: &str, indent: u8) {
    let indent = "   ".repeat(indent as usize);
    eprintln!("{}{} {}", indent, level.prefix(), message);
}

/// Convenient logging functions
pub fn log_info(msg: impl AsRef<str>) {
    emit(LogLevel::Info, msg.as_ref(), 0);
}

pub fn log_success(msg: impl AsRef<str>) {
    emit(LogLevel::Success, msg.as_ref(), 0);
}

pub fn log_warning(msg: impl AsRef<str>) {
    emit(LogLevel::Warning, msg.as_ref(), 0);
}

pub fn log_error(msg: impl AsRef<str>) {
    emit(LogLevel::Error, msg.as_ref(), 0);
}

pub fn log_info_indent(msg: impl AsRef<str>, indent: u8) {
    emit(LogLevel::Info, msg.as_ref(), indent);
}
