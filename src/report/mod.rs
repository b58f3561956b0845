//! Leveled console reporting for generation runs.
//!
//! One line per record outcome, one summary line per run. Everything goes to
//! stderr so command output stays scriptable.

/// Report level for console display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn prefix(&self) -> &'static str {
        match self {
            Level::Info => "   ",
            Level::Success => " ✓ ",
            Level::Warning => " ⚠ ",
            Level::Error => " ✗ ",
        }
    }
}

/// A single report line.
#[derive(Debug, Clone)]
pub struct Entry {
    pub level: Level,
    pub message: String,
}

impl Entry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: Level::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: Level::Success, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: Level::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: Level::Error, message: message.into() }
    }

    /// Print the entry to stderr with its level prefix.
    pub fn emit(&self) {
        eprintln!("{}{}", self.level.prefix(), self.message);
    }
}

/// Convenience reporting functions.
pub fn info(msg: impl Into<String>) {
    Entry::info(msg).emit();
}

pub fn success(msg: impl Into<String>) {
    Entry::success(msg).emit();
}

pub fn warning(msg: impl Into<String>) {
    Entry::warning(msg).emit();
}

pub fn error(msg: impl Into<String>) {
    Entry::error(msg).emit();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_levels() {
        let entry = Entry::warning("Menu main-nav Already exists. Skipping creation...");
        assert_eq!(entry.level, Level::Warning);
        assert!(entry.message.contains("main-nav"));
    }

    #[test]
    fn test_prefixes_distinct() {
        let levels = [Level::Info, Level::Success, Level::Warning, Level::Error];
        for (i, a) in levels.iter().enumerate() {
            for b in &levels[i + 1..] {
                assert_ne!(a.prefix(), b.prefix());
            }
        }
    }
}
