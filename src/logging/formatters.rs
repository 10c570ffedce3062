use yansi::{Color, Condition, Paint};

use super::{LogFormatter, Record, Severity};

/// `[timestamp] - level: message`, used by file sinks.
#[derive(Debug, Default, Clone)]
pub struct PlainFormatter;

impl LogFormatter for PlainFormatter {
    fn format(&self, record: &Record) -> String {
        format!(
            "[{}] - {}: {}",
            record.timestamp,
            record.level.as_str(),
            record.message
        )
    }
}

/// Same layout as [`PlainFormatter`] with the level name colorized.
#[derive(Debug, Clone)]
pub struct ConsoleFormatter {
    use_ansi: bool,
}

impl ConsoleFormatter {
    pub fn new(use_ansi: bool) -> Self {
        Self { use_ansi }
    }

    fn color(level: Severity) -> Color {
        match level {
            Severity::Error => Color::Red,
            Severity::Warn => Color::Yellow,
            Severity::Info => Color::Green,
            Severity::Debug => Color::Blue,
            Severity::Verbose => Color::Cyan,
        }
    }

    fn format_level(&self, level: Severity) -> String {
        if self.use_ansi {
            level
                .as_str()
                .fg(Self::color(level))
                .whenever(Condition::ALWAYS)
                .to_string()
        } else {
            level.as_str().to_string()
        }
    }
}

impl LogFormatter for ConsoleFormatter {
    fn format(&self, record: &Record) -> String {
        format!(
            "[{}] - {}: {}",
            record.timestamp,
            self.format_level(record.level),
            record.message
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;

    fn record(level: Severity) -> Record<'static> {
        Record {
            level,
            time: Local::now(),
            timestamp: "2024-03-07 14:05:09.042".to_string(),
            message: "<default> [main.rs.main:3] hi",
        }
    }

    #[test]
    fn plain_layout() {
        assert_eq!(
            PlainFormatter.format(&record(Severity::Info)),
            "[2024-03-07 14:05:09.042] - info: <default> [main.rs.main:3] hi"
        );
    }

    #[test]
    fn console_without_ansi_matches_plain() {
        let console = ConsoleFormatter::new(false);
        for level in Severity::ALL {
            assert_eq!(
                console.format(&record(level)),
                PlainFormatter.format(&record(level))
            );
        }
    }

    #[test]
    fn console_with_ansi_colors_level_only() {
        let line = ConsoleFormatter::new(true).format(&record(Severity::Error));
        assert!(line.starts_with("[2024-03-07 14:05:09.042] - \x1b["));
        assert!(line.contains("error"));
        assert!(line.ends_with("\x1b[0m: <default> [main.rs.main:3] hi"));
    }
}
