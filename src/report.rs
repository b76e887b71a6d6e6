// src/report.rs

//! Console reporting with explicit verbosity and nesting state.
//!
//! The reporter is threaded through the pipeline call chain instead of
//! living in global state, so every stage prints at the depth of the
//! problem it is working on.

use chrono::Local;

/// Verbosity threshold for console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Debug,
    Info,
    Warning,
}

impl Verbosity {
    fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Debug => "DEBUG",
            Verbosity::Info => "INFO",
            Verbosity::Warning => "WARN",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "debug" => Verbosity::Debug,
            "warning" | "warn" => Verbosity::Warning,
            _ => Verbosity::Info,
        }
    }
}

/// Run context carrying the output threshold and nesting depth.
#[derive(Debug, Clone)]
pub struct Reporter {
    level: Verbosity,
    indent: usize,
}

impl Reporter {
    pub fn new(level: Verbosity) -> Self {
        Self { level, indent: 0 }
    }

    /// A reporter one nesting level deeper, for per-problem and per-stage
    /// output under a section header.
    pub fn nested(&self) -> Self {
        Self {
            level: self.level,
            indent: self.indent + 1,
        }
    }

    fn should_log(&self, level: Verbosity) -> bool {
        level >= self.level
    }

    fn format(&self, level: Verbosity, message: &str) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        format!(
            "[{}] [{}] {}{}",
            timestamp,
            level.as_str(),
            "  ".repeat(self.indent),
            message
        )
    }

    pub fn debug(&self, message: &str) {
        if self.should_log(Verbosity::Debug) {
            eprintln!("{}", self.format(Verbosity::Debug, message));
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_log(Verbosity::Info) {
            println!("{}", self.format(Verbosity::Info, message));
        }
    }

    pub fn warn(&self, message: &str) {
        if self.should_log(Verbosity::Warning) {
            eprintln!("{}", self.format(Verbosity::Warning, message));
        }
    }

    pub fn error(&self, message: &str) {
        // Errors ignore the threshold.
        eprintln!("{}", self.format(Verbosity::Warning, &format!("ERROR: {message}")));
    }

    /// Section header for a problem or a contest-level operation.
    pub fn header(&self, title: &str) {
        if self.should_log(Verbosity::Info) {
            let border = "═".repeat(60);
            println!("{}", self.format(Verbosity::Info, &border));
            println!("{}", self.format(Verbosity::Info, &format!("  {title}")));
            println!("{}", self.format(Verbosity::Info, &border));
        }
    }

    /// Indented detail line under the previous message.
    pub fn sub_item(&self, message: &str) {
        if self.should_log(Verbosity::Info) {
            println!("{}", self.format(Verbosity::Info, &format!("    {message}")));
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(Verbosity::Info)
    }
}
