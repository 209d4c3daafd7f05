use crate::config::*;
use bevy::prelude::*;
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Info,
    Event,
    Mutation,
    Warn,
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogKind::Info => write!(f, "INFO"),
            LogKind::Event => write!(f, "EVENT"),
            LogKind::Mutation => write!(f, "MUTATION"),
            LogKind::Warn => write!(f, "WARN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub kind: LogKind,
    pub message: String,
    pub count: u32,
    /// Seconds since startup of the most recent occurrence
    pub at: f64,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if self.count > 1 {
            write!(f, " (x{})", self.count)?;
        }
        Ok(())
    }
}

/// Capped on-screen log, newest first. Repeats of the latest message arriving
/// within `LOG_MERGE_SECS` bump its counter instead of adding a line.
#[derive(Resource, Debug, Default)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
}

impl EventLog {
    pub fn push(&mut self, kind: LogKind, message: impl Into<String>, now: f64) {
        let message = message.into();
        if let Some(top) = self.entries.front_mut() {
            if top.message == message && now - top.at < LOG_MERGE_SECS {
                top.count += 1;
                top.at = now;
                top.kind = kind;
                return;
            }
        }
        self.entries.push_front(LogEntry {
            kind,
            message,
            count: 1,
            at: now,
        });
        self.entries.truncate(LOG_CAPACITY);
    }

    /// Newest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
