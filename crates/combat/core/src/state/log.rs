//! Bounded battle log.

use std::collections::VecDeque;

use crate::config::BattleConfig;

/// Ordered, bounded sequence of human-readable battle events. Entries beyond
/// the window are dropped oldest-first.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleLog {
    entries: VecDeque<String>,
    window: usize,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::with_window(BattleConfig::LOG_WINDOW)
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(window),
            window: window.max(1),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.entries.len() == self.window {
            self.entries.pop_front();
        }
        self.entries.push_back(line.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest-to-newest view of the retained window.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for BattleLog {
    fn default() -> Self {
        Self::new()
    }
}
