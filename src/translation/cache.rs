//! In-memory translation cache
//!
//! Keyed by the exact `(target language, text)` pair. The cache is
//! unbounded and lives as long as its owner; it is only emptied
//! explicitly, e.g. when the API key changes.

use std::collections::HashMap;

/// Hit/miss counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoized translations
#[derive(Debug, Default, Clone)]
pub struct TranslationCache {
    entries: HashMap<(String, String), String>,
    stats: CacheStats,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a translation, counting the hit or miss
    pub fn lookup(&mut self, text: &str, target_language: &str) -> Option<&str> {
        let key = (target_language.to_string(), text.to_string());
        match self.entries.get(&key) {
            Some(translated) => {
                self.stats.hits += 1;
                Some(translated.as_str())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Store a translation
    pub fn insert(&mut self, text: &str, target_language: &str, translated: String) {
        self.entries
            .insert((target_language.to_string(), text.to_string()), translated);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every entry and reset the counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }
}
