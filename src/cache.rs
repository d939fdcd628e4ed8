//! The process-wide pattern-string cache.
//!
//! Compiling a pattern string walks the lexer in [`crate::pattern`] and then
//! the same validation the [`crate::builder`] DSL runs for a hand-built
//! tree; call sites that format or parse the same pattern repeatedly (a
//! log formatter reused across every line, say) shouldn't pay that cost
//! twice. The cache is a small hand-rolled LRU rather than a general-purpose
//! cache crate, since it only ever needs to hold a handful of entries and a
//! linear scan over those is cheaper than hashing.
//!
//! With `std`, the cache is a [`std::sync::Mutex`]-guarded static, shared
//! across every caller in the process. Without `std` there is no portable
//! place to put a lazily-initialised, thread-safe static, so [`compiled`]
//! falls back to compiling the pattern fresh on every call.

#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::error::Error;
use crate::pattern;
use crate::tree::Node;

/// Maximum number of distinct pattern strings held at once.
const CAPACITY: usize = 16;

#[cfg(feature = "std")]
struct Lru {
    /// Least-recently-used first, most-recently-used last.
    entries: Vec<(String, Node)>,
}

#[cfg(feature = "std")]
impl Lru {
    const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    fn get(&mut self, pattern: &str) -> Option<Node> {
        let index = self.entries.iter().position(|(key, _)| key == pattern)?;
        let entry = self.entries.remove(index);
        let node = entry.1.clone();
        self.entries.push(entry);
        Some(node)
    }

    fn insert(&mut self, pattern: String, node: Node) {
        if self.entries.len() >= CAPACITY {
            self.entries.remove(0);
        }
        self.entries.push((pattern, node));
    }
}

#[cfg(feature = "std")]
static CACHE: std::sync::Mutex<Lru> = std::sync::Mutex::new(Lru::new());

/// Compiles `pattern`, consulting and populating the process-wide cache
/// when `std` is available; recompiles uncached otherwise.
///
/// # Errors
///
/// Propagates [`pattern::compile_pattern`]'s errors. A failed compilation
/// is never cached.
pub fn compiled(pattern: &str) -> Result<Node, Error> {
    #[cfg(feature = "std")]
    {
        let mut cache = CACHE.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(node) = cache.get(pattern) {
            return Ok(node);
        }
        let node = pattern::compile_pattern(pattern)?;
        cache.insert(String::from(pattern), node.clone());
        Ok(node)
    }
    #[cfg(not(feature = "std"))]
    {
        pattern::compile_pattern(pattern)
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn repeated_lookups_reuse_the_cached_tree() {
        let first = compiled("uuuu-MM-dd").unwrap();
        let second = compiled("uuuu-MM-dd").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn a_bad_pattern_is_never_cached() {
        assert!(compiled("Q").is_err());
        assert!(compiled("Q").is_err());
    }

    #[test]
    fn evicts_the_least_recently_used_entry_past_capacity() {
        for i in 0..CAPACITY {
            let pattern = alloc::format!("'p{i}'");
            compiled(&pattern).unwrap();
        }
        // One more insertion should evict the first entry ("'p0'") rather
        // than grow unbounded.
        compiled("'overflow'").unwrap();
        let mut cache = CACHE.lock().unwrap();
        assert_eq!(cache.entries.len(), CAPACITY);
        assert!(!cache.entries.iter().any(|(key, _)| key == "'p0'"));
    }
}
