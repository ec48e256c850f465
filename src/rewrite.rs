//! Generation rewriting with a memoized, append-only generation cache.
//!
//! The entry point is [`RewritingEngine`]. Build one from a shared
//! [`Configuration`], then move between generations with
//! [`RewritingEngine::set_generation`]. Every generation reached along the way
//! is kept, so stepping back and forth is a lookup.
//!
//! # Growth
//!
//! Recursive rules grow the string exponentially with the generation count.
//! The engine does not bound this; callers cap the generations they request.

use crate::alphabet::Configuration;
use crate::error::LSystemError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Applies one rewrite pass to `previous`.
///
/// Each declared variable with a rule is replaced by its body; every other
/// character is copied. Replacements are not rewritten again within the pass.
pub fn expand(previous: &str, config: &Configuration) -> String {
    let mut next = String::with_capacity(previous.len() * 2);
    for symbol in previous.chars() {
        match config.replacement(symbol) {
            Some(body) => next.push_str(body),
            None => next.push(symbol),
        }
    }
    next
}

/// Result of [`RewritingEngine::set_generation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Generation<'a> {
    pub index: usize,
    pub text: &'a str,
    /// `false` when the string came straight from the cache.
    pub recomputed: bool,
}

/// Expands an axiom through successive generations.
#[derive(Clone, Debug)]
pub struct RewritingEngine {
    config: Arc<Configuration>,
    cache: BTreeMap<usize, String>,
    current: usize,
}

impl RewritingEngine {
    /// Creates an engine at generation 0 with the cache seeded by the axiom.
    pub fn new(config: Arc<Configuration>) -> Self {
        let mut cache = BTreeMap::new();
        cache.insert(0, config.axiom.clone());
        Self {
            config,
            cache,
            current: 0,
        }
    }

    /// Swaps in a new configuration, discarding the cache and returning to
    /// generation 0.
    pub fn reconfigure(&mut self, config: Arc<Configuration>) {
        *self = Self::new(config);
    }

    pub fn config(&self) -> &Arc<Configuration> {
        &self.config
    }

    pub fn current_generation(&self) -> usize {
        self.current
    }

    /// String at the current generation.
    pub fn current_text(&self) -> &str {
        self.cached(self.current)
    }

    /// Cached string for `generation`, if it has been reached.
    pub fn get(&self, generation: usize) -> Option<&str> {
        self.cache.get(&generation).map(String::as_str)
    }

    /// Generation indices held in the cache, ascending.
    pub fn cached_generations(&self) -> impl Iterator<Item = usize> + '_ {
        self.cache.keys().copied()
    }

    /// Moves to `target`, expanding only what the cache does not already hold.
    ///
    /// Going forward, expansion restarts from the current generation; going
    /// back to an uncached index, from the greatest cached generation below
    /// it. Every intermediate generation is stored. A negative `target` is
    /// rejected before any state changes.
    pub fn set_generation(&mut self, target: i64) -> Result<Generation<'_>, LSystemError> {
        let target =
            usize::try_from(target).map_err(|_| LSystemError::InvalidGenerationTarget(target))?;

        if self.cache.contains_key(&target) {
            log::debug!("generation {target}: cache hit");
            self.current = target;
            return Ok(Generation {
                index: target,
                text: self.cached(target),
                recomputed: false,
            });
        }

        let start = if target > self.current {
            self.current
        } else {
            self.cache
                .range(..target)
                .next_back()
                .map(|(&index, _)| index)
                .unwrap_or(0)
        };

        let mut text = self.cached(start).to_owned();
        for index in start + 1..=target {
            text = expand(&text, &self.config);
            log::debug!("generation {index}: expanded to {} symbols", text.len());
            self.cache.insert(index, text.clone());
        }
        self.current = target;

        Ok(Generation {
            index: target,
            text: self.cached(target),
            recomputed: true,
        })
    }

    fn cached(&self, generation: usize) -> &str {
        // Generation 0 is seeded at construction and entries are never evicted.
        self.cache
            .get(&generation)
            .map(String::as_str)
            .unwrap_or(&self.config.axiom)
    }
}
