use std::sync::{Arc, PoisonError, RwLock};

use super::action::Outcome;
use super::request::RequestFacts;
use super::ruleset::RuleSet;
use super::settings::{fail_open, RewriteSettings};
use crate::error::RewriteError;
use crate::parse::ParseError;

/// Holds the most recently compiled [`RuleSet`], keyed by a BLAKE3 digest
/// of its source text.
///
/// Changing the stored rule text changes the digest, so the next lookup
/// recompiles; there is no separate invalidation signal to miss.
#[derive(Debug, Default)]
pub struct CompiledCache {
    entry: RwLock<Option<(blake3::Hash, Arc<RuleSet>)>>,
}

impl CompiledCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Digest used as the cache key.
    #[must_use]
    pub fn digest(rules: &str) -> blake3::Hash {
        blake3::hash(rules.as_bytes())
    }

    /// The compiled form of `rules`, compiling on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if `rules` has a malformed line. A failed
    /// compile leaves the previous entry in place.
    pub fn get_or_compile(&self, rules: &str) -> Result<Arc<RuleSet>, ParseError> {
        let digest = Self::digest(rules);
        {
            let entry = self.entry.read().unwrap_or_else(PoisonError::into_inner);
            if let Some((key, ruleset)) = entry.as_ref() {
                if *key == digest {
                    return Ok(Arc::clone(ruleset));
                }
            }
        }

        let ruleset = Arc::new(RuleSet::parse(rules)?);
        tracing::debug!(digest = %digest.to_hex(), "compiled rewrite rules");
        let mut entry = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        *entry = Some((digest, Arc::clone(&ruleset)));
        Ok(ruleset)
    }

    /// Digest of the cached text, if any.
    #[must_use]
    pub fn cached_digest(&self) -> Option<blake3::Hash> {
        let entry = self.entry.read().unwrap_or_else(PoisonError::into_inner);
        entry.as_ref().map(|(key, _)| *key)
    }

    pub fn clear(&self) {
        let mut entry = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        *entry = None;
    }

    /// [`RewriteSettings::try_apply`] through the cache.
    ///
    /// # Errors
    ///
    /// See [`RewriteSettings::try_apply`].
    pub fn try_apply(
        &self,
        settings: &RewriteSettings,
        facts: &RequestFacts,
    ) -> Result<Outcome, RewriteError> {
        if !settings.is_active() {
            return Ok(Outcome::pass_through());
        }
        self.get_or_compile(&settings.rules)?
            .interpret_with(facts, &settings.options)
    }

    /// [`RewriteSettings::apply`] through the cache.
    pub fn apply(&self, settings: &RewriteSettings, facts: &RequestFacts) -> Outcome {
        self.try_apply(settings, facts)
            .unwrap_or_else(|err| fail_open(&err))
    }
}
