//! Language profile registry
//!
//! Resolves arbitrary language tags (`en-US`, `hi_IN`, `HINDI`, `fr-FR`) to
//! the closest registered profile. Resolution is total: anything unknown
//! falls back to the default profile.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

use voice_shop_core::LanguageProfile;

use crate::profiles::{english, hindi, ProfileRules, RuleProfile};
use crate::{Result, TextProcessingError};

/// Built-in registry (English + Hindi, English default)
static DEFAULT_REGISTRY: Lazy<Arc<ProfileRegistry>> = Lazy::new(|| {
    Arc::new(ProfileRegistry::builtin().expect("built-in profile rules must compile"))
});

/// Shared handle to the built-in registry
pub fn default_registry() -> Arc<ProfileRegistry> {
    Arc::clone(&DEFAULT_REGISTRY)
}

/// Immutable tag → profile table
pub struct ProfileRegistry {
    profiles: HashMap<String, Arc<dyn LanguageProfile>>,
    default: Arc<dyn LanguageProfile>,
}

impl ProfileRegistry {
    pub fn builder() -> ProfileRegistryBuilder {
        ProfileRegistryBuilder::new()
    }

    /// Registry with the built-in English and Hindi profiles
    pub fn builtin() -> Result<Self> {
        Self::builder().build()
    }

    /// Resolve a language tag to a profile
    ///
    /// Order: exact tag, longest registered subtag prefix (`en-in-x` →
    /// `en-in` → `en`), two-letter prefix (`HINDI` → `hi`), default.
    pub fn resolve(&self, tag: &str) -> &dyn LanguageProfile {
        let tag = normalize_tag(tag);

        let mut candidate = tag.as_str();
        loop {
            if let Some(profile) = self.profiles.get(candidate) {
                return profile.as_ref();
            }
            match candidate.rfind('-') {
                Some(idx) => candidate = &candidate[..idx],
                None => break,
            }
        }

        if let Some(profile) = tag.get(..2).and_then(|prefix| self.profiles.get(prefix)) {
            return profile.as_ref();
        }

        self.default.as_ref()
    }

    /// Exact lookup, no fallback
    pub fn get(&self, tag: &str) -> Option<Arc<dyn LanguageProfile>> {
        self.profiles.get(&normalize_tag(tag)).cloned()
    }

    pub fn default_profile(&self) -> &dyn LanguageProfile {
        self.default.as_ref()
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl std::fmt::Debug for ProfileRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileRegistry")
            .field("tags", &self.tags())
            .field("default", &self.default.tag())
            .finish()
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase().replace('_', "-")
}

/// Builder for [`ProfileRegistry`]
///
/// Starts with the built-in rule tables; additional languages are one
/// [`ProfileRules`] table away.
pub struct ProfileRegistryBuilder {
    rules: Vec<ProfileRules>,
    extra_number_words: HashMap<String, Vec<(String, u32)>>,
    default_tag: String,
}

impl Default for ProfileRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileRegistryBuilder {
    pub fn new() -> Self {
        Self {
            rules: vec![english::RULES, hindi::RULES],
            extra_number_words: HashMap::new(),
            default_tag: english::RULES.tag.to_string(),
        }
    }

    /// Register (or replace) a rule table
    pub fn with_rules(mut self, rules: ProfileRules) -> Self {
        self.rules.retain(|existing| !existing.tag.eq_ignore_ascii_case(rules.tag));
        self.rules.push(rules);
        self
    }

    /// Add number words to the profile registered under `tag`
    pub fn number_words<I, S>(mut self, tag: &str, words: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        self.extra_number_words
            .entry(normalize_tag(tag))
            .or_default()
            .extend(words.into_iter().map(|(word, value)| (word.into(), value)));
        self
    }

    pub fn default_tag(mut self, tag: &str) -> Self {
        self.default_tag = normalize_tag(tag);
        self
    }

    pub fn build(mut self) -> Result<ProfileRegistry> {
        let mut profiles: HashMap<String, Arc<dyn LanguageProfile>> = HashMap::new();

        for rules in &self.rules {
            let tag = normalize_tag(rules.tag);
            let extra = self.extra_number_words.remove(&tag).unwrap_or_default();
            let profile = RuleProfile::compile_with_words(rules, extra)?;
            tracing::debug!(tag = %tag, language = %rules.language, "Compiled language profile");
            profiles.insert(tag, Arc::new(profile));
        }

        if let Some(tag) = self.extra_number_words.into_keys().next() {
            return Err(TextProcessingError::UnknownProfile(tag));
        }

        let default = profiles
            .get(&self.default_tag)
            .cloned()
            .ok_or_else(|| TextProcessingError::UnknownProfile(self.default_tag.clone()))?;

        Ok(ProfileRegistry { profiles, default })
    }
}
