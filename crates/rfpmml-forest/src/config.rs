//! Configuration builder for conversions.

use rfpmml_pmml::Application;

/// Whether encoded predicate pairs are memoized within one conversion.
///
/// Predicates are immutable values, so caching never changes the output;
/// it only avoids re-encoding repeated `(field, split)` pairs. The cache
/// lives inside the conversion and is dropped with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// Reuse predicate pairs for repeated `(field, split)` keys.
    Enabled,
    /// Encode every split afresh.
    Disabled,
}

/// Configuration for converting a source model.
///
/// Construct via [`ConverterConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter         | Default     |
/// |-------------------|-------------|
/// | `predicate_cache` | `Enabled`   |
/// | `target_name`     | `"_target"` |
/// | `application`     | `None`      |
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    pub(crate) predicate_cache: CacheMode,
    pub(crate) target_name: String,
    pub(crate) application: Option<Application>,
}

impl ConverterConfig {
    /// Name given to the target of models trained without a formula.
    pub const DEFAULT_TARGET_NAME: &'static str = "_target";

    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            predicate_cache: CacheMode::Enabled,
            target_name: Self::DEFAULT_TARGET_NAME.to_string(),
            application: None,
        }
    }

    // --- Setters ---

    /// Set the predicate cache mode.
    #[must_use]
    pub fn with_predicate_cache(mut self, predicate_cache: CacheMode) -> Self {
        self.predicate_cache = predicate_cache;
        self
    }

    /// Set the name of the synthesized target field.
    ///
    /// Only used for models trained without a formula; formula-trained
    /// models name their target themselves.
    #[must_use]
    pub fn with_target_name(mut self, target_name: impl Into<String>) -> Self {
        self.target_name = target_name.into();
        self
    }

    /// Record the producing application in the document header.
    #[must_use]
    pub fn with_application(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.application = Some(Application {
            name: name.into(),
            version: version.into(),
        });
        self
    }

    // --- Getters ---

    /// Return the predicate cache mode.
    #[must_use]
    pub fn predicate_cache(&self) -> CacheMode {
        self.predicate_cache
    }

    /// Return the name of the synthesized target field.
    #[must_use]
    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// Return the producing application, if set.
    #[must_use]
    pub fn application(&self) -> Option<&Application> {
        self.application.as_ref()
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self::new()
    }
}
