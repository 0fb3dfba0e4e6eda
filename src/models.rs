use rustc_hash::FxHashSet;

use crate::config::ModelsConfig;

/// Pre-built lookup of model capabilities.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    vision: FxHashSet<String>,
    completion: FxHashSet<String>,
}

impl ModelCatalog {
    /// Build a `ModelCatalog` from the models section of the configuration.
    #[must_use]
    pub fn new(config: &ModelsConfig) -> Self {
        Self {
            vision: config.vision.iter().cloned().collect(),
            completion: config.completion.iter().cloned().collect(),
        }
    }

    /// Catalog with explicit vision models and no completion models.
    #[must_use]
    pub fn with_vision<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vision: models.into_iter().map(Into::into).collect(),
            completion: FxHashSet::default(),
        }
    }

    #[must_use]
    pub fn is_vision_model(&self, model: &str) -> bool {
        self.vision.contains(model)
    }

    #[must_use]
    pub fn is_completion_model(&self, model: &str) -> bool {
        self.completion.contains(model)
    }
}
