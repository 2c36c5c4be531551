use super::{Association, AssociationKind, Model};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Word inflection used to map has-many names to entity names.
pub trait Inflector: Send + Sync {
    fn singularize(&self, word: &str) -> String;
}

/// Suffix-stripping English singularizer. Enough for regular plurals
/// (`posts`, `categories`, `boxes`); irregular words need an explicit
/// `AssociationOptions::model`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleInflector;

impl Inflector for SimpleInflector {
    fn singularize(&self, word: &str) -> String {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}y");
        }
        for suffix in ["sses", "shes", "ches", "xes", "zes"] {
            if word.ends_with(suffix) {
                return word[..word.len() - 2].to_string();
            }
        }
        if word.ends_with("ss") {
            return word.to_string();
        }
        match word.strip_suffix('s') {
            Some(stem) if !stem.is_empty() => stem.to_string(),
            _ => word.to_string(),
        }
    }
}

/// Model descriptors addressable by entity name (case-insensitive).
#[derive(Clone)]
pub struct Registry {
    models: HashMap<String, Arc<Model>>,
    inflector: Arc<dyn Inflector>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
            inflector: Arc::new(SimpleInflector),
        }
    }

    pub fn with_inflector(mut self, inflector: impl Inflector + 'static) -> Self {
        self.inflector = Arc::new(inflector);
        self
    }

    pub fn inflector(&self) -> &dyn Inflector {
        self.inflector.as_ref()
    }

    /// Register (or replace) a model under its entity name.
    pub fn register(&mut self, model: Model) -> Arc<Model> {
        let model = Arc::new(model);
        self.models
            .insert(model.entity().to_lowercase(), Arc::clone(&model));
        model
    }

    pub fn get(&self, name: &str) -> Option<Arc<Model>> {
        self.models.get(&name.to_lowercase()).cloned()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Entity a declared association points at.
    ///
    /// `belongs_to` targets the entity named like the association;
    /// `has_many` targets the singular of the association name.
    pub fn target(&self, association: &Association) -> Option<Arc<Model>> {
        if let Some(entity) = &association.options.model {
            return self.get(entity);
        }
        match association.kind {
            AssociationKind::BelongsTo => self.get(&association.name),
            AssociationKind::HasMany => self.get(&self.inflector.singularize(&association.name)),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.models.keys().collect();
        names.sort();
        f.debug_struct("Registry").field("models", &names).finish()
    }
}
