//! Named agent factories.
//!
//! Lets experiment configs refer to agents by name:
//!
//! ```
//! use liars_dice::agents::AgentRegistry;
//!
//! let registry = AgentRegistry::with_builtins();
//! let agent = registry.create("random", 7).unwrap();
//! assert_eq!(agent.label(), "random");
//! ```

use rustc_hash::FxHashMap;

use super::agent::Agent;
use super::random::RandomAgent;

/// Builds an agent from a seed.
pub type AgentFactory = Box<dyn Fn(u64) -> Box<dyn Agent> + Send + Sync>;

/// Registry of agent constructors by name.
#[derive(Default)]
pub struct AgentRegistry {
    factories: FxHashMap<String, AgentFactory>,
}

impl AgentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the agents shipped in this crate.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("random", |seed| Box::new(RandomAgent::new(seed)));
        registry
    }

    /// Register a factory, replacing any previous one under `name`.
    ///
    /// Returns whether a factory was replaced.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> bool
    where
        F: Fn(u64) -> Box<dyn Agent> + Send + Sync + 'static,
    {
        self.factories
            .insert(name.into(), Box::new(factory))
            .is_some()
    }

    /// Build the agent registered under `name`.
    #[must_use]
    pub fn create(&self, name: &str, seed: u64) -> Option<Box<dyn Agent>> {
        self.factories.get(name).map(|factory| factory(seed))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agents", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::ScriptedAgent;
    use crate::core::Action;

    #[test]
    fn test_builtins() {
        let registry = AgentRegistry::with_builtins();
        assert!(registry.contains("random"));
        assert_eq!(registry.len(), 1);
        assert!(registry.create("nash", 0).is_none());
    }

    #[test]
    fn test_register_and_replace() {
        let mut registry = AgentRegistry::new();
        assert!(registry.is_empty());

        let replaced = registry.register("always_call", |_| {
            Box::new(ScriptedAgent::new(Vec::new()).with_label("always_call"))
        });
        assert!(!replaced);
        assert!(registry.register("always_call", |_| {
            Box::new(ScriptedAgent::new([Action::CallLiar]).with_label("always_call"))
        }));

        registry.register("random", |seed| Box::new(RandomAgent::new(seed)));
        assert_eq!(registry.names(), vec!["always_call", "random"]);
        assert_eq!(registry.create("always_call", 1).unwrap().label(), "always_call");
    }
}
