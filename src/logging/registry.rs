use std::{collections::HashMap, sync::Arc};

use super::logger::Logger;

/// Immutable name to logger mapping. Always holds the default logger once built.
pub struct Registry {
    default_name: String,
    loggers: HashMap<String, Arc<Logger>>,
    default: Arc<Logger>,
}

impl Registry {
    pub(super) fn new(
        default_name: String,
        loggers: HashMap<String, Arc<Logger>>,
        default: Arc<Logger>,
    ) -> Self {
        Self {
            default_name,
            loggers,
            default,
        }
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loggers.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Logger> {
        self.loggers.get(name).map(|logger| logger.as_ref())
    }

    pub fn default_logger(&self) -> &Logger {
        &self.default
    }

    /// Looks up `name`, falling back to the default logger. Returns the name to
    /// display alongside the logger.
    pub fn resolve<'a>(&'a self, name: &'a str) -> (&'a str, &'a Logger) {
        match self.get(name) {
            Some(logger) => (name, logger),
            None => (&self.default_name, self.default_logger()),
        }
    }

    /// Logger names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.loggers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }

    pub(super) fn loggers(&self) -> impl Iterator<Item = &Logger> {
        self.loggers.values().map(|logger| logger.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::time_format::TimeFormat;

    fn registry(default_name: &str, names: &[&str]) -> Registry {
        let default = Arc::new(Logger::new(default_name, TimeFormat::new("YYYY")));
        let mut loggers: HashMap<String, Arc<Logger>> = names
            .iter()
            .map(|name| (name.to_string(), Arc::new(Logger::new(*name, TimeFormat::new("YYYY")))))
            .collect();
        loggers.insert(default_name.to_string(), default.clone());

        Registry::new(default_name.to_string(), loggers, default)
    }

    #[test]
    fn resolve_hits_and_misses() {
        let registry = registry("default", &["db"]);

        let (display, found) = registry.resolve("db");
        assert_eq!(display, "db");
        assert_eq!(found.name(), "db");

        let (display, found) = registry.resolve("missing");
        assert_eq!(display, "default");
        assert_eq!(found.name(), "default");
    }

    #[test]
    fn lookup_is_exact() {
        let registry = registry("default", &["db"]);

        assert!(registry.contains("db"));
        assert!(!registry.contains("DB"));
        assert!(registry.get("db ").is_none());
        assert_eq!(registry.default_name(), "default");
    }

    #[test]
    fn names_are_sorted() {
        let registry = registry("b", &["c", "a"]);

        assert_eq!(registry.names(), vec!["a", "b", "c"]);
        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());
    }
}
