//! Executable availability queries.
//!
//! Detection only needs a yes/no answer per tool name. The real answer comes
//! from the search path; tests plug in a fixed set.

use std::collections::HashSet;
use tracing::trace;

pub trait ExecutableResolver: Send + Sync {
    /// Returns true when `name` resolves to an executable on the search path.
    fn is_available(&self, name: &str) -> bool;
}

/// Resolves tools against `PATH` using the `which` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathResolver;

impl PathResolver {
    pub fn new() -> Self {
        Self
    }
}

impl ExecutableResolver for PathResolver {
    fn is_available(&self, name: &str) -> bool {
        match which::which(name) {
            Ok(path) => {
                trace!(tool = name, path = %path.display(), "Resolved executable");
                true
            }
            Err(_) => false,
        }
    }
}

/// Answers from a fixed set of tool names.
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    available: HashSet<String>,
}

impl StaticResolver {
    pub fn new<I, S>(available: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            available: available.into_iter().map(Into::into).collect(),
        }
    }

    /// A resolver for which nothing is installed.
    pub fn none() -> Self {
        Self::default()
    }
}

impl ExecutableResolver for StaticResolver {
    fn is_available(&self, name: &str) -> bool {
        self.available.contains(name)
    }
}
