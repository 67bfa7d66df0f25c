use serde::Serialize;
use thiserror::Error;

/// Name of the pseudo-stack that reports optional command-line utilities.
pub const SHELL_TOOLS: &str = "shell-tools";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Stack '{0}' has no indicator files")]
    EmptyIndicators(String),

    #[error("Stack '{0}' is defined more than once")]
    DuplicateStack(String),

    #[error("Stack name '{0}' is reserved")]
    ReservedName(String),
}

/// A known stack and the files whose presence gives it away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackDefinition {
    pub name: String,
    pub indicators: Vec<String>,
}

impl StackDefinition {
    pub fn new<I, S>(name: impl Into<String>, indicators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            indicators: indicators.into_iter().map(Into::into).collect(),
        }
    }
}

/// Fixed detection configuration: stack definitions in report order plus the
/// shell tools probed on the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackCatalog {
    stacks: Vec<StackDefinition>,
    shell_tools: Vec<String>,
}

impl StackCatalog {
    pub fn new<I, S>(stacks: Vec<StackDefinition>, shell_tools: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (idx, def) in stacks.iter().enumerate() {
            if def.name == SHELL_TOOLS {
                return Err(CatalogError::ReservedName(def.name.clone()));
            }
            if def.indicators.is_empty() {
                return Err(CatalogError::EmptyIndicators(def.name.clone()));
            }
            if stacks[..idx].iter().any(|other| other.name == def.name) {
                return Err(CatalogError::DuplicateStack(def.name.clone()));
            }
        }

        Ok(Self {
            stacks,
            shell_tools: shell_tools.into_iter().map(Into::into).collect(),
        })
    }

    pub fn builtin() -> Self {
        let stacks = vec![
            StackDefinition::new(
                "node",
                [
                    "package.json",
                    "yarn.lock",
                    "pnpm-lock.yaml",
                    "package-lock.json",
                    "bun.lockb",
                ],
            ),
            StackDefinition::new(
                "python",
                [
                    "requirements.txt",
                    "setup.py",
                    "pyproject.toml",
                    "Pipfile",
                    "poetry.lock",
                    "uv.lock",
                ],
            ),
            StackDefinition::new("rust", ["Cargo.toml", "Cargo.lock"]),
            StackDefinition::new("go", ["go.mod", "go.sum"]),
            StackDefinition::new(
                "docker",
                [
                    "Dockerfile",
                    "docker-compose.yml",
                    "docker-compose.yaml",
                    ".dockerignore",
                ],
            ),
            StackDefinition::new("git", [".git/config"]),
            StackDefinition::new("make", ["Makefile"]),
            StackDefinition::new("ruby", ["Gemfile", "Gemfile.lock"]),
            StackDefinition::new("java", ["pom.xml", "build.gradle", "build.gradle.kts"]),
        ];

        Self {
            stacks,
            shell_tools: ["fd", "rg", "ast-grep", "fzf", "jq", "yq"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    pub fn stacks(&self) -> &[StackDefinition] {
        &self.stacks
    }

    pub fn shell_tools(&self) -> &[String] {
        &self.shell_tools
    }

    pub fn get(&self, name: &str) -> Option<&StackDefinition> {
        self.stacks.iter().find(|def| def.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stacks.iter().map(|def| def.name.as_str())
    }
}

impl Default for StackCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
