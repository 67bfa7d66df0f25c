use super::policy::{PermissionCategory, PermissionPolicy};
use crate::stack::SHELL_TOOLS;
use std::collections::HashMap;

/// Where a stack's rules come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionSource {
    /// A fixed partial policy.
    Static(PermissionPolicy),
    /// One rule per tool listed in the stack's detection result, placed in
    /// `category`. Contributes nothing without detection results.
    DynamicFromDetection { category: PermissionCategory },
}

impl PermissionSource {
    /// Rule granting any invocation of `tool`.
    pub fn tool_rule(tool: &str) -> String {
        format!("Bash({} *)", tool)
    }

    /// Resolves this source into concrete rules. `tools` is the installed
    /// tool list from detection, if detection ran for this stack.
    pub fn resolve(&self, tools: Option<&[String]>) -> PermissionPolicy {
        match self {
            Self::Static(policy) => policy.clone(),
            Self::DynamicFromDetection { category } => {
                let mut policy = PermissionPolicy::new();
                for tool in tools.unwrap_or(&[]) {
                    policy.push(*category, Self::tool_rule(tool));
                }
                policy
            }
        }
    }
}

/// Stack name to permission source.
#[derive(Debug, Clone, Default)]
pub struct StackPermissionTable {
    entries: HashMap<String, PermissionSource>,
}

impl StackPermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, stack: impl Into<String>, source: PermissionSource) -> Self {
        self.entries.insert(stack.into(), source);
        self
    }

    pub fn get(&self, stack: &str) -> Option<&PermissionSource> {
        self.entries.get(stack)
    }

    pub fn contains(&self, stack: &str) -> bool {
        self.entries.contains_key(stack)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn builtin() -> Self {
        Self::new()
            .with_entry(
                "node",
                allow(&[
                    "Bash(npm *)",
                    "Bash(npx *)",
                    "Bash(node *)",
                    "Bash(yarn *)",
                    "Bash(pnpm *)",
                    "Bash(bun *)",
                ]),
            )
            .with_entry(
                "python",
                allow(&[
                    "Bash(python *)",
                    "Bash(python3 *)",
                    "Bash(pip *)",
                    "Bash(pip3 *)",
                    "Bash(pytest *)",
                    "Bash(poetry *)",
                    "Bash(pipenv *)",
                    "Bash(uv *)",
                ]),
            )
            .with_entry(
                "rust",
                allow(&["Bash(cargo *)", "Bash(rustc *)", "Bash(rustup *)"]),
            )
            .with_entry("go", allow(&["Bash(go *)"]))
            .with_entry(
                "docker",
                allow_ask(
                    &["Bash(docker *)", "Bash(docker-compose *)"],
                    &["Bash(docker push *)", "Bash(docker system prune *)"],
                ),
            )
            .with_entry(
                "git",
                allow_ask(
                    &[
                        "Bash(git status)",
                        "Bash(git diff *)",
                        "Bash(git log *)",
                        "Bash(git branch *)",
                        "Bash(git checkout *)",
                        "Bash(git add *)",
                        "Bash(git commit *)",
                        "Bash(git pull *)",
                        "Bash(git fetch *)",
                    ],
                    &[
                        "Bash(git push *)",
                        "Bash(git reset --hard *)",
                        "Bash(git rebase *)",
                    ],
                ),
            )
            .with_entry("make", allow(&["Bash(make *)"]))
            .with_entry(
                "ruby",
                allow(&["Bash(bundle *)", "Bash(gem *)", "Bash(ruby *)"]),
            )
            .with_entry(
                "java",
                allow(&["Bash(mvn *)", "Bash(gradle *)", "Bash(./gradlew *)"]),
            )
            .with_entry(
                SHELL_TOOLS,
                PermissionSource::DynamicFromDetection {
                    category: PermissionCategory::Allow,
                },
            )
    }
}

fn allow(rules: &[&str]) -> PermissionSource {
    allow_ask(rules, &[])
}

fn allow_ask(allow: &[&str], ask: &[&str]) -> PermissionSource {
    PermissionSource::Static(PermissionPolicy::from_lists(
        allow.iter().copied(),
        ask.iter().copied(),
        std::iter::empty::<&str>(),
    ))
}
