use super::policy::PermissionPolicy;
use super::table::{PermissionSource, StackPermissionTable};
use crate::stack::Detections;
use tracing::{debug, warn};

/// Turns stack names into a permission policy using a [`StackPermissionTable`].
#[derive(Debug, Clone)]
pub struct PermissionSynthesizer {
    table: StackPermissionTable,
}

impl PermissionSynthesizer {
    pub fn new(table: StackPermissionTable) -> Self {
        Self { table }
    }

    pub fn with_defaults() -> Self {
        Self::new(StackPermissionTable::builtin())
    }

    pub fn table(&self) -> &StackPermissionTable {
        &self.table
    }

    /// Collects the rules for `stacks`, in order, into one policy.
    ///
    /// Dynamic sources only contribute when `detections` holds an entry for
    /// the stack. Names missing from the table are skipped with a warning.
    pub fn synthesize<I, S>(&self, stacks: I, detections: Option<&Detections>) -> PermissionPolicy
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut policy = PermissionPolicy::new();

        for stack in stacks {
            let stack = stack.as_ref();
            let Some(source) = self.table.get(stack) else {
                warn!("Unknown stack '{}', no permissions generated", stack);
                continue;
            };

            let contribution = match source {
                PermissionSource::Static(_) => source.resolve(None),
                PermissionSource::DynamicFromDetection { .. } => {
                    let tools = detections
                        .and_then(|d| d.get(stack))
                        .map(|result| result.installed());
                    if tools.is_none() {
                        debug!(stack, "No detection results, skipping dynamic rules");
                    }
                    source.resolve(tools)
                }
            };

            let added = policy.extend_from(&contribution);
            debug!(stack, added, "Merged stack permissions");
        }

        policy
    }
}

impl Default for PermissionSynthesizer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
