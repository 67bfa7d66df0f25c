use crate::permissions::{PermissionCategory, PermissionPolicy};
use serde_json::{Map, Value};
use tracing::warn;

const PERMISSIONS_KEY: &str = "permissions";

/// A settings file: the permission policy plus everything else the file held.
///
/// Keys this tool does not manage, at the top level and inside
/// `permissions`, are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsDocument {
    root: Map<String, Value>,
    policy: PermissionPolicy,
    present: Vec<PermissionCategory>,
    malformed: bool,
}

impl SettingsDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses settings text. Content that cannot be understood is reported
    /// with a warning and read as an empty policy rather than failing.
    pub fn parse(text: &str) -> Self {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not parse existing settings, starting from empty: {}", e);
                return Self::malformed();
            }
        };

        let Value::Object(root) = value else {
            warn!("Existing settings are not a JSON object, starting from empty");
            return Self::malformed();
        };

        let mut doc = Self {
            root,
            ..Self::default()
        };

        match doc.root.get(PERMISSIONS_KEY) {
            None => {}
            Some(Value::Object(perms)) => {
                for category in PermissionCategory::ALL {
                    let Some(raw) = perms.get(category.as_str()) else {
                        continue;
                    };
                    doc.present.push(category);
                    match serde_json::from_value::<Vec<String>>(raw.clone()) {
                        Ok(rules) => {
                            for rule in rules {
                                doc.policy.push(category, rule);
                            }
                        }
                        Err(e) => {
                            warn!(
                                "Ignoring malformed '{}' rules in settings, other categories kept: {}",
                                category, e
                            );
                            doc.malformed = true;
                        }
                    }
                }
            }
            Some(_) => {
                warn!("Ignoring settings 'permissions' value that is not an object");
                doc.malformed = true;
            }
        }

        doc
    }

    /// Like [`SettingsDocument::parse`], for raw file contents. Bytes that
    /// are not UTF-8 count as malformed.
    pub fn parse_bytes(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::parse(text),
            Err(e) => {
                warn!("Existing settings are not valid UTF-8, starting from empty: {}", e);
                Self::malformed()
            }
        }
    }

    fn malformed() -> Self {
        Self {
            malformed: true,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &PermissionPolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: PermissionPolicy) {
        self.policy = policy;
    }

    /// True when the loaded content had to be partly or fully discarded.
    pub fn was_malformed(&self) -> bool {
        self.malformed
    }

    /// Renders the document. A category is written when it has rules or was
    /// already present in the loaded file.
    pub fn to_value(&self) -> Value {
        let mut root = self.root.clone();

        let perms = root
            .entry(PERMISSIONS_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !perms.is_object() {
            *perms = Value::Object(Map::new());
        }

        if let Value::Object(perms) = perms {
            for category in PermissionCategory::ALL {
                let rules = self.policy.rules(category);
                if rules.is_empty() && !self.present.contains(&category) {
                    continue;
                }
                perms.insert(
                    category.as_str().to_string(),
                    Value::Array(rules.iter().cloned().map(Value::String).collect()),
                );
            }
        }

        Value::Object(root)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let mut text = serde_json::to_string_pretty(&self.to_value())?;
        text.push('\n');
        Ok(text)
    }
}
