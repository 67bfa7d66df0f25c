use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionCategory {
    Allow,
    Ask,
    Deny,
}

impl PermissionCategory {
    pub const ALL: [PermissionCategory; 3] = [Self::Allow, Self::Ask, Self::Deny];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Ask => "ask",
            Self::Deny => "deny",
        }
    }
}

impl fmt::Display for PermissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command rules per category.
///
/// Within a category every rule is unique and keeps the position it was
/// first inserted at. Rules are opaque strings compared by equality only;
/// the same rule may appear in more than one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPolicy")]
pub struct PermissionPolicy {
    allow: Vec<String>,
    ask: Vec<String>,
    deny: Vec<String>,
}

/// Wire shape; absent categories read as empty.
#[derive(Deserialize)]
struct RawPolicy {
    #[serde(default)]
    allow: Vec<String>,
    #[serde(default)]
    ask: Vec<String>,
    #[serde(default)]
    deny: Vec<String>,
}

impl From<RawPolicy> for PermissionPolicy {
    fn from(raw: RawPolicy) -> Self {
        Self::from_lists(raw.allow, raw.ask, raw.deny)
    }
}

impl PermissionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a policy from raw lists, dropping repeated rules.
    pub fn from_lists<A, B, C>(allow: A, ask: B, deny: C) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        B: IntoIterator,
        B::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let mut policy = Self::new();
        for rule in allow {
            policy.push(PermissionCategory::Allow, rule);
        }
        for rule in ask {
            policy.push(PermissionCategory::Ask, rule);
        }
        for rule in deny {
            policy.push(PermissionCategory::Deny, rule);
        }
        policy
    }

    pub fn rules(&self, category: PermissionCategory) -> &[String] {
        match category {
            PermissionCategory::Allow => &self.allow,
            PermissionCategory::Ask => &self.ask,
            PermissionCategory::Deny => &self.deny,
        }
    }

    fn rules_mut(&mut self, category: PermissionCategory) -> &mut Vec<String> {
        match category {
            PermissionCategory::Allow => &mut self.allow,
            PermissionCategory::Ask => &mut self.ask,
            PermissionCategory::Deny => &mut self.deny,
        }
    }

    pub fn allow(&self) -> &[String] {
        &self.allow
    }

    pub fn ask(&self) -> &[String] {
        &self.ask
    }

    pub fn deny(&self) -> &[String] {
        &self.deny
    }

    pub fn contains(&self, category: PermissionCategory, rule: &str) -> bool {
        self.rules(category).iter().any(|r| r == rule)
    }

    /// Appends `rule` unless the category already holds it.
    /// Returns whether the rule was added.
    pub fn push(&mut self, category: PermissionCategory, rule: impl Into<String>) -> bool {
        let rule = rule.into();
        if self.contains(category, &rule) {
            return false;
        }
        self.rules_mut(category).push(rule);
        true
    }

    /// Appends every rule of `incoming` missing from `self`, category by
    /// category, in `incoming`'s order. Existing rules never move.
    /// Returns the number of rules added.
    pub fn extend_from(&mut self, incoming: &PermissionPolicy) -> usize {
        let mut added = 0;
        for category in PermissionCategory::ALL {
            for rule in incoming.rules(category) {
                if self.push(category, rule.as_str()) {
                    added += 1;
                }
            }
        }
        added
    }

    /// Non-mutating form of [`PermissionPolicy::extend_from`].
    pub fn merge(&self, incoming: &PermissionPolicy) -> PermissionPolicy {
        let mut merged = self.clone();
        merged.extend_from(incoming);
        merged
    }

    pub fn len(&self) -> usize {
        self.allow.len() + self.ask.len() + self.deny.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Categories holding at least one rule.
    pub fn non_empty_categories(&self) -> impl Iterator<Item = PermissionCategory> + '_ {
        PermissionCategory::ALL
            .into_iter()
            .filter(move |c| !self.rules(*c).is_empty())
    }
}

/// Combines `existing` with `incoming`; see [`PermissionPolicy::merge`].
pub fn merge(existing: &PermissionPolicy, incoming: &PermissionPolicy) -> PermissionPolicy {
    existing.merge(incoming)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(allow: &[&str], ask: &[&str], deny: &[&str]) -> PermissionPolicy {
        PermissionPolicy::from_lists(
            allow.iter().copied(),
            ask.iter().copied(),
            deny.iter().copied(),
        )
    }

    fn samples() -> Vec<PermissionPolicy> {
        vec![
            PermissionPolicy::new(),
            policy(&["Bash(git status)"], &[], &[]),
            policy(
                &["Bash(npm *)", "Bash(go *)"],
                &["Bash(git push *)"],
                &["Bash(rm -rf *)"],
            ),
            policy(&["Bash(go *)", "Bash(cargo *)"], &["Bash(npm *)"], &[]),
            policy(&[], &["Bash(git rebase *)", "Bash(git push *)"], &["Bash(go *)"]),
        ]
    }

    #[test]
    fn test_category_names() {
        let names: Vec<&str> = PermissionCategory::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["allow", "ask", "deny"]);
        assert_eq!(PermissionCategory::Ask.to_string(), "ask");
    }

    #[test]
    fn test_push_deduplicates_within_category() {
        let mut p = PermissionPolicy::new();
        assert!(p.push(PermissionCategory::Allow, "Bash(make *)"));
        assert!(!p.push(PermissionCategory::Allow, "Bash(make *)"));
        assert_eq!(p.allow(), &["Bash(make *)"]);
    }

    #[test]
    fn test_same_rule_allowed_across_categories() {
        let mut p = PermissionPolicy::new();
        assert!(p.push(PermissionCategory::Allow, "Bash(docker *)"));
        assert!(p.push(PermissionCategory::Ask, "Bash(docker *)"));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_from_lists_drops_duplicates() {
        let p = policy(&["a", "b", "a"], &["c", "c"], &[]);
        assert_eq!(p.allow(), &["a", "b"]);
        assert_eq!(p.ask(), &["c"]);
        assert!(p.deny().is_empty());
    }

    #[test]
    fn test_merge_appends_missing_in_incoming_order() {
        let existing = policy(&["Bash(git status)", "Bash(ls *)"], &[], &[]);
        let incoming = policy(
            &["Bash(git diff *)", "Bash(git status)", "Bash(git log *)"],
            &["Bash(git push *)"],
            &[],
        );

        let merged = merge(&existing, &incoming);
        assert_eq!(
            merged.allow(),
            &[
                "Bash(git status)",
                "Bash(ls *)",
                "Bash(git diff *)",
                "Bash(git log *)"
            ]
        );
        assert_eq!(merged.ask(), &["Bash(git push *)"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        for p in samples() {
            assert_eq!(merge(&p, &p), p);
        }
    }

    #[test]
    fn test_merge_is_associative() {
        let all = samples();
        for a in &all {
            for b in &all {
                for c in &all {
                    let left = merge(&merge(a, b), c);
                    let right = merge(a, &merge(b, c));
                    assert_eq!(left, right);
                }
            }
        }
    }

    #[test]
    fn test_merge_keeps_existing_prefix() {
        let all = samples();
        for existing in &all {
            for incoming in &all {
                let merged = merge(existing, incoming);
                for category in PermissionCategory::ALL {
                    let before = existing.rules(category);
                    assert_eq!(&merged.rules(category)[..before.len()], before);
                }
            }
        }
    }

    #[test]
    fn test_merge_empty_incoming_is_identity() {
        for p in samples() {
            assert_eq!(merge(&p, &PermissionPolicy::new()), p);
        }
    }

    #[test]
    fn test_extend_from_counts_additions() {
        let mut p = policy(&["a"], &[], &[]);
        let added = p.extend_from(&policy(&["a", "b"], &["c"], &["d"]));
        assert_eq!(added, 3);
        assert_eq!(p.len(), 4);
    }

    #[test]
    fn test_non_empty_categories() {
        let p = policy(&[], &["x"], &["y"]);
        let cats: Vec<_> = p.non_empty_categories().collect();
        assert_eq!(cats, vec![PermissionCategory::Ask, PermissionCategory::Deny]);
        assert!(PermissionPolicy::new().is_empty());
    }

    #[test]
    fn test_deserialize_drops_duplicates() {
        let p: PermissionPolicy =
            serde_json::from_str(r#"{"allow": ["Bash(go *)", "Bash(go *)"], "deny": []}"#).unwrap();
        assert_eq!(p.allow(), &["Bash(go *)"]);
        assert_eq!(merge(&p, &p), p);
    }

    #[test]
    fn test_deserialize_missing_categories() {
        let p: PermissionPolicy = serde_json::from_str(r#"{"allow": ["Bash(go *)"]}"#).unwrap();
        assert_eq!(p.allow(), &["Bash(go *)"]);
        assert!(p.ask().is_empty());
        assert!(p.deny().is_empty());
    }
}
