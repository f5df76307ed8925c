//! Category-partitioned rule accumulation and deduplication.

use crate::classifier::{ClassifiedRule, RuleCategory};
use std::collections::{BTreeMap, BTreeSet};

/// A deduplicated, category-partitioned set of rules.
///
/// The dedup key is the exact `(category, value, modifier)` tuple,
/// case-sensitive and unnormalized, so `T.ME` and `t.me` stay distinct.
/// Ordered collections keep iteration deterministic: categories in the
/// fixed output order, rules alphabetically within each category.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    name: String,
    categories: BTreeMap<RuleCategory, BTreeSet<ClassifiedRule>>,
}

impl RuleSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            categories: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a rule. Returns `false` when an identical rule was already
    /// present.
    pub fn insert(&mut self, rule: ClassifiedRule) -> bool {
        self.categories.entry(rule.category).or_default().insert(rule)
    }

    pub fn extend<I: IntoIterator<Item = ClassifiedRule>>(&mut self, rules: I) {
        for rule in rules {
            self.insert(rule);
        }
    }

    /// Number of rules in one category.
    pub fn count(&self, category: RuleCategory) -> usize {
        self.categories.get(&category).map_or(0, BTreeSet::len)
    }

    /// Total rule count across all categories.
    pub fn total(&self) -> usize {
        self.categories.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Non-empty categories in output order, each with its sorted rules.
    pub fn iter(&self) -> impl Iterator<Item = (RuleCategory, &BTreeSet<ClassifiedRule>)> {
        self.categories
            .iter()
            .filter(|(_, rules)| !rules.is_empty())
            .map(|(category, rules)| (*category, rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;

    fn rule(line: &str) -> ClassifiedRule {
        classify(line).unwrap()
    }

    #[test]
    fn test_insert_deduplicates() {
        let mut set = RuleSet::new("test");
        assert!(set.insert(rule("DOMAIN,t.me")));
        assert!(!set.insert(rule("DOMAIN,t.me")));
        assert_eq!(set.total(), 1);
    }

    #[test]
    fn test_dedup_key_includes_modifier() {
        let mut set = RuleSet::new("test");
        assert!(set.insert(rule("IP-ASN,44907")));
        assert!(set.insert(rule("IP-ASN,44907,no-resolve")));
        assert_eq!(set.count(RuleCategory::IpAsn), 2);
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let mut set = RuleSet::new("test");
        set.insert(rule("DOMAIN,T.ME"));
        set.insert(rule("DOMAIN,t.me"));
        assert_eq!(set.total(), 2);
    }

    #[test]
    fn test_same_value_different_category_kept() {
        let mut set = RuleSet::new("test");
        set.insert(rule("DOMAIN,t.me"));
        set.insert(rule("DOMAIN-SUFFIX,t.me"));
        assert_eq!(set.total(), 2);
        assert_eq!(set.count(RuleCategory::Domain), 1);
        assert_eq!(set.count(RuleCategory::DomainSuffix), 1);
    }

    #[test]
    fn test_iter_category_order() {
        let mut set = RuleSet::new("test");
        set.insert(rule("PROCESS-NAME,Telegram"));
        set.insert(rule("IP-CIDR,91.108.4.0/24"));
        set.insert(rule("DOMAIN,t.me"));

        let order: Vec<RuleCategory> = set.iter().map(|(c, _)| c).collect();
        assert_eq!(
            order,
            [
                RuleCategory::Domain,
                RuleCategory::IpCidr,
                RuleCategory::ProcessName
            ]
        );
    }

    #[test]
    fn test_rules_sorted_within_category() {
        let mut set = RuleSet::new("test");
        set.insert(rule("DOMAIN,z.example.org"));
        set.insert(rule("DOMAIN,a.example.org"));
        set.insert(rule("DOMAIN,m.example.org"));

        let (_, rules) = set.iter().next().unwrap();
        let values: Vec<&str> = rules.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, ["a.example.org", "m.example.org", "z.example.org"]);
    }

    #[test]
    fn test_total_matches_category_sum() {
        let mut set = RuleSet::new("test");
        set.extend([
            rule("DOMAIN,t.me"),
            rule("DOMAIN,api.telegram.org"),
            rule("IP-CIDR,91.108.4.0/24"),
        ]);
        let sum: usize = RuleCategory::ALL.iter().map(|c| set.count(*c)).sum();
        assert_eq!(set.total(), sum);
        assert_eq!(set.total(), 3);
    }

    #[test]
    fn test_empty_set() {
        let set = RuleSet::new("empty");
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn rule_strategy() -> impl Strategy<Value = ClassifiedRule> {
        (
            0usize..RuleCategory::ALL.len(),
            "[a-z]{1,8}\\.[a-z]{2,4}",
            prop::option::of(Just("no-resolve".to_string())),
        )
            .prop_map(|(i, value, modifier)| ClassifiedRule {
                category: RuleCategory::ALL[i],
                value,
                modifier,
            })
    }

    proptest! {
        /// No duplicate (category, value, modifier) survives aggregation.
        #[test]
        fn prop_no_duplicates(rules in prop::collection::vec(rule_strategy(), 0..100)) {
            let mut set = RuleSet::new("prop");
            set.extend(rules.clone());

            let mut seen = std::collections::HashSet::new();
            for (_, group) in set.iter() {
                for rule in group {
                    prop_assert!(seen.insert(rule.clone()));
                }
            }
        }

        /// Total always equals the sum of per-category counts.
        #[test]
        fn prop_total_is_category_sum(rules in prop::collection::vec(rule_strategy(), 0..100)) {
            let mut set = RuleSet::new("prop");
            set.extend(rules);
            let sum: usize = RuleCategory::ALL.iter().map(|c| set.count(*c)).sum();
            prop_assert_eq!(set.total(), sum);
        }

        /// Aggregation never grows beyond the input size.
        #[test]
        fn prop_size_bounded_by_input(rules in prop::collection::vec(rule_strategy(), 0..100)) {
            let input_len = rules.len();
            let mut set = RuleSet::new("prop");
            set.extend(rules);
            prop_assert!(set.total() <= input_len);
        }

        /// Insertion order never changes the final contents.
        #[test]
        fn prop_order_independent(rules in prop::collection::vec(rule_strategy(), 0..50)) {
            let mut forward = RuleSet::new("prop");
            forward.extend(rules.clone());

            let mut reversed = RuleSet::new("prop");
            reversed.extend(rules.into_iter().rev());

            let a: Vec<_> = forward.iter().flat_map(|(_, g)| g.iter().cloned()).collect();
            let b: Vec<_> = reversed.iter().flat_map(|(_, g)| g.iter().cloned()).collect();
            prop_assert_eq!(a, b);
        }
    }
}
