use crate::category::{category, Category, CategoryKey, Matcher, CATEGORIES};
use mlreview_protocol::Finding;
use std::collections::BTreeMap;

/// One `(predicate, category)` pair of the evaluation chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub key: CategoryKey,
    pub matcher: Matcher,
}

/// First-match-wins classifier over an ordered rule list.
#[derive(Debug, Clone)]
pub struct IssueClassifier {
    rules: Vec<Rule>,
    fallback: CategoryKey,
}

impl Default for IssueClassifier {
    fn default() -> Self {
        Self::standard()
    }
}

impl IssueClassifier {
    /// Rules taken from [`CATEGORIES`] in ascending `match_order`.
    #[must_use]
    pub fn standard() -> Self {
        let mut table: Vec<&Category> = CATEGORIES.iter().collect();
        table.sort_by_key(|c| c.match_order);
        Self::from_categories(table)
    }

    fn from_categories<'a>(table: impl IntoIterator<Item = &'a Category>) -> Self {
        let mut rules = Vec::new();
        let mut fallback = CategoryKey::Runtime;
        for cat in table {
            match cat.matcher {
                Matcher::CatchAll => fallback = cat.key,
                matcher => rules.push(Rule {
                    key: cat.key,
                    matcher,
                }),
            }
        }
        Self { rules, fallback }
    }

    /// The evaluation chain, in the order rules are tried.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub const fn fallback(&self) -> CategoryKey {
        self.fallback
    }

    #[must_use]
    pub fn category_for(&self, message: &str) -> CategoryKey {
        self.rules
            .iter()
            .find(|rule| rule.matcher.accepts(message))
            .map_or(self.fallback, |rule| rule.key)
    }

    #[must_use]
    pub fn classify(&self, findings: &[Finding]) -> ClassifiedFindings {
        let mut out = ClassifiedFindings::empty();
        for finding in findings {
            let key = self.category_for(&finding.message);
            out.buckets.entry(key).or_default().push(finding.clone());
        }
        out
    }
}

/// Findings bucketed by category, input order preserved within each bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedFindings {
    buckets: BTreeMap<CategoryKey, Vec<Finding>>,
}

impl ClassifiedFindings {
    fn empty() -> Self {
        Self {
            buckets: CATEGORIES.iter().map(|c| (c.key, Vec::new())).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, key: CategoryKey) -> &[Finding] {
        self.buckets.get(&key).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Non-empty buckets sorted by ascending display priority.
    #[must_use]
    pub fn sections(&self) -> Vec<(&'static Category, &[Finding])> {
        let mut sections: Vec<_> = self
            .buckets
            .iter()
            .filter(|(_, findings)| !findings.is_empty())
            .map(|(key, findings)| (category(*key), findings.as_slice()))
            .collect();
        sections.sort_by_key(|(cat, _)| cat.display_priority);
        sections
    }
}

/// Classify with the standard rule chain.
#[must_use]
pub fn classify(findings: &[Finding]) -> ClassifiedFindings {
    IssueClassifier::standard().classify(findings)
}
