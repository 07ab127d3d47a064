use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKey {
    Data,
    Model,
    Algorithm,
    Hyperparameter,
    Evaluation,
    Deployment,
    Syntax,
    Runtime,
}

impl CategoryKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Model => "model",
            Self::Algorithm => "algorithm",
            Self::Hyperparameter => "hyperparameter",
            Self::Evaluation => "evaluation",
            Self::Deployment => "deployment",
            Self::Syntax => "syntax",
            Self::Runtime => "runtime",
        }
    }
}

/// Predicate over a finding's message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "keywords", rename_all = "snake_case")]
pub enum Matcher {
    /// Case-insensitive substring match against any of the keywords.
    AnyKeyword(&'static [&'static str]),
    /// Accepts every message; only valid as the last rule.
    CatchAll,
}

impl Matcher {
    #[must_use]
    pub fn accepts(&self, message: &str) -> bool {
        match self {
            Self::CatchAll => true,
            Self::AnyKeyword(keywords) => {
                let lowered = message.to_lowercase();
                keywords.iter().any(|needle| lowered.contains(needle))
            }
        }
    }
}

/// Static description of one display bucket.
///
/// `match_order` decides which rule claims a finding first; `display_priority` decides where the
/// section is rendered. They are independent fields: reordering one never moves the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub key: CategoryKey,
    pub title: &'static str,
    pub match_order: u8,
    pub display_priority: u8,
    pub matcher: Matcher,
}

pub const CATEGORIES: [Category; 8] = [
    Category {
        key: CategoryKey::Data,
        title: "Data-Related Errors",
        match_order: 1,
        display_priority: 1,
        matcher: Matcher::AnyKeyword(&[
            "data", "input", "output", "format", "missing", "null", "nan",
        ]),
    },
    Category {
        key: CategoryKey::Model,
        title: "Model-Related Errors",
        match_order: 2,
        display_priority: 2,
        matcher: Matcher::AnyKeyword(&["model", "prediction", "inference", "weights", "bias"]),
    },
    Category {
        key: CategoryKey::Algorithm,
        title: "Algorithm/Training Errors",
        match_order: 3,
        display_priority: 3,
        matcher: Matcher::AnyKeyword(&["algorithm", "training", "learning", "gradient", "loss"]),
    },
    Category {
        key: CategoryKey::Hyperparameter,
        title: "Hyperparameter Tuning Errors",
        match_order: 4,
        display_priority: 4,
        matcher: Matcher::AnyKeyword(&["parameter", "hyperparameter", "tuning", "optimization"]),
    },
    Category {
        key: CategoryKey::Evaluation,
        title: "Evaluation and Testing Errors",
        match_order: 5,
        display_priority: 5,
        matcher: Matcher::AnyKeyword(&[
            "evaluation",
            "testing",
            "validation",
            "accuracy",
            "metrics",
        ]),
    },
    Category {
        key: CategoryKey::Deployment,
        title: "Deployment Errors",
        match_order: 6,
        display_priority: 6,
        matcher: Matcher::AnyKeyword(&["deploy", "production", "service", "api", "endpoint"]),
    },
    Category {
        key: CategoryKey::Syntax,
        title: "Code and Syntax Errors",
        match_order: 7,
        display_priority: 7,
        matcher: Matcher::AnyKeyword(&["syntax", "indent", "import", "definition", "naming"]),
    },
    Category {
        key: CategoryKey::Runtime,
        title: "Runtime Errors",
        match_order: 8,
        display_priority: 8,
        matcher: Matcher::CatchAll,
    },
];

#[must_use]
pub fn category(key: CategoryKey) -> &'static Category {
    CATEGORIES
        .iter()
        .find(|c| c.key == key)
        .unwrap_or(&CATEGORIES[CATEGORIES.len() - 1])
}
