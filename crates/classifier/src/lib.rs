//! # mlreview classifier
//!
//! Buckets analysis findings into the eight display categories.
//!
//! ```text
//! Finding[]
//!     │
//!     └──> rule chain (match_order)
//!            data → model → algorithm → hyperparameter
//!            → evaluation → deployment → syntax → runtime (catch-all)
//!                 │
//!                 └──> ClassifiedFindings ──> sections() by display_priority
//! ```
//!
//! Every finding lands in exactly one bucket; the first rule whose keywords appear in the
//! message claims it.

mod category;
mod classifier;

pub use category::{category, Category, CategoryKey, Matcher, CATEGORIES};
pub use classifier::{classify, ClassifiedFindings, IssueClassifier, Rule};
