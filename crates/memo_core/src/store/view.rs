//! Pure derivations over the cached memo collection.
//!
//! Nothing here is stored; callers recompute views from the canonical list.

use crate::model::memo::{Memo, MemoCategory, MemoValidationError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const ALL_CATEGORIES: &str = "all";

/// Category selection for the list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(MemoCategory),
}

impl CategoryFilter {
    pub fn matches(self, category: MemoCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == category,
        }
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL_CATEGORIES),
            Self::Only(category) => write!(f, "{category}"),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = MemoValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == ALL_CATEGORIES {
            return Ok(Self::All);
        }
        value.parse().map(Self::Only)
    }
}

/// Search text plus category filter; both apply when both are active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoQuery {
    pub search: String,
    pub category: CategoryFilter,
}

impl MemoQuery {
    /// Returns whether `memo` belongs in the filtered view.
    ///
    /// A blank search matches everything. Otherwise the lowercased search
    /// text must occur in the title, the content, or any tag.
    pub fn matches(&self, memo: &Memo) -> bool {
        if !self.category.matches(memo.category) {
            return false;
        }
        if self.search.trim().is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        memo.title.to_lowercase().contains(&needle)
            || memo.content.to_lowercase().contains(&needle)
            || memo
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
    }
}

/// Aggregate counters shown next to the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoStats {
    /// Size of the whole collection.
    pub total: usize,
    /// Counts over the whole collection; categories with no memos are absent.
    pub by_category: BTreeMap<MemoCategory, usize>,
    /// Size of the filtered view.
    pub filtered: usize,
}

/// Filters `memos`, keeping collection order.
pub fn filter_memos<'a>(memos: &'a [Memo], query: &MemoQuery) -> Vec<&'a Memo> {
    memos.iter().filter(|memo| query.matches(memo)).collect()
}

/// Computes stats for the whole collection and a filtered view size.
pub fn memo_stats(memos: &[Memo], filtered: usize) -> MemoStats {
    let mut by_category = BTreeMap::new();
    for memo in memos {
        *by_category.entry(memo.category).or_insert(0) += 1;
    }
    MemoStats {
        total: memos.len(),
        by_category,
        filtered,
    }
}

#[cfg(test)]
mod tests {
    use super::{filter_memos, memo_stats, CategoryFilter, MemoQuery};
    use crate::model::memo::{Memo, MemoCategory};
    use uuid::Uuid;

    fn memo(title: &str, category: MemoCategory, tags: &[&str]) -> Memo {
        Memo {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: format!("{title} body"),
            category,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            summary: None,
            suggested_tags: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn titles(memos: Vec<&Memo>) -> Vec<&str> {
        memos.into_iter().map(|memo| memo.title.as_str()).collect()
    }

    #[test]
    fn search_is_case_insensitive_across_categories() {
        let memos = vec![
            memo("Groceries", MemoCategory::Personal, &[]),
            memo("Work plan", MemoCategory::Work, &[]),
            memo("Groceries part 2", MemoCategory::Other, &[]),
        ];
        for search in ["grocer", "GROCER", "GrOcEr"] {
            let query = MemoQuery {
                search: search.to_string(),
                category: CategoryFilter::All,
            };
            assert_eq!(
                titles(filter_memos(&memos, &query)),
                vec!["Groceries", "Groceries part 2"]
            );
        }
    }

    #[test]
    fn search_matches_tags_and_content() {
        let memos = vec![
            memo("alpha", MemoCategory::Idea, &["Rust"]),
            memo("beta", MemoCategory::Idea, &[]),
        ];
        let by_tag = MemoQuery {
            search: "rust".to_string(),
            ..MemoQuery::default()
        };
        assert_eq!(titles(filter_memos(&memos, &by_tag)), vec!["alpha"]);

        let by_content = MemoQuery {
            search: "BETA BODY".to_string(),
            ..MemoQuery::default()
        };
        assert_eq!(titles(filter_memos(&memos, &by_content)), vec!["beta"]);
    }

    #[test]
    fn category_filter_all_vs_exact() {
        let memos = vec![
            memo("a", MemoCategory::Work, &[]),
            memo("b", MemoCategory::Study, &[]),
        ];
        assert_eq!(filter_memos(&memos, &MemoQuery::default()).len(), 2);

        let only_work = MemoQuery {
            category: CategoryFilter::Only(MemoCategory::Work),
            ..MemoQuery::default()
        };
        assert_eq!(titles(filter_memos(&memos, &only_work)), vec!["a"]);
    }

    #[test]
    fn filters_compose() {
        let memos = vec![
            memo("groceries", MemoCategory::Work, &[]),
            memo("groceries", MemoCategory::Personal, &[]),
            memo("plan", MemoCategory::Personal, &[]),
        ];
        let query = MemoQuery {
            search: "groc".to_string(),
            category: CategoryFilter::Only(MemoCategory::Personal),
        };
        let filtered = filter_memos(&memos, &query);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].category, MemoCategory::Personal);
    }

    #[test]
    fn blank_search_matches_everything() {
        let memos = vec![memo("a", MemoCategory::Work, &[])];
        let query = MemoQuery {
            search: "   ".to_string(),
            ..MemoQuery::default()
        };
        assert_eq!(filter_memos(&memos, &query).len(), 1);
    }

    #[test]
    fn category_filter_parses_all_and_names() {
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "idea".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Only(MemoCategory::Idea))
        );
        assert!("everything".parse::<CategoryFilter>().is_err());
        assert_eq!(CategoryFilter::Only(MemoCategory::Work).to_string(), "work");
    }

    #[test]
    fn stats_count_whole_collection() {
        let memos = vec![
            memo("a", MemoCategory::Work, &[]),
            memo("b", MemoCategory::Work, &[]),
            memo("c", MemoCategory::Idea, &[]),
        ];
        let stats = memo_stats(&memos, 1);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.filtered, 1);
        assert_eq!(stats.by_category.get(&MemoCategory::Work), Some(&2));
        assert_eq!(stats.by_category.get(&MemoCategory::Idea), Some(&1));
        assert_eq!(stats.by_category.get(&MemoCategory::Study), None);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["byCategory"]["work"], 2);
    }
}
