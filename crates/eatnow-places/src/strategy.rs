//! Ordered search strategies tried at each radius.
//!
//! Each list runs from most specific to broadest: exact category (plus
//! keyword), free-text query, query with a generic suffix, a wider category
//! union, and finally the same category without the open-now filter.

use std::fmt;

/// Primary category filter.
pub const RESTAURANT_CATEGORY: &str = "restaurant";
/// Wider category union used once the restaurant filter comes back empty.
pub const BROAD_CATEGORIES: &str = "food|meal_takeaway|cafe";
/// Free-text fallback when no keyword was given ("restaurant|snack|brunch").
pub const GENERIC_TEXT_QUERY: &str = "餐廳|小吃|早午餐";
/// Appended to a keyword for the suffixed text query (" restaurant").
pub const RESTAURANT_SUFFIX: &str = " 餐廳";

/// Parameters for the proximity (`nearbysearch`) endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProximityQuery {
    /// One category or a `|`-joined union.
    pub category: String,
    pub open_now: bool,
    pub keyword: Option<String>,
}

/// Parameters for the free-text (`textsearch`) endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery {
    pub query: String,
    pub open_now: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStrategy {
    Proximity(ProximityQuery),
    Text(TextQuery),
}

impl SearchStrategy {
    fn proximity(category: &str, open_now: bool, keyword: Option<&str>) -> Self {
        Self::Proximity(ProximityQuery {
            category: category.to_owned(),
            open_now,
            keyword: keyword.map(str::to_owned),
        })
    }

    fn text(query: String, open_now: bool) -> Self {
        Self::Text(TextQuery { query, open_now })
    }

    #[must_use]
    pub fn open_now(&self) -> bool {
        match self {
            Self::Proximity(q) => q.open_now,
            Self::Text(q) => q.open_now,
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.open_now() { "open" } else { "any" };
        match self {
            Self::Proximity(q) => match &q.keyword {
                Some(kw) => write!(f, "nearby[{}; kw={kw}; {open}]", q.category),
                None => write!(f, "nearby[{}; {open}]", q.category),
            },
            Self::Text(q) => write!(f, "text[{}; {open}]", q.query),
        }
    }
}

/// Returns the strategies to try, in priority order.
///
/// `keyword` is trimmed first; a blank keyword counts as no keyword.
#[must_use]
pub fn strategies_for(keyword: Option<&str>) -> Vec<SearchStrategy> {
    match keyword.map(str::trim).filter(|kw| !kw.is_empty()) {
        None => vec![
            SearchStrategy::proximity(RESTAURANT_CATEGORY, true, None),
            SearchStrategy::proximity(BROAD_CATEGORIES, true, None),
            SearchStrategy::text(GENERIC_TEXT_QUERY.to_owned(), true),
            SearchStrategy::proximity(RESTAURANT_CATEGORY, false, None),
        ],
        Some(kw) => vec![
            SearchStrategy::proximity(RESTAURANT_CATEGORY, true, Some(kw)),
            SearchStrategy::text(kw.to_owned(), true),
            SearchStrategy::text(format!("{kw}{RESTAURANT_SUFFIX}"), true),
            SearchStrategy::proximity(BROAD_CATEGORIES, true, Some(kw)),
            SearchStrategy::proximity(RESTAURANT_CATEGORY, false, Some(kw)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_keyword_yields_four_strategies_in_order() {
        let strategies = strategies_for(None);
        assert_eq!(
            strategies,
            vec![
                SearchStrategy::Proximity(ProximityQuery {
                    category: "restaurant".into(),
                    open_now: true,
                    keyword: None,
                }),
                SearchStrategy::Proximity(ProximityQuery {
                    category: "food|meal_takeaway|cafe".into(),
                    open_now: true,
                    keyword: None,
                }),
                SearchStrategy::Text(TextQuery {
                    query: "餐廳|小吃|早午餐".into(),
                    open_now: true,
                }),
                SearchStrategy::Proximity(ProximityQuery {
                    category: "restaurant".into(),
                    open_now: false,
                    keyword: None,
                }),
            ]
        );
    }

    #[test]
    fn keyword_yields_five_strategies_in_order() {
        let strategies = strategies_for(Some("  拉麵 "));
        assert_eq!(strategies.len(), 5);
        assert_eq!(
            strategies[0],
            SearchStrategy::Proximity(ProximityQuery {
                category: "restaurant".into(),
                open_now: true,
                keyword: Some("拉麵".into()),
            })
        );
        assert_eq!(
            strategies[1],
            SearchStrategy::Text(TextQuery {
                query: "拉麵".into(),
                open_now: true,
            })
        );
        assert_eq!(
            strategies[2],
            SearchStrategy::Text(TextQuery {
                query: "拉麵 餐廳".into(),
                open_now: true,
            })
        );
        assert_eq!(
            strategies[3],
            SearchStrategy::Proximity(ProximityQuery {
                category: BROAD_CATEGORIES.into(),
                open_now: true,
                keyword: Some("拉麵".into()),
            })
        );
        assert_eq!(
            strategies[4],
            SearchStrategy::Proximity(ProximityQuery {
                category: "restaurant".into(),
                open_now: false,
                keyword: Some("拉麵".into()),
            })
        );
    }

    #[test]
    fn blank_keyword_is_treated_as_absent() {
        assert_eq!(strategies_for(Some("   ")), strategies_for(None));
        assert_eq!(strategies_for(Some("")), strategies_for(None));
    }

    #[test]
    fn only_the_last_strategy_relaxes_open_now() {
        for kw in [None, Some("pho")] {
            let strategies = strategies_for(kw);
            let (last, rest) = strategies.split_last().unwrap();
            assert!(!last.open_now());
            assert!(rest.iter().all(SearchStrategy::open_now));
        }
    }

    #[test]
    fn display_labels_are_readable() {
        let strategies = strategies_for(Some("pho"));
        assert_eq!(strategies[0].to_string(), "nearby[restaurant; kw=pho; open]");
        assert_eq!(strategies[2].to_string(), "text[pho 餐廳; open]");
        assert_eq!(
            strategies_for(None)[3].to_string(),
            "nearby[restaurant; any]"
        );
    }
}
