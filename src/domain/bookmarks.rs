use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

// Persisted selection value meaning "no category filter"
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(String);

impl LinkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LinkId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// Category model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

// Link model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: LinkId,
    pub category_id: CategoryId,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub desc: String,
    pub created_at: i64,
}

impl Link {
    /// Case-insensitive substring match over name, desc and url.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(needle)
            || self.desc.to_lowercase().contains(needle)
            || self.url.to_lowercase().contains(needle)
    }
}

/// Which links the view is scoped to. Persisted as a plain string: the
/// `"all"` sentinel or a category id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    #[default]
    All,
    Category(CategoryId),
}

impl Selection {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn category_id(&self) -> Option<&CategoryId> {
        match self {
            Selection::All => None,
            Selection::Category(id) => Some(id),
        }
    }

    pub fn is_category(&self, id: &CategoryId) -> bool {
        self.category_id() == Some(id)
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        if value.is_empty() || value == ALL_CATEGORIES {
            Selection::All
        } else {
            Selection::Category(CategoryId(value))
        }
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        Selection::from(value.to_string())
    }
}

impl From<CategoryId> for Selection {
    fn from(id: CategoryId) -> Self {
        Selection::Category(id)
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::All => ALL_CATEGORIES.to_string(),
            Selection::Category(id) => id.0,
        }
    }
}

impl Display for Selection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::All => f.write_str(ALL_CATEGORIES),
            Selection::Category(id) => f.write_str(id.as_str()),
        }
    }
}

// Complete persisted state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub selected_category_id: Selection,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.links.is_empty()
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    pub fn link(&self, id: &LinkId) -> Option<&Link> {
        self.links.iter().find(|l| &l.id == id)
    }

    pub fn count_links_in(&self, id: &CategoryId) -> usize {
        self.links.iter().filter(|l| &l.category_id == id).count()
    }

    /// Whether a category other than `except` already uses `name`,
    /// compared case-insensitively.
    pub fn name_taken(&self, name: &str, except: Option<&CategoryId>) -> bool {
        let wanted = name.to_lowercase();
        self.categories
            .iter()
            .any(|c| Some(&c.id) != except && c.name.to_lowercase() == wanted)
    }

    /// Links in scope for the current selection, newest first. Ties keep
    /// insertion order.
    pub fn scoped_links(&self) -> Vec<Link> {
        let mut links: Vec<Link> = match &self.selected_category_id {
            Selection::All => self.links.clone(),
            Selection::Category(id) => self
                .links
                .iter()
                .filter(|l| &l.category_id == id)
                .cloned()
                .collect(),
        };
        // sort_by is stable
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        links
    }

    /// Points a selection naming a missing category back at "all". Returns
    /// whether the selection changed.
    pub fn reset_dangling_selection(&mut self) -> bool {
        let dangling = match &self.selected_category_id {
            Selection::Category(id) => self.category(id).is_none(),
            Selection::All => false,
        };
        if dangling {
            self.selected_category_id = Selection::All;
        }
        dangling
    }

    /// Links whose category no longer exists.
    pub fn orphan_count(&self) -> usize {
        self.links
            .iter()
            .filter(|l| self.category(&l.category_id).is_none())
            .count()
    }
}

// Link dialog fields, as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDraft {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub desc: String,
}

impl LinkDraft {
    pub fn new(name: impl Into<String>, url: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            desc: desc.into(),
        }
    }
}

impl From<&Link> for LinkDraft {
    fn from(link: &Link) -> Self {
        Self {
            name: link.name.clone(),
            url: link.url.clone(),
            desc: link.desc.clone(),
        }
    }
}

/// Trims the url and prefixes `https://` unless it already starts with an
/// `http://` or `https://` scheme (any case).
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

fn has_http_scheme(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn link(id: &str, category: &str, created_at: i64) -> Link {
        Link {
            id: LinkId::new(id),
            category_id: CategoryId::new(category),
            name: format!("name-{id}"),
            url: format!("https://{id}.example"),
            desc: String::new(),
            created_at,
        }
    }

    #[test]
    fn normalize_adds_https_when_scheme_missing() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("  example.com  "), "https://example.com");
        assert_eq!(normalize_url("ftp://host"), "https://ftp://host");
    }

    #[test]
    fn normalize_keeps_existing_scheme_in_any_case() {
        assert_eq!(normalize_url("http://a.b"), "http://a.b");
        assert_eq!(normalize_url("HTTPS://A.B"), "HTTPS://A.B");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in ".{0,40}") {
            let once = normalize_url(&raw);
            prop_assert_eq!(normalize_url(&once), once);
        }
    }

    #[test]
    fn selection_round_trips_through_its_string_form() {
        let all: Selection = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(all, Selection::All);
        let cat: Selection = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(cat, Selection::Category(CategoryId::new("abc")));
        assert_eq!(serde_json::to_string(&Selection::All).unwrap(), "\"all\"");
    }

    #[test]
    fn link_serializes_with_camel_case_fields() {
        let value = serde_json::to_value(link("l1", "c1", 5)).unwrap();
        assert_eq!(value["categoryId"], "c1");
        assert_eq!(value["createdAt"], 5);
    }

    #[test]
    fn scoped_links_sort_newest_first_and_keep_ties_in_order() {
        let snapshot = Snapshot {
            categories: vec![],
            links: vec![
                link("a", "c1", 10),
                link("b", "c1", 20),
                link("c", "c2", 10),
                link("d", "c1", 10),
            ],
            selected_category_id: Selection::All,
        };
        let ids: Vec<_> = snapshot
            .scoped_links()
            .into_iter()
            .map(|l| l.id.to_string())
            .collect();
        assert_eq!(ids, ["b", "a", "c", "d"]);
    }

    #[test]
    fn name_taken_ignores_case_and_the_excepted_category() {
        let snapshot = Snapshot {
            categories: vec![Category {
                id: CategoryId::new("c1"),
                name: "Dev".to_string(),
            }],
            ..Snapshot::default()
        };
        assert!(snapshot.name_taken("dEV", None));
        assert!(!snapshot.name_taken("dev", Some(&CategoryId::new("c1"))));
        assert!(!snapshot.name_taken("News", None));
    }

    #[test]
    fn dangling_selection_resets_and_orphans_are_counted_not_dropped() {
        let mut snapshot = Snapshot {
            categories: vec![Category {
                id: CategoryId::new("c1"),
                name: "Dev".to_string(),
            }],
            links: vec![link("a", "c1", 1), link("b", "gone", 2)],
            selected_category_id: Selection::from("gone"),
        };
        assert!(snapshot.reset_dangling_selection());
        assert!(snapshot.selected_category_id.is_all());
        assert!(!snapshot.reset_dangling_selection());
        assert_eq!(snapshot.orphan_count(), 1);
        assert_eq!(snapshot.links.len(), 2);
    }
}
