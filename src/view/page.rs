use serde::Serialize;

use crate::domain::bookmarks::{Link, LinkId, Selection, Snapshot};

pub const ALL_LINKS_LABEL: &str = "All Links";
pub const UNKNOWN_CATEGORY_LABEL: &str = "Unknown";
pub const EMPTY_STATE_MESSAGE: &str = "No links yet.";
const EDIT_DISABLED_HINT: &str = "Select a category to rename/delete";
const EDIT_ENABLED_HINT: &str = "Rename/Delete current category";

/// Receives a freshly projected page after state changes.
pub trait ViewSink {
    fn render(&mut self, page: &PageView);
}

// Keeps every rendered page, newest last
impl ViewSink for Vec<PageView> {
    fn render(&mut self, page: &PageView) {
        self.push(page.clone());
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SidebarItem {
    pub selection: Selection,
    pub name: String,
    pub count: usize,
    pub active: bool,
    /// Label of the trash button; the "All Links" entry has none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_label: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HeaderView {
    pub title: String,
    pub edit_enabled: bool,
    pub edit_hint: &'static str,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkCard {
    pub id: LinkId,
    pub name: String,
    pub desc: String,
    pub url: String,
    pub edit_label: String,
    pub delete_label: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub sidebar: Vec<SidebarItem>,
    pub header: HeaderView,
    pub cards: Vec<LinkCard>,
    pub link_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

/// Projects the snapshot into a page. `links_override` replaces the scoped
/// list, which is how live search shows its matches.
pub fn render_page(snapshot: &Snapshot, links_override: Option<&[Link]>) -> PageView {
    let cards = match links_override {
        Some(links) => render_cards(links),
        None => render_cards(&snapshot.scoped_links()),
    };
    let link_count = cards.len();
    PageView {
        sidebar: render_sidebar(snapshot),
        header: render_header(snapshot),
        empty_message: cards.is_empty().then_some(EMPTY_STATE_MESSAGE),
        cards,
        link_count,
    }
}

pub fn render_sidebar(snapshot: &Snapshot) -> Vec<SidebarItem> {
    let selected = &snapshot.selected_category_id;
    let mut items = Vec::with_capacity(snapshot.categories.len() + 1);
    items.push(SidebarItem {
        selection: Selection::All,
        name: ALL_LINKS_LABEL.to_string(),
        count: snapshot.links.len(),
        active: selected.is_all(),
        delete_label: None,
    });
    for category in &snapshot.categories {
        items.push(SidebarItem {
            selection: Selection::Category(category.id.clone()),
            name: category.name.clone(),
            count: snapshot.count_links_in(&category.id),
            active: selected.is_category(&category.id),
            delete_label: Some(format!("Delete category {}", category.name)),
        });
    }
    items
}

pub fn render_header(snapshot: &Snapshot) -> HeaderView {
    match &snapshot.selected_category_id {
        Selection::All => HeaderView {
            title: ALL_LINKS_LABEL.to_string(),
            edit_enabled: false,
            edit_hint: EDIT_DISABLED_HINT,
        },
        Selection::Category(id) => HeaderView {
            title: snapshot
                .category(id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNKNOWN_CATEGORY_LABEL.to_string()),
            edit_enabled: true,
            edit_hint: EDIT_ENABLED_HINT,
        },
    }
}

pub fn render_cards(links: &[Link]) -> Vec<LinkCard> {
    links
        .iter()
        .map(|link| LinkCard {
            id: link.id.clone(),
            name: link.name.clone(),
            desc: link.desc.clone(),
            url: link.url.clone(),
            edit_label: format!("Edit {}", link.name),
            delete_label: format!("Delete {}", link.name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bookmarks::{Category, CategoryId};

    fn snapshot() -> Snapshot {
        let dev = CategoryId::new("c1");
        Snapshot {
            categories: vec![
                Category {
                    id: dev.clone(),
                    name: "Dev".to_string(),
                },
                Category {
                    id: CategoryId::new("c2"),
                    name: "News".to_string(),
                },
            ],
            links: vec![
                Link {
                    id: LinkId::new("l1"),
                    category_id: dev.clone(),
                    name: "Docs".to_string(),
                    url: "https://docs.rs".to_string(),
                    desc: String::new(),
                    created_at: 1,
                },
                Link {
                    id: LinkId::new("l2"),
                    category_id: dev,
                    name: "Crates".to_string(),
                    url: "https://crates.io".to_string(),
                    desc: String::new(),
                    created_at: 2,
                },
            ],
            selected_category_id: Selection::from("c1"),
        }
    }

    #[test]
    fn sidebar_has_all_links_aggregate_and_counts() {
        let items = render_sidebar(&snapshot());
        let summary: Vec<_> = items
            .iter()
            .map(|i| (i.name.as_str(), i.count, i.active))
            .collect();
        assert_eq!(
            summary,
            [("All Links", 2, false), ("Dev", 2, true), ("News", 0, false)]
        );
        assert_eq!(items[1].delete_label.as_deref(), Some("Delete category Dev"));
    }

    #[test]
    fn header_follows_selection() {
        let mut snap = snapshot();
        assert_eq!(render_header(&snap).title, "Dev");
        assert!(render_header(&snap).edit_enabled);
        snap.selected_category_id = Selection::All;
        let header = render_header(&snap);
        assert_eq!(header.title, "All Links");
        assert!(!header.edit_enabled);
        snap.selected_category_id = Selection::from("ghost");
        assert_eq!(render_header(&snap).title, "Unknown");
    }

    #[test]
    fn cards_are_newest_first_with_labels() {
        let page = render_page(&snapshot(), None);
        let names: Vec<_> = page.cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Crates", "Docs"]);
        assert_eq!(page.link_count, 2);
        assert_eq!(page.cards[0].edit_label, "Edit Crates");
        assert_eq!(page.empty_message, None);
    }

    #[test]
    fn empty_list_shows_message() {
        let mut snap = snapshot();
        snap.selected_category_id = Selection::from("c2");
        let page = render_page(&snap, None);
        assert!(page.cards.is_empty());
        assert_eq!(page.link_count, 0);
        assert_eq!(page.empty_message, Some(EMPTY_STATE_MESSAGE));
    }

    #[test]
    fn override_replaces_scoped_list() {
        let snap = snapshot();
        let page = render_page(&snap, Some(&snap.links[..1]));
        assert_eq!(page.cards.len(), 1);
        assert_eq!(page.sidebar[0].count, 2);
    }
}
