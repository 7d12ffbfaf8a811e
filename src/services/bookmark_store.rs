use std::time::Instant;

use tracing::{info, span, warn, Level};
use uuid::Uuid;

use crate::domain::bookmarks::{
    normalize_url, Category, CategoryId, Link, LinkDraft, LinkId, Selection, Snapshot,
};
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::ids::{IdGenerator, UuidGenerator};
use crate::error::StoreError;
use crate::repo::snapshot_repo::SnapshotRepo;
use crate::services::seed;

/// What a category deletion took with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRemoval {
    pub category: Category,
    pub removed_links: usize,
}

/// Owner of the canonical snapshot.
///
/// Every mutation validates against the current snapshot, builds the next
/// snapshot, saves it through the repo and only then installs it. A rejected
/// mutation or a failed save leaves the in-memory state untouched.
pub struct BookmarkStore<R, G = UuidGenerator, C = SystemClock> {
    repo: R,
    ids: G,
    clock: C,
    snapshot: Snapshot,
}

impl<R: SnapshotRepo> BookmarkStore<R> {
    pub fn open_default(repo: R) -> Result<Self, StoreError> {
        Self::open(repo, UuidGenerator, SystemClock)
    }
}

impl<R, G, C> BookmarkStore<R, G, C>
where
    R: SnapshotRepo,
    G: IdGenerator,
    C: Clock,
{
    /// Loads the persisted snapshot, seeding demo content when storage holds
    /// neither categories nor links, and writes the result back.
    pub fn open(repo: R, ids: G, clock: C) -> Result<Self, StoreError> {
        let op_id = Uuid::new_v4().to_string();
        let span = span!(Level::INFO, "bookmarks.open", op_id = op_id.as_str());
        let _enter = span.enter();

        let mut snapshot = repo.load();
        if snapshot.is_empty() {
            snapshot = seed::demo_snapshot(&ids, clock.now_millis());
            info!(target: "bookmarks", "seeded demo content: categories={}, links={}", snapshot.categories.len(), snapshot.links.len());
        } else {
            if snapshot.reset_dangling_selection() {
                warn!(target: "bookmarks", "selected category is missing; selection reset to all");
            }
            let orphans = snapshot.orphan_count();
            if orphans > 0 {
                warn!(target: "bookmarks", "links with missing categories kept as loaded: count={}", orphans);
            }
        }

        let mut store = Self {
            repo,
            ids,
            clock,
            snapshot: Snapshot::default(),
        };
        store.commit(snapshot)?;
        info!(
            target: "bookmarks",
            "store opened: categories={}, links={}, selection={}",
            store.snapshot.categories.len(),
            store.snapshot.links.len(),
            store.snapshot.selected_category_id
        );
        Ok(store)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn categories(&self) -> &[Category] {
        &self.snapshot.categories
    }

    pub fn links(&self) -> &[Link] {
        &self.snapshot.links
    }

    pub fn selection(&self) -> &Selection {
        &self.snapshot.selected_category_id
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.snapshot.category(id)
    }

    pub fn link(&self, id: &LinkId) -> Option<&Link> {
        self.snapshot.link(id)
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    // Links in the selected scope, newest first
    pub fn links_for_selection(&self) -> Vec<Link> {
        self.snapshot.scoped_links()
    }

    // Scoped links whose name, desc or url contain `query`, ignoring case
    pub fn links_matching(&self, query: &str) -> Vec<Link> {
        let needle = query.to_lowercase();
        let mut links = self.snapshot.scoped_links();
        links.retain(|link| link.matches(&needle));
        links
    }

    pub fn category_count(&self, id: &CategoryId) -> usize {
        self.snapshot.count_links_in(id)
    }

    // Create a category and select it
    pub fn add_category(&mut self, name: &str) -> Result<Category, StoreError> {
        self.instrumented("add_category", |store| {
            let name = required("category name", name)?;
            if store.snapshot.name_taken(&name, None) {
                return Err(StoreError::DuplicateName { name });
            }

            let category = Category {
                id: store.fresh_category_id(),
                name,
            };
            let mut next = store.snapshot.clone();
            next.categories.push(category.clone());
            next.selected_category_id = Selection::Category(category.id.clone());
            store.commit(next)?;
            Ok(category)
        })
    }

    pub fn rename_category(&mut self, id: &CategoryId, new_name: &str) -> Result<Category, StoreError> {
        self.instrumented("rename_category", |store| {
            let index = store
                .snapshot
                .categories
                .iter()
                .position(|c| &c.id == id)
                .ok_or_else(|| StoreError::category_not_found(id.as_str()))?;
            let name = required("category name", new_name)?;
            if store.snapshot.name_taken(&name, Some(id)) {
                return Err(StoreError::DuplicateName { name });
            }

            let mut next = store.snapshot.clone();
            next.categories[index].name = name;
            let renamed = next.categories[index].clone();
            store.commit(next)?;
            Ok(renamed)
        })
    }

    // Remove a category together with its links
    pub fn delete_category(&mut self, id: &CategoryId) -> Result<CategoryRemoval, StoreError> {
        self.instrumented("delete_category", |store| {
            let category = store
                .snapshot
                .category(id)
                .cloned()
                .ok_or_else(|| StoreError::category_not_found(id.as_str()))?;

            let mut next = store.snapshot.clone();
            next.categories.retain(|c| &c.id != id);
            let before = next.links.len();
            next.links.retain(|l| &l.category_id != id);
            let removed_links = before - next.links.len();
            if next.selected_category_id.is_category(id) {
                next.selected_category_id = Selection::All;
            }
            store.commit(next)?;
            Ok(CategoryRemoval {
                category,
                removed_links,
            })
        })
    }

    // Add a link to the selected category
    pub fn add_link(&mut self, draft: &LinkDraft) -> Result<Link, StoreError> {
        self.instrumented("add_link", |store| {
            let name = required("link name", &draft.name)?;
            let url = required("link url", &draft.url)?;
            let Some(category_id) = store.snapshot.selected_category_id.category_id().cloned() else {
                return Err(StoreError::NoCategorySelected);
            };

            let link = Link {
                id: store.fresh_link_id(),
                category_id,
                name,
                url: normalize_url(&url),
                desc: draft.desc.trim().to_string(),
                created_at: store.clock.now_millis(),
            };
            let mut next = store.snapshot.clone();
            next.links.push(link.clone());
            store.commit(next)?;
            Ok(link)
        })
    }

    // Edit name, url and desc of a link; category and creation time stay
    pub fn update_link(&mut self, id: &LinkId, draft: &LinkDraft) -> Result<Link, StoreError> {
        self.instrumented("update_link", |store| {
            let index = store
                .snapshot
                .links
                .iter()
                .position(|l| &l.id == id)
                .ok_or_else(|| StoreError::link_not_found(id.as_str()))?;
            let name = required("link name", &draft.name)?;
            let url = required("link url", &draft.url)?;

            let mut next = store.snapshot.clone();
            let link = &mut next.links[index];
            link.name = name;
            link.url = normalize_url(&url);
            link.desc = draft.desc.trim().to_string();
            let updated = link.clone();
            store.commit(next)?;
            Ok(updated)
        })
    }

    pub fn delete_link(&mut self, id: &LinkId) -> Result<Link, StoreError> {
        self.instrumented("delete_link", |store| {
            let link = store
                .snapshot
                .link(id)
                .cloned()
                .ok_or_else(|| StoreError::link_not_found(id.as_str()))?;
            let mut next = store.snapshot.clone();
            next.links.retain(|l| &l.id != id);
            store.commit(next)?;
            Ok(link)
        })
    }

    pub fn select_category(&mut self, selection: Selection) -> Result<(), StoreError> {
        self.instrumented("select_category", |store| {
            if let Selection::Category(id) = &selection {
                if store.snapshot.category(id).is_none() {
                    return Err(StoreError::category_not_found(id.as_str()));
                }
            }
            let mut next = store.snapshot.clone();
            next.selected_category_id = selection;
            store.commit(next)
        })
    }

    fn commit(&mut self, next: Snapshot) -> Result<(), StoreError> {
        self.repo.save(&next).map_err(|err| {
            StoreError::Persistence(format!("{}: {}", err.code, err.message))
        })?;
        self.snapshot = next;
        Ok(())
    }

    fn fresh_category_id(&self) -> CategoryId {
        loop {
            let id = CategoryId::new(self.ids.generate());
            if self.snapshot.category(&id).is_none() {
                return id;
            }
        }
    }

    fn fresh_link_id(&self) -> LinkId {
        loop {
            let id = LinkId::new(self.ids.generate());
            if self.snapshot.link(&id).is_none() {
                return id;
            }
        }
    }

    fn instrumented<T>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut Self) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let op_id = Uuid::new_v4().to_string();
        let span = span!(Level::INFO, "bookmarks", op = op, op_id = op_id.as_str());
        let _enter = span.enter();

        let start = Instant::now();
        let result = f(self);
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => {
                info!(target: "bookmarks", "{} succeeded: elapsed_ms={}", op, elapsed.as_millis());
            }
            Err(e) => {
                warn!(target: "bookmarks", "{} rejected: error_code={}, error_message={}, elapsed_ms={}", op, e.code(), e, elapsed.as_millis());
            }
        }

        result
    }
}

fn required(field: &'static str, value: &str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyInput { field });
    }
    Ok(trimmed.to_string())
}
