use tracing::{debug, warn};

use crate::commands::prompt::{Prompt, PromptBusy, PromptGate};
use crate::domain::bookmarks::{CategoryId, Link, LinkDraft, LinkId, Selection};
use crate::domain::clock::Clock;
use crate::domain::ids::IdGenerator;
use crate::error::StoreError;
use crate::repo::snapshot_repo::SnapshotRepo;
use crate::services::bookmark_store::BookmarkStore;
use crate::state::{LinkDialog, LinkDialogMode, SessionState};
use crate::view::page::{render_page, ViewSink};

pub const MSG_CATEGORY_EXISTS: &str = "Category already exists.";
pub const MSG_OTHER_CATEGORY_EXISTS: &str = "Another category with that name exists.";
pub const MSG_CATEGORY_NAME_REQUIRED: &str = "Please enter a category name.";
pub const MSG_LINK_FIELDS_REQUIRED: &str = "Please enter both a name and a URL.";
pub const MSG_SELECT_CATEGORY_FIRST: &str =
    "Please select a category on the left before adding a link.";
pub const MSG_NOT_FOUND: &str = "That item no longer exists.";
pub const MSG_SAVE_FAILED: &str = "Your changes could not be saved.";

/// Result of one UI event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed and the page was re-rendered.
    Applied,
    /// The store refused; the user was told why.
    Rejected(StoreError),
    /// The user answered "no" to a confirmation.
    Cancelled,
    /// Event does not apply in the current state (e.g. editing "All Links").
    Ignored,
    /// Another prompt was still open.
    Busy,
}

// Which action failed, to pick the wording of the message
#[derive(Debug, Clone, Copy)]
enum Action {
    AddCategory,
    RenameCategory,
    SaveLink,
    Other,
}

fn message_for(err: &StoreError, action: Action) -> &'static str {
    match (err, action) {
        (StoreError::DuplicateName { .. }, Action::RenameCategory) => MSG_OTHER_CATEGORY_EXISTS,
        (StoreError::DuplicateName { .. }, _) => MSG_CATEGORY_EXISTS,
        (StoreError::EmptyInput { .. }, Action::SaveLink) => MSG_LINK_FIELDS_REQUIRED,
        (StoreError::EmptyInput { .. }, _) => MSG_CATEGORY_NAME_REQUIRED,
        (StoreError::NoCategorySelected, _) => MSG_SELECT_CATEGORY_FIRST,
        (StoreError::NotFound { .. }, _) => MSG_NOT_FOUND,
        (StoreError::Persistence(_), _) => MSG_SAVE_FAILED,
    }
}

/// Turns UI events into store mutations and re-renders after each success.
///
/// Handlers take `&mut self`, so one event runs to completion (including any
/// prompt it awaits) before the next can start.
pub struct BookmarkController<R, G, C, P, V> {
    store: BookmarkStore<R, G, C>,
    prompt: PromptGate<P>,
    view: V,
    session: SessionState,
}

impl<R, G, C, P, V> BookmarkController<R, G, C, P, V>
where
    R: SnapshotRepo,
    G: IdGenerator,
    C: Clock,
    P: Prompt,
    V: ViewSink,
{
    pub fn new(store: BookmarkStore<R, G, C>, prompt: P, view: V) -> Self {
        Self {
            store,
            prompt: PromptGate::new(prompt),
            view,
            session: SessionState::default(),
        }
    }

    pub fn store(&self) -> &BookmarkStore<R, G, C> {
        &self.store
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn prompt(&self) -> &P {
        self.prompt.inner()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Full redraw from the current snapshot.
    pub fn render(&mut self) {
        let page = render_page(self.store.snapshot(), None);
        self.view.render(&page);
    }

    // Add-category form submit
    pub async fn submit_new_category(&mut self, name: &str) -> Outcome {
        let result = self.store.add_category(name).map(|_| ());
        self.finish(result, Action::AddCategory).await
    }

    pub async fn select_category(&mut self, selection: Selection) -> Outcome {
        let result = self.store.select_category(selection);
        self.finish(result, Action::Other).await
    }

    /// Live search within the current scope. A blank query restores the
    /// normal view.
    pub fn search(&mut self, query: &str) {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            self.render();
            return;
        }
        let matches = self.store.links_matching(&needle);
        let page = render_page(self.store.snapshot(), Some(&matches));
        self.view.render(&page);
    }

    /// Opens the rename/delete dialog for the selected category and returns
    /// the name to prefill.
    pub fn open_edit_category(&mut self) -> Option<&str> {
        let id = self.store.selection().category_id()?;
        let name = self.store.category(id)?.name.clone();
        self.session.category_dialog = Some(name);
        self.session.category_dialog.as_deref()
    }

    pub fn close_category_dialog(&mut self) {
        self.session.category_dialog = None;
    }

    pub async fn save_category_rename(&mut self, new_name: &str) -> Outcome {
        let Some(id) = self.store.selection().category_id().cloned() else {
            return Outcome::Ignored;
        };
        let result = self.store.rename_category(&id, new_name).map(|_| ());
        let outcome = self.finish(result, Action::RenameCategory).await;
        if outcome == Outcome::Applied {
            self.close_category_dialog();
        }
        outcome
    }

    /// Trash button next to a category in the sidebar.
    pub async fn delete_category(&mut self, id: &CategoryId) -> Outcome {
        self.confirm_and_delete_category(id).await
    }

    /// Delete button inside the category dialog.
    pub async fn delete_current_category(&mut self) -> Outcome {
        let Some(id) = self.store.selection().category_id().cloned() else {
            return Outcome::Ignored;
        };
        let outcome = self.confirm_and_delete_category(&id).await;
        if outcome == Outcome::Applied {
            self.close_category_dialog();
        }
        outcome
    }

    async fn confirm_and_delete_category(&mut self, id: &CategoryId) -> Outcome {
        let Some(subject) = self.store.category(id).map(|c| c.name.clone()) else {
            return self
                .finish(Err(StoreError::category_not_found(id.as_str())), Action::Other)
                .await;
        };
        let detail = format!("{} link(s)", self.store.category_count(id));
        match self.prompt.confirm(&subject, Some(&detail)).await {
            Ok(true) => {}
            Ok(false) => return Outcome::Cancelled,
            Err(PromptBusy) => return busy(),
        }
        let result = self.store.delete_category(id).map(|_| ());
        self.finish(result, Action::Other).await
    }

    pub fn open_add_link(&mut self) -> &LinkDialog {
        self.session
            .link_dialog
            .insert(LinkDialog {
                mode: LinkDialogMode::Add,
                draft: LinkDraft::default(),
            })
    }

    pub fn open_edit_link(&mut self, id: &LinkId) -> Option<&LinkDialog> {
        let draft = LinkDraft::from(self.store.link(id)?);
        Some(self.session.link_dialog.insert(LinkDialog {
            mode: LinkDialogMode::Edit(id.clone()),
            draft,
        }))
    }

    pub fn cancel_link_dialog(&mut self) {
        self.session.link_dialog = None;
    }

    /// Save button of the link dialog: updates the link being edited, or
    /// adds a new one to the selected category. The dialog stays open when
    /// the store refuses, unless the link being edited is gone.
    pub async fn save_link(&mut self, draft: LinkDraft) -> Outcome {
        let editing = self.session.editing_link_id().cloned();
        let result = match &editing {
            Some(id) => self.store.update_link(id, &draft).map(|_| ()),
            None => self.store.add_link(&draft).map(|_| ()),
        };
        let outcome = self.finish(result, Action::SaveLink).await;
        match outcome {
            Outcome::Applied => self.session.link_dialog = None,
            Outcome::Rejected(StoreError::NotFound { .. }) if editing.is_some() => {
                self.session.link_dialog = None
            }
            _ => {
                if let Some(dialog) = self.session.link_dialog.as_mut() {
                    dialog.draft = draft;
                }
            }
        }
        outcome
    }

    pub async fn delete_link(&mut self, id: &LinkId) -> Outcome {
        let Some(subject) = self.store.link(id).map(|l| l.name.clone()) else {
            return self
                .finish(Err(StoreError::link_not_found(id.as_str())), Action::Other)
                .await;
        };
        match self.prompt.confirm(&subject, None).await {
            Ok(true) => {}
            Ok(false) => return Outcome::Cancelled,
            Err(PromptBusy) => return busy(),
        }
        let result = self.store.delete_link(id).map(|_| ());
        self.finish(result, Action::Other).await
    }

    /// Card click: the url the host should open in a new tab.
    pub fn open_link(&self, id: &LinkId) -> Option<&str> {
        self.store.link(id).map(|link: &Link| link.url.as_str())
    }

    async fn finish(&mut self, result: Result<(), StoreError>, action: Action) -> Outcome {
        match result {
            Ok(()) => {
                self.render();
                Outcome::Applied
            }
            Err(err) => {
                debug!(target: "bookmarks", "surfacing rejection: error_code={}", err.code());
                if self.prompt.notify(message_for(&err, action)).await.is_err() {
                    return busy();
                }
                Outcome::Rejected(err)
            }
        }
    }
}

fn busy() -> Outcome {
    warn!(target: "bookmarks", "prompt already open; event dropped");
    Outcome::Busy
}
