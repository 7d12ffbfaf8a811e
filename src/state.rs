use crate::domain::bookmarks::{LinkDraft, LinkId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDialogMode {
    Add,
    Edit(LinkId),
}

// Open link dialog with its prefilled fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDialog {
    pub mode: LinkDialogMode,
    pub draft: LinkDraft,
}

impl LinkDialog {
    pub fn title(&self) -> &'static str {
        match self.mode {
            LinkDialogMode::Add => "Add Link",
            LinkDialogMode::Edit(_) => "Edit Link",
        }
    }
}

/// Controller-owned scratch state for the current session. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub link_dialog: Option<LinkDialog>,
    /// Prefilled rename field while the category dialog is open.
    pub category_dialog: Option<String>,
}

impl SessionState {
    pub fn editing_link_id(&self) -> Option<&LinkId> {
        match &self.link_dialog {
            Some(LinkDialog {
                mode: LinkDialogMode::Edit(id),
                ..
            }) => Some(id),
            _ => None,
        }
    }
}
