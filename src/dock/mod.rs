//! Dock layout model: contents, panes and their dock states.
//!
//! Contents and panes live in arena tables owned by [`DockLayout`] and refer
//! to each other by index only. The activation engine observes this model; it
//! never creates or destroys entries.

pub mod activation_list;
pub mod resolver;

use std::collections::BTreeMap;

use crate::error::DockError;
use crate::focus::WindowHandle;

pub use activation_list::ActivationList;
pub use resolver::PaneResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentId(usize);

impl ContentId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaneId(usize);

impl PaneId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PanelId(usize);

impl PanelId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DockState {
    #[default]
    Unknown,
    Float,
    DockTopAutoHide,
    DockLeftAutoHide,
    DockBottomAutoHide,
    DockRightAutoHide,
    Document,
    DockTop,
    DockLeft,
    DockBottom,
    DockRight,
    Hidden,
}

impl DockState {
    pub fn is_auto_hide(self) -> bool {
        matches!(
            self,
            DockState::DockTopAutoHide
                | DockState::DockLeftAutoHide
                | DockState::DockBottomAutoHide
                | DockState::DockRightAutoHide
        )
    }

    pub fn is_docked(self) -> bool {
        matches!(
            self,
            DockState::DockTop | DockState::DockLeft | DockState::DockBottom | DockState::DockRight
        )
    }

    pub fn is_valid(self) -> bool {
        self != DockState::Unknown
    }

    /// Flip between an edge state and its auto-hide twin. Other states are
    /// returned unchanged.
    pub fn toggle_auto_hide(self) -> DockState {
        match self {
            DockState::DockTop => DockState::DockTopAutoHide,
            DockState::DockLeft => DockState::DockLeftAutoHide,
            DockState::DockBottom => DockState::DockBottomAutoHide,
            DockState::DockRight => DockState::DockRightAutoHide,
            DockState::DockTopAutoHide => DockState::DockTop,
            DockState::DockLeftAutoHide => DockState::DockLeft,
            DockState::DockBottomAutoHide => DockState::DockBottom,
            DockState::DockRightAutoHide => DockState::DockRight,
            other => other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Content {
    title: String,
    window: WindowHandle,
    pane: Option<PaneId>,
    panel: Option<PanelId>,
    dock_state: DockState,
    active_window: Option<WindowHandle>,
    is_activated: bool,
}

impl Content {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The content's own top-level window.
    pub fn window(&self) -> WindowHandle {
        self.window
    }

    pub fn pane(&self) -> Option<PaneId> {
        self.pane
    }

    pub fn panel(&self) -> Option<PanelId> {
        self.panel
    }

    pub fn dock_state(&self) -> DockState {
        self.dock_state
    }

    /// Last window inside this content known to have held focus.
    pub fn active_window(&self) -> Option<WindowHandle> {
        self.active_window
    }

    pub fn is_activated(&self) -> bool {
        self.is_activated
    }
}

#[derive(Debug, Clone)]
pub struct Pane {
    window: WindowHandle,
    panel: Option<PanelId>,
    dock_state: DockState,
    contents: Vec<ContentId>,
    active_content: Option<ContentId>,
    is_activated: bool,
    is_active_document_pane: bool,
}

impl Pane {
    pub fn window(&self) -> WindowHandle {
        self.window
    }

    pub fn panel(&self) -> Option<PanelId> {
        self.panel
    }

    pub fn dock_state(&self) -> DockState {
        self.dock_state
    }

    pub fn contents(&self) -> &[ContentId] {
        &self.contents
    }

    /// Current tab selection.
    pub fn active_content(&self) -> Option<ContentId> {
        self.active_content
    }

    pub fn is_activated(&self) -> bool {
        self.is_activated
    }

    pub fn is_active_document_pane(&self) -> bool {
        self.is_active_document_pane
    }
}

#[derive(Debug, Clone)]
pub struct DockLayout {
    id: PanelId,
    contents: Vec<Option<Content>>,
    panes: Vec<Option<Pane>>,
    content_windows: BTreeMap<WindowHandle, ContentId>,
    pane_windows: BTreeMap<WindowHandle, PaneId>,
}

impl DockLayout {
    pub fn new(id: PanelId) -> Self {
        Self {
            id,
            contents: Vec::new(),
            panes: Vec::new(),
            content_windows: BTreeMap::new(),
            pane_windows: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    fn ensure_window_free(&self, window: WindowHandle) -> Result<(), DockError> {
        if self.content_windows.contains_key(&window) || self.pane_windows.contains_key(&window) {
            return Err(DockError::WindowInUse(window));
        }
        Ok(())
    }

    pub fn add_pane(
        &mut self,
        window: WindowHandle,
        dock_state: DockState,
    ) -> Result<PaneId, DockError> {
        self.ensure_window_free(window)?;
        let id = PaneId::new(self.panes.len());
        self.panes.push(Some(Pane {
            window,
            panel: Some(self.id),
            dock_state,
            contents: Vec::new(),
            active_content: None,
            is_activated: false,
            is_active_document_pane: false,
        }));
        self.pane_windows.insert(window, id);
        tracing::trace!(pane = ?id, ?dock_state, "added pane");
        Ok(id)
    }

    /// Register a content that is not docked anywhere yet.
    pub fn add_content(
        &mut self,
        window: WindowHandle,
        title: impl Into<String>,
    ) -> Result<ContentId, DockError> {
        self.ensure_window_free(window)?;
        let id = ContentId::new(self.contents.len());
        self.contents.push(Some(Content {
            title: title.into(),
            window,
            pane: None,
            panel: Some(self.id),
            dock_state: DockState::Unknown,
            active_window: None,
            is_activated: false,
        }));
        self.content_windows.insert(window, id);
        tracing::trace!(content = ?id, "added content");
        Ok(id)
    }

    /// Move `content` into `pane`, appending it as the last tab. The pane's
    /// tab selection is set when it had none.
    pub fn dock_content(&mut self, content: ContentId, pane: PaneId) -> Result<(), DockError> {
        let target = self.pane(pane).ok_or(DockError::UnknownPane(pane))?;
        let (panel, dock_state) = (target.panel, target.dock_state);
        if panel != Some(self.id) {
            return Err(DockError::DetachedPane(pane));
        }
        let previous = self
            .content(content)
            .ok_or(DockError::UnknownContent(content))?
            .pane;
        if let Some(previous) = previous {
            self.unlink_from_pane(content, previous);
        }
        if let Some(entry) = self.content_mut(content) {
            entry.pane = Some(pane);
            entry.panel = panel;
            entry.dock_state = dock_state;
        }
        if let Some(target) = self.pane_mut(pane) {
            target.contents.push(content);
            if target.active_content.is_none() {
                target.active_content = Some(content);
            }
        }
        Ok(())
    }

    fn unlink_from_pane(&mut self, content: ContentId, pane: PaneId) {
        let Some(entry) = self.pane_mut(pane) else {
            return;
        };
        let Some(index) = entry.contents.iter().position(|c| *c == content) else {
            return;
        };
        entry.contents.remove(index);
        if entry.active_content == Some(content) {
            let replacement = index.min(entry.contents.len().saturating_sub(1));
            entry.active_content = entry.contents.get(replacement).copied();
        }
    }

    /// Change the tab selection of the pane owning `content`.
    pub fn select_tab(&mut self, content: ContentId) -> Result<(), DockError> {
        let pane = self
            .content(content)
            .ok_or(DockError::UnknownContent(content))?
            .pane;
        match pane {
            Some(pane) => self.set_active_tab(pane, content),
            None => Ok(()),
        }
    }

    pub fn set_active_tab(&mut self, pane: PaneId, content: ContentId) -> Result<(), DockError> {
        let entry = self.pane_mut(pane).ok_or(DockError::UnknownPane(pane))?;
        if !entry.contents.contains(&content) {
            return Err(DockError::NotInPane { content, pane });
        }
        entry.active_content = Some(content);
        Ok(())
    }

    /// Change the dock state of a pane and every content it hosts.
    pub fn set_pane_dock_state(
        &mut self,
        pane: PaneId,
        dock_state: DockState,
    ) -> Result<(), DockError> {
        let entry = self.pane_mut(pane).ok_or(DockError::UnknownPane(pane))?;
        entry.dock_state = dock_state;
        let members = entry.contents.clone();
        for content in members {
            if let Some(c) = self.content_mut(content) {
                c.dock_state = dock_state;
            }
        }
        Ok(())
    }

    /// Detach a pane and its contents from this panel. The entries stay in
    /// the tables but no longer count as belonging here.
    pub fn detach_pane(&mut self, pane: PaneId) -> Result<(), DockError> {
        let entry = self.pane_mut(pane).ok_or(DockError::UnknownPane(pane))?;
        entry.panel = None;
        let members = entry.contents.clone();
        for content in members {
            if let Some(c) = self.content_mut(content) {
                c.panel = None;
            }
        }
        Ok(())
    }

    /// Remove a content from the layout entirely.
    pub fn remove_content(&mut self, content: ContentId) -> Result<Content, DockError> {
        let pane = self
            .content(content)
            .ok_or(DockError::UnknownContent(content))?
            .pane;
        if let Some(pane) = pane {
            self.unlink_from_pane(content, pane);
        }
        let removed = self
            .contents
            .get_mut(content.index())
            .and_then(Option::take)
            .ok_or(DockError::UnknownContent(content))?;
        self.content_windows.remove(&removed.window);
        tracing::trace!(content = ?content, "removed content");
        Ok(removed)
    }

    pub fn content(&self, id: ContentId) -> Option<&Content> {
        self.contents.get(id.index()).and_then(Option::as_ref)
    }

    fn content_mut(&mut self, id: ContentId) -> Option<&mut Content> {
        self.contents.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.get(id.index()).and_then(Option::as_ref)
    }

    fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.panes.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn contents(&self) -> impl Iterator<Item = (ContentId, &Content)> {
        self.contents
            .iter()
            .enumerate()
            .filter_map(|(index, c)| c.as_ref().map(|c| (ContentId::new(index), c)))
    }

    pub fn panes(&self) -> impl Iterator<Item = (PaneId, &Pane)> {
        self.panes
            .iter()
            .enumerate()
            .filter_map(|(index, p)| p.as_ref().map(|p| (PaneId::new(index), p)))
    }

    pub fn content_by_window(&self, window: WindowHandle) -> Option<ContentId> {
        self.content_windows.get(&window).copied()
    }

    pub fn pane_by_window(&self, window: WindowHandle) -> Option<PaneId> {
        self.pane_windows.get(&window).copied()
    }

    pub fn is_attached_pane(&self, pane: PaneId) -> bool {
        self.pane(pane).is_some_and(|p| p.panel == Some(self.id))
    }

    pub fn is_attached_content(&self, content: ContentId) -> bool {
        self.content(content)
            .is_some_and(|c| c.panel == Some(self.id))
    }

    pub fn pane_active_content(&self, pane: PaneId) -> Option<ContentId> {
        self.pane(pane).and_then(Pane::active_content)
    }

    /// The Document region's default pane: the first attached, non-empty
    /// pane in `Document` state.
    pub fn default_document_pane(&self) -> Option<PaneId> {
        self.panes()
            .find(|(_, pane)| {
                pane.panel == Some(self.id)
                    && pane.dock_state == DockState::Document
                    && !pane.contents.is_empty()
            })
            .map(|(id, _)| id)
    }

    pub(crate) fn set_pane_activated(&mut self, pane: PaneId, value: bool) {
        if let Some(entry) = self.pane_mut(pane) {
            entry.is_activated = value;
        }
    }

    pub(crate) fn set_pane_active_document(&mut self, pane: PaneId, value: bool) {
        if let Some(entry) = self.pane_mut(pane) {
            entry.is_active_document_pane = value;
        }
    }

    pub(crate) fn set_content_activated(&mut self, content: ContentId, value: bool) {
        if let Some(entry) = self.content_mut(content) {
            entry.is_activated = value;
        }
    }

    pub(crate) fn set_content_active_window(&mut self, content: ContentId, window: WindowHandle) {
        if let Some(entry) = self.content_mut(content) {
            entry.active_window = Some(window);
        }
    }
}
