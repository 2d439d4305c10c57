//! The root dock container.
//!
//! A [`DockPanel`] owns the layout, the windowing host and exactly one
//! [`ActivationEngine`] for its whole lifetime. The focus hook is acquired on
//! construction and released when the panel is dropped.

use crate::config::FocusTrackingConfig;
use crate::dock::{Content, ContentId, DockLayout, DockState, PaneId, PanelId};
use crate::engine::{ActivationChange, ActivationEngine, ActiveSlots};
use crate::error::DockError;
use crate::focus::{WindowHandle, Windowing};

pub struct DockPanel<H: Windowing> {
    layout: DockLayout,
    host: H,
    engine: ActivationEngine,
    dummy: WindowHandle,
}

impl<H: Windowing> DockPanel<H> {
    /// `dummy` must be an always-focusable control owned by `host`; it keeps
    /// something focused while tracking is suspended.
    pub fn new(host: H, dummy: WindowHandle, config: FocusTrackingConfig) -> Self {
        Self::with_id(PanelId::default(), host, dummy, config)
    }

    pub fn with_id(
        id: PanelId,
        mut host: H,
        dummy: WindowHandle,
        config: FocusTrackingConfig,
    ) -> Self {
        let engine = ActivationEngine::new(&mut host, config, dummy);
        Self {
            layout: DockLayout::new(id),
            host,
            engine,
            dummy,
        }
    }

    pub fn layout(&self) -> &DockLayout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut DockLayout {
        &mut self.layout
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn engine(&self) -> &ActivationEngine {
        &self.engine
    }

    pub fn dummy_control(&self) -> WindowHandle {
        self.dummy
    }

    pub fn add_pane(
        &mut self,
        window: WindowHandle,
        dock_state: DockState,
    ) -> Result<PaneId, DockError> {
        self.layout.add_pane(window, dock_state)
    }

    /// Register a content, dock it into `pane` and make it eligible for the
    /// activation list.
    pub fn add_content(
        &mut self,
        window: WindowHandle,
        title: impl Into<String>,
        pane: PaneId,
    ) -> Result<ContentId, DockError> {
        let content = self.layout.add_content(window, title)?;
        if let Err(err) = self.layout.dock_content(content, pane) {
            let _ = self.layout.remove_content(content);
            return Err(err);
        }
        self.engine.add_to_list(content);
        Ok(content)
    }

    /// Remove a content from the panel, handing focus to its replacement
    /// first. The removed entry is returned so the caller can destroy its
    /// window.
    pub fn close_content(&mut self, content: ContentId) -> Result<Content, DockError> {
        if self.layout.content(content).is_none() {
            return Err(DockError::UnknownContent(content));
        }
        self.give_up_focus(content);
        self.engine.remove_from_list(content);
        let removed = self.layout.remove_content(content)?;
        tracing::debug!(content = ?content, title = removed.title(), "closed content");
        self.refresh();
        Ok(removed)
    }

    pub fn set_pane_dock_state(
        &mut self,
        pane: PaneId,
        dock_state: DockState,
    ) -> Result<(), DockError> {
        self.layout.set_pane_dock_state(pane, dock_state)?;
        self.refresh();
        Ok(())
    }

    /// Bring `content` to the front of its pane and focus it.
    pub fn activate(&mut self, content: ContentId) {
        self.engine
            .activate_content(&mut self.layout, &mut self.host, content);
    }

    pub fn give_up_focus(&mut self, content: ContentId) {
        self.engine
            .give_up_focus(&mut self.layout, &mut self.host, content);
    }

    pub fn add_to_list(&mut self, content: ContentId) {
        self.engine.add_to_list(content);
    }

    pub fn remove_from_list(&mut self, content: ContentId) {
        self.engine.remove_from_list(content);
    }

    pub fn suspend_focus_tracking(&mut self) {
        self.engine.suspend_focus_tracking();
    }

    pub fn resume_focus_tracking(&mut self) {
        self.engine
            .resume_focus_tracking(&mut self.layout, &mut self.host);
    }

    pub fn is_focus_tracking_suspended(&self) -> bool {
        self.engine.is_focus_tracking_suspended()
    }

    /// Park focus on the dummy control.
    pub fn save_focus(&mut self) {
        self.host.set_focus(self.dummy);
    }

    /// Dispatch focus notifications queued by the host since the last call.
    pub fn pump_focus_events(&mut self) {
        self.engine.pump(&mut self.layout, &mut self.host);
    }

    pub fn refresh(&mut self) {
        self.engine
            .refresh_active_window(&mut self.layout, &mut self.host);
    }

    pub fn slots(&self) -> ActiveSlots {
        self.engine.slots()
    }

    pub fn active_content(&self) -> Option<ContentId> {
        self.engine.active_content()
    }

    pub fn active_pane(&self) -> Option<PaneId> {
        self.engine.active_pane()
    }

    pub fn active_document(&self) -> Option<ContentId> {
        self.engine.active_document()
    }

    pub fn active_document_pane(&self) -> Option<PaneId> {
        self.engine.active_document_pane()
    }

    pub fn auto_hide_pane(&self) -> Option<PaneId> {
        self.engine.auto_hide_pane()
    }

    pub fn mru(&self) -> Vec<ContentId> {
        self.engine.mru()
    }

    pub fn take_changes(&mut self) -> Vec<ActivationChange> {
        self.engine.take_changes()
    }
}

impl<H: Windowing> Drop for DockPanel<H> {
    fn drop(&mut self) {
        self.engine.dispose(&mut self.host);
    }
}
