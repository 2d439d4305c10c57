//! Active content / pane / document tracking for one dock panel.
//!
//! The engine keeps four independently nullable slots and recomputes all of
//! them whenever real focus moves. Change notifications are queued only after
//! every slot has settled and are drained by the owner via
//! [`ActivationEngine::take_changes`].

use crate::config::FocusTrackingConfig;
use crate::dock::{ActivationList, ContentId, DockLayout, DockState, PaneId, PaneResolver};
use crate::focus::hook::{FocusTrackingHook, Resume};
use crate::focus::{FocusEvent, WindowHandle, Windowing};

/// Fired once per slot that changed during a refresh, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivationChange {
    ActiveContentChanged,
    ActiveDocumentChanged,
    ActivePaneChanged,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveSlots {
    pub pane: Option<PaneId>,
    pub content: Option<ContentId>,
    pub document_pane: Option<PaneId>,
    pub document: Option<ContentId>,
}

#[derive(Debug)]
pub struct ActivationEngine {
    list: ActivationList,
    hook: FocusTrackingHook,
    slots: ActiveSlots,
    auto_hide_pane: Option<PaneId>,
    in_refresh: bool,
    changes: Vec<ActivationChange>,
    dummy: WindowHandle,
}

impl ActivationEngine {
    /// Create the engine and acquire the focus hook when enabled and
    /// supported by `host`. `dummy` is an always-focusable control used to
    /// park focus while tracking is suspended.
    pub fn new<H: Windowing + ?Sized>(
        host: &mut H,
        config: FocusTrackingConfig,
        dummy: WindowHandle,
    ) -> Self {
        let mut hook = FocusTrackingHook::new();
        if config.use_focus_hook && !hook.install(host) {
            tracing::debug!("focus hook unavailable; active pane resolution disabled");
        }
        Self {
            list: ActivationList::new(),
            hook,
            slots: ActiveSlots::default(),
            auto_hide_pane: None,
            in_refresh: false,
            changes: Vec::new(),
            dummy,
        }
    }

    /// Release the focus hook. Further calls are no-ops.
    pub fn dispose<H: Windowing + ?Sized>(&mut self, host: &mut H) {
        self.hook.dispose(host);
    }

    pub fn slots(&self) -> ActiveSlots {
        self.slots
    }

    pub fn active_pane(&self) -> Option<PaneId> {
        self.slots.pane
    }

    pub fn active_content(&self) -> Option<ContentId> {
        self.slots.content
    }

    pub fn active_document_pane(&self) -> Option<PaneId> {
        self.slots.document_pane
    }

    pub fn active_document(&self) -> Option<ContentId> {
        self.slots.document
    }

    /// The auto-hide pane currently slid out, if any.
    pub fn auto_hide_pane(&self) -> Option<PaneId> {
        self.auto_hide_pane
    }

    pub fn list(&self) -> &ActivationList {
        &self.list
    }

    pub fn hook(&self) -> &FocusTrackingHook {
        &self.hook
    }

    /// Contents from most to least recently activated.
    pub fn mru(&self) -> Vec<ContentId> {
        self.list.iter_most_recent().collect()
    }

    pub fn take_changes(&mut self) -> Vec<ActivationChange> {
        std::mem::take(&mut self.changes)
    }

    pub fn is_focus_tracking_suspended(&self) -> bool {
        self.hook.is_suspended()
    }

    pub fn add_to_list(&mut self, content: ContentId) {
        self.list.add_to_holding(content);
    }

    pub fn remove_from_list(&mut self, content: ContentId) {
        self.list.remove(content);
        self.hook.forget_pending(content);
    }

    pub fn suspend_focus_tracking(&mut self) {
        self.hook.suspend();
    }

    pub fn resume_focus_tracking<H: Windowing + ?Sized>(
        &mut self,
        layout: &mut DockLayout,
        host: &mut H,
    ) {
        match self.hook.resume() {
            Resume::Ignored => tracing::trace!("resume without matching suspend"),
            Resume::Nested => {}
            Resume::Released { pending } => {
                if let Some(content) = pending {
                    tracing::trace!(content = ?content, "replaying pending activation");
                    self.activate(layout, host, content);
                }
                self.hook.reattach(host);
                if !self.in_refresh {
                    self.refresh_active_window(layout, host);
                }
            }
        }
    }

    /// Select `content` as its pane's tab, then move focus onto it.
    pub fn activate_content<H: Windowing + ?Sized>(
        &mut self,
        layout: &mut DockLayout,
        host: &mut H,
        content: ContentId,
    ) {
        if layout.select_tab(content).is_err() {
            return;
        }
        self.activate(layout, host, content);
    }

    /// Move real focus into `content`.
    ///
    /// While tracking is suspended the request is parked and replayed on the
    /// final resume.
    pub fn activate<H: Windowing + ?Sized>(
        &mut self,
        layout: &mut DockLayout,
        host: &mut H,
        content: ContentId,
    ) {
        if self.hook.is_suspended() {
            self.hook.set_pending(content);
            return;
        }
        let Some(entry) = layout.content(content) else {
            return;
        };
        let window = entry.window();
        let active_window = entry.active_window();
        if host.is_disposed(window) {
            tracing::debug!(content = ?content, "skipping activation of disposed content");
            return;
        }
        if let Some(active_window) = active_window
            && PaneResolver::content_contains(layout, host, content, active_window)
        {
            host.set_focus(active_window);
        }
        if !host.contains_focus(window) && !host.select_next_control(window) {
            tracing::trace!(content = ?content, "content has no focusable control");
        }
        self.pump(layout, host);
    }

    /// Hand focus from `content` to the most sensible replacement.
    pub fn give_up_focus<H: Windowing + ?Sized>(
        &mut self,
        layout: &mut DockLayout,
        host: &mut H,
        content: ContentId,
    ) {
        let Some(window) = layout.content(content).map(|c| c.window()) else {
            return;
        };
        if !host.contains_focus(window) {
            return;
        }
        if self.hook.is_suspended() {
            host.set_focus(self.dummy);
        }
        match self.list.fallback_for(content) {
            Some(replacement) => {
                tracing::debug!(from = ?content, to = ?replacement, "giving up focus");
                self.activate_content(layout, host, replacement);
            }
            None => tracing::debug!(content = ?content, "no replacement to take focus"),
        }
    }

    /// Dispatch queued focus notifications. Notifications arriving while the
    /// listener is detached are dropped.
    pub fn pump<H: Windowing + ?Sized>(&mut self, layout: &mut DockLayout, host: &mut H) {
        let events = host.drain_focus_events();
        if events.is_empty() {
            return;
        }
        if !self.hook.is_listening() {
            tracing::trace!(count = events.len(), "focus tracking detached; dropping events");
            return;
        }
        for event in events {
            self.handle_focus_event(layout, host, event);
        }
    }

    pub fn handle_focus_event<H: Windowing + ?Sized>(
        &mut self,
        layout: &mut DockLayout,
        host: &mut H,
        event: FocusEvent,
    ) {
        match event {
            FocusEvent::Gained { .. } => self.refresh_active_window(layout, host),
            FocusEvent::Lost { next, .. } => {
                // focus moving to another pane of ours is handled by its Gained
                let target = next.and_then(|handle| PaneResolver::resolve(layout, host, handle));
                if target.is_none() {
                    self.refresh_active_window(layout, host);
                }
            }
        }
    }

    /// Recompute every active slot from the currently focused window.
    pub fn refresh_active_window<H: Windowing + ?Sized>(
        &mut self,
        layout: &mut DockLayout,
        host: &mut H,
    ) {
        if self.in_refresh {
            tracing::trace!("refresh already in progress");
            return;
        }
        self.suspend_focus_tracking();
        self.in_refresh = true;

        let before = self.slots;
        self.set_active_pane(layout, host);
        self.set_active_content(layout);
        self.set_active_document_pane(layout);
        self.set_active_document(layout);
        self.refresh_auto_hide_pane(layout);

        self.resume_focus_tracking(layout, host);
        self.in_refresh = false;

        if before.content != self.slots.content {
            self.changes.push(ActivationChange::ActiveContentChanged);
        }
        if before.document != self.slots.document {
            self.changes.push(ActivationChange::ActiveDocumentChanged);
        }
        if before.pane != self.slots.pane {
            self.changes.push(ActivationChange::ActivePaneChanged);
        }
        if before != self.slots {
            tracing::debug!(
                pane = ?self.slots.pane,
                content = ?self.slots.content,
                document_pane = ?self.slots.document_pane,
                document = ?self.slots.document,
                "active window changed"
            );
        }
    }

    fn set_active_pane<H: Windowing + ?Sized>(&mut self, layout: &mut DockLayout, host: &H) {
        // no installed hook means no pane can ever be active
        let value = if self.hook.is_installed() {
            host.focused()
                .and_then(|handle| PaneResolver::resolve(layout, host, handle))
        } else {
            None
        };
        if self.slots.pane == value {
            return;
        }
        if let Some(old) = self.slots.pane {
            layout.set_pane_activated(old, false);
        }
        self.slots.pane = value;
        if let Some(new) = value {
            layout.set_pane_activated(new, true);
        }
    }

    fn set_active_content(&mut self, layout: &mut DockLayout) {
        let value = self
            .slots
            .pane
            .and_then(|pane| layout.pane_active_content(pane));
        if self.slots.content == value {
            return;
        }
        if let Some(old) = self.slots.content {
            layout.set_content_activated(old, false);
        }
        self.slots.content = value;
        let Some(new) = value else {
            return;
        };
        layout.set_content_activated(new, true);
        let auto_hide = layout
            .content(new)
            .is_some_and(|c| c.dock_state().is_auto_hide());
        if !auto_hide {
            self.list.promote(new);
            tracing::trace!(content = ?new, "promoted to most recent");
        }
    }

    fn set_active_document_pane(&mut self, layout: &mut DockLayout) {
        let is_document =
            |pane: PaneId| layout.pane(pane).is_some_and(|p| p.dock_state() == DockState::Document);
        let value = match self.slots.pane.filter(|pane| is_document(*pane)) {
            Some(pane) => Some(pane),
            None => match self.slots.document_pane {
                Some(current) if layout.is_attached_pane(current) && is_document(current) => {
                    Some(current)
                }
                _ => layout.default_document_pane(),
            },
        };
        if self.slots.document_pane == value {
            return;
        }
        if let Some(old) = self.slots.document_pane {
            layout.set_pane_active_document(old, false);
        }
        self.slots.document_pane = value;
        if let Some(new) = value {
            layout.set_pane_active_document(new, true);
        }
    }

    fn set_active_document(&mut self, layout: &DockLayout) {
        self.slots.document = self
            .slots
            .document_pane
            .and_then(|pane| layout.pane_active_content(pane));
    }

    fn refresh_auto_hide_pane(&mut self, layout: &DockLayout) {
        let value = self
            .slots
            .pane
            .filter(|pane| layout.pane(*pane).is_some_and(|p| p.dock_state().is_auto_hide()));
        if self.auto_hide_pane != value {
            tracing::trace!(pane = ?value, "auto-hide pane changed");
            self.auto_hide_pane = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::dock::PanelId;
    use crate::focus::FocusNotifier;
    use crate::window::TerminalHost;

    struct Rig {
        host: TerminalHost,
        layout: DockLayout,
        engine: ActivationEngine,
    }

    impl Rig {
        fn new() -> Self {
            let mut host = TerminalHost::new();
            let dummy = host.create_window(None);
            host.set_focusable(dummy, true);
            let engine = ActivationEngine::new(&mut host, FocusTrackingConfig::default(), dummy);
            Self {
                host,
                layout: DockLayout::new(PanelId::default()),
                engine,
            }
        }

        fn pane(&mut self, state: DockState) -> PaneId {
            let window = self.host.create_window(None);
            self.layout.add_pane(window, state).unwrap()
        }

        fn content(&mut self, pane: PaneId) -> ContentId {
            let pane_window = self.layout.pane(pane).unwrap().window();
            let window = self.host.create_window(Some(pane_window));
            self.host.set_focusable(window, true);
            let id = self.layout.add_content(window, "c").unwrap();
            self.layout.dock_content(id, pane).unwrap();
            self.engine.add_to_list(id);
            id
        }

        fn activate(&mut self, content: ContentId) {
            self.engine
                .activate_content(&mut self.layout, &mut self.host, content);
        }
    }

    #[test]
    fn activation_fills_all_slots_in_order() {
        let mut rig = Rig::new();
        let docs = rig.pane(DockState::Document);
        let a = rig.content(docs);
        rig.activate(a);

        let slots = rig.engine.slots();
        assert_eq!(slots.pane, Some(docs));
        assert_eq!(slots.content, Some(a));
        assert_eq!(slots.document_pane, Some(docs));
        assert_eq!(slots.document, Some(a));
        assert!(rig.layout.pane(docs).unwrap().is_activated());
        assert!(rig.layout.pane(docs).unwrap().is_active_document_pane());
        assert!(rig.layout.content(a).unwrap().is_activated());
        assert_eq!(
            rig.engine.take_changes(),
            vec![
                ActivationChange::ActiveContentChanged,
                ActivationChange::ActiveDocumentChanged,
                ActivationChange::ActivePaneChanged,
            ]
        );
        assert!(rig.engine.take_changes().is_empty());
    }

    #[test]
    fn unchanged_refresh_fires_nothing() {
        let mut rig = Rig::new();
        let docs = rig.pane(DockState::Document);
        let a = rig.content(docs);
        rig.activate(a);
        rig.engine.take_changes();
        rig.engine
            .refresh_active_window(&mut rig.layout, &mut rig.host);
        assert!(rig.engine.take_changes().is_empty());
    }

    #[test]
    fn auto_hide_content_is_active_but_not_promoted() {
        let mut rig = Rig::new();
        let docs = rig.pane(DockState::Document);
        let a = rig.content(docs);
        let strip = rig.pane(DockState::DockBottomAutoHide);
        let output = rig.content(strip);
        rig.activate(a);
        rig.activate(output);

        assert_eq!(rig.engine.active_content(), Some(output));
        assert_eq!(rig.engine.auto_hide_pane(), Some(strip));
        assert_eq!(rig.engine.mru(), vec![a]);
        assert!(rig.engine.list().is_holding(output));
        // document slot stays on the document pane
        assert_eq!(rig.engine.active_document(), Some(a));
    }

    #[test]
    fn suspended_activation_is_parked() {
        let mut rig = Rig::new();
        let docs = rig.pane(DockState::Document);
        let a = rig.content(docs);
        rig.engine.suspend_focus_tracking();
        rig.engine.activate(&mut rig.layout, &mut rig.host, a);
        assert_eq!(rig.engine.hook().pending(), Some(a));
        assert_eq!(rig.engine.active_content(), None);

        rig.engine
            .resume_focus_tracking(&mut rig.layout, &mut rig.host);
        assert_eq!(rig.engine.active_content(), Some(a));
        assert_eq!(rig.engine.hook().pending(), None);
    }

    #[test]
    fn lost_focus_to_own_pane_defers_to_gained() {
        let mut rig = Rig::new();
        let docs = rig.pane(DockState::Document);
        let a = rig.content(docs);
        let b = rig.content(docs);
        rig.activate(a);
        rig.engine.take_changes();

        let b_window = rig.layout.content(b).unwrap().window();
        let a_window = rig.layout.content(a).unwrap().window();
        rig.layout.select_tab(b).unwrap();
        rig.host.set_focus(b_window);
        let events = rig.host.drain_focus_events();
        assert_eq!(
            events[0],
            FocusEvent::Lost {
                window: a_window,
                next: Some(b_window)
            }
        );
        rig.engine
            .handle_focus_event(&mut rig.layout, &mut rig.host, events[0]);
        assert_eq!(rig.engine.active_content(), Some(a));
        rig.engine
            .handle_focus_event(&mut rig.layout, &mut rig.host, events[1]);
        assert_eq!(rig.engine.active_content(), Some(b));
    }

    #[test]
    fn refresh_does_not_reenter() {
        let mut rig = Rig::new();
        let docs = rig.pane(DockState::Document);
        let a = rig.content(docs);
        let a_window = rig.layout.content(a).unwrap().window();
        rig.host.set_focus(a_window);
        rig.host.drain_focus_events();

        rig.engine.in_refresh = true;
        rig.engine
            .refresh_active_window(&mut rig.layout, &mut rig.host);
        assert_eq!(rig.engine.active_content(), None);

        // a resume reached from inside a refresh must not start another one
        rig.engine.suspend_focus_tracking();
        rig.engine
            .resume_focus_tracking(&mut rig.layout, &mut rig.host);
        assert_eq!(rig.engine.active_content(), None);
        assert!(rig.engine.take_changes().is_empty());

        rig.engine.in_refresh = false;
        rig.engine
            .refresh_active_window(&mut rig.layout, &mut rig.host);
        assert_eq!(rig.engine.active_content(), Some(a));
    }

    /// Terminal host that counts focus queries.
    struct CountingFocus {
        inner: TerminalHost,
        focused_calls: Cell<u32>,
    }

    impl FocusNotifier for CountingFocus {
        fn is_supported(&self) -> bool {
            self.inner.is_supported()
        }

        fn install(&mut self) {
            self.inner.install();
        }

        fn uninstall(&mut self) {
            self.inner.uninstall();
        }

        fn is_installed(&self) -> bool {
            self.inner.is_installed()
        }

        fn drain_focus_events(&mut self) -> Vec<FocusEvent> {
            self.inner.drain_focus_events()
        }
    }

    impl Windowing for CountingFocus {
        fn focused(&self) -> Option<WindowHandle> {
            self.focused_calls.set(self.focused_calls.get() + 1);
            self.inner.focused()
        }

        fn control_from_child(&self, handle: WindowHandle) -> Option<WindowHandle> {
            self.inner.control_from_child(handle)
        }

        fn parent(&self, handle: WindowHandle) -> Option<WindowHandle> {
            self.inner.parent(handle)
        }

        fn is_disposed(&self, handle: WindowHandle) -> bool {
            self.inner.is_disposed(handle)
        }

        fn set_focus(&mut self, handle: WindowHandle) -> bool {
            self.inner.set_focus(handle)
        }

        fn select_next_control(&mut self, container: WindowHandle) -> bool {
            self.inner.select_next_control(container)
        }
    }

    #[test]
    fn refresh_releases_its_own_suspension_without_a_second_pass() {
        let mut host = CountingFocus {
            inner: TerminalHost::new(),
            focused_calls: Cell::new(0),
        };
        let dummy = host.inner.create_window(None);
        host.inner.set_focusable(dummy, true);
        let mut engine = ActivationEngine::new(&mut host, FocusTrackingConfig::default(), dummy);
        let mut layout = DockLayout::new(PanelId::default());
        let pane_window = host.inner.create_window(None);
        let docs = layout.add_pane(pane_window, DockState::Document).unwrap();
        let window = host.inner.create_window(Some(pane_window));
        host.inner.set_focusable(window, true);
        let a = layout.add_content(window, "a").unwrap();
        layout.dock_content(a, docs).unwrap();
        engine.add_to_list(a);
        host.inner.set_focus(window);
        host.inner.drain_focus_events();

        // the refresh resumes tracking itself; that resume must not refresh again
        engine.refresh_active_window(&mut layout, &mut host);
        assert_eq!(host.focused_calls.get(), 1);
        assert_eq!(engine.active_content(), Some(a));
        assert!(!engine.is_focus_tracking_suspended());
        assert!(engine.hook().is_listening());
        assert_eq!(engine.take_changes().len(), 3);
    }

    #[test]
    fn uninstalled_hook_never_resolves_a_pane() {
        let mut host = TerminalHost::new();
        let dummy = host.create_window(None);
        let mut engine =
            ActivationEngine::new(&mut host, FocusTrackingConfig::without_focus_hook(), dummy);
        let mut layout = DockLayout::new(PanelId::default());
        let pane_window = host.create_window(None);
        let docs = layout.add_pane(pane_window, DockState::Document).unwrap();
        let window = host.create_window(Some(pane_window));
        host.set_focusable(window, true);
        let a = layout.add_content(window, "a").unwrap();
        layout.dock_content(a, docs).unwrap();
        engine.add_to_list(a);

        engine.activate_content(&mut layout, &mut host, a);
        engine.refresh_active_window(&mut layout, &mut host);
        assert_eq!(host.focused(), Some(window));
        assert_eq!(engine.active_pane(), None);
        assert_eq!(engine.active_content(), None);
        assert!(engine.mru().is_empty());
        // the default document pane still fills in
        assert_eq!(engine.active_document_pane(), Some(docs));
        assert!(!engine.take_changes().contains(&ActivationChange::ActivePaneChanged));
    }
}
