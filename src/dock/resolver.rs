use super::{ContentId, DockLayout, PaneId};
use crate::focus::{WindowHandle, Windowing};

/// Maps raw focus handles onto the panes of one layout.
pub struct PaneResolver;

impl PaneResolver {
    /// Walk from the control owning `handle` up through its parents.
    ///
    /// A content window wins over a bare pane window: the first content of
    /// this panel found on the way up yields its pane, and every content
    /// passed records `handle` as its last active window. Unknown, foreign
    /// and disposed handles resolve to `None`.
    pub fn resolve<H: Windowing + ?Sized>(
        layout: &mut DockLayout,
        host: &H,
        handle: WindowHandle,
    ) -> Option<PaneId> {
        let mut control = host.control_from_child(handle);
        while let Some(current) = control {
            if let Some(content) = layout.content_by_window(current) {
                layout.set_content_active_window(content, handle);
                if layout.is_attached_content(content) {
                    return layout.content(content).and_then(|c| c.pane());
                }
            }
            if let Some(pane) = layout.pane_by_window(current)
                && layout.is_attached_pane(pane)
            {
                return Some(pane);
            }
            control = host.parent(current);
        }
        None
    }

    /// Whether `handle` lies inside the window of `content`.
    pub fn content_contains<H: Windowing + ?Sized>(
        layout: &DockLayout,
        host: &H,
        content: ContentId,
        handle: WindowHandle,
    ) -> bool {
        layout
            .content(content)
            .is_some_and(|c| host.contains(c.window(), handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dock::{DockState, PanelId};
    use crate::window::TerminalHost;

    struct Fixture {
        host: TerminalHost,
        layout: DockLayout,
        pane: PaneId,
        content: ContentId,
        editor: WindowHandle,
        pane_window: WindowHandle,
    }

    fn fixture() -> Fixture {
        let mut host = TerminalHost::new();
        let mut layout = DockLayout::new(PanelId::default());
        let pane_window = host.create_window(None);
        let content_window = host.create_window(Some(pane_window));
        let editor = host.create_window(Some(content_window));
        let pane = layout.add_pane(pane_window, DockState::Document).unwrap();
        let content = layout.add_content(content_window, "doc").unwrap();
        layout.dock_content(content, pane).unwrap();
        Fixture {
            host,
            layout,
            pane,
            content,
            editor,
            pane_window,
        }
    }

    #[test]
    fn content_match_records_active_window() {
        let mut f = fixture();
        let pane = PaneResolver::resolve(&mut f.layout, &f.host, f.editor);
        assert_eq!(pane, Some(f.pane));
        assert_eq!(
            f.layout.content(f.content).unwrap().active_window(),
            Some(f.editor)
        );
    }

    #[test]
    fn bare_pane_window_resolves_to_pane() {
        let mut f = fixture();
        let pane = PaneResolver::resolve(&mut f.layout, &f.host, f.pane_window);
        assert_eq!(pane, Some(f.pane));
        assert_eq!(f.layout.content(f.content).unwrap().active_window(), None);
    }

    #[test]
    fn foreign_and_disposed_handles_resolve_to_none() {
        let mut f = fixture();
        let stray = f.host.create_window(None);
        assert_eq!(PaneResolver::resolve(&mut f.layout, &f.host, stray), None);
        assert_eq!(
            PaneResolver::resolve(&mut f.layout, &f.host, WindowHandle::new(999)),
            None
        );

        let content_window = f.layout.content(f.content).unwrap().window();
        f.host.dispose(content_window);
        assert_eq!(PaneResolver::resolve(&mut f.layout, &f.host, f.editor), None);
    }

    #[test]
    fn detached_pane_is_not_ours() {
        let mut f = fixture();
        f.layout.detach_pane(f.pane).unwrap();
        assert_eq!(PaneResolver::resolve(&mut f.layout, &f.host, f.editor), None);
        // the cache is still refreshed on the way up
        assert_eq!(
            f.layout.content(f.content).unwrap().active_window(),
            Some(f.editor)
        );
    }

    #[test]
    fn content_contains_follows_hierarchy() {
        let f = fixture();
        assert!(PaneResolver::content_contains(
            &f.layout, &f.host, f.content, f.editor
        ));
        assert!(!PaneResolver::content_contains(
            &f.layout,
            &f.host,
            f.content,
            f.pane_window
        ));
    }
}
