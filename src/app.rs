//! The interactive dock demo.
//!
//! A tool pane on the left, two document panes, and an auto-hide output
//! pane along the bottom edge. Every content is a placeholder window; the
//! point is to watch the active slots and the recent list follow focus.

use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEventKind};

use crate::config::FocusTrackingConfig;
use crate::constants::{DEFAULT_DOCUMENT_COUNT, MAX_DOCUMENTS};
use crate::dock::{ContentId, DockState, PaneId};
use crate::error::DockError;
use crate::event_loop::ControlFlow;
use crate::keybindings::{Action, KeyBindings};
use crate::panel::DockPanel;
use crate::runner::DockApp;
use crate::ui::{DockView, TabHit, render_dock, tab_at};
use crate::window::TerminalHost;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoOptions {
    pub documents: usize,
    pub focus: FocusTrackingConfig,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            documents: DEFAULT_DOCUMENT_COUNT,
            focus: FocusTrackingConfig::default(),
        }
    }
}

pub struct DemoApp {
    panel: DockPanel<TerminalHost>,
    keys: KeyBindings,
    show_help: bool,
    tabs: Vec<TabHit>,
    document_panes: Vec<PaneId>,
    opened: usize,
}

impl DemoApp {
    pub fn new(options: DemoOptions) -> Result<Self, DockError> {
        let mut host = TerminalHost::new();
        let dummy = host.create_window(None);
        host.set_focusable(dummy, true);
        let panel = DockPanel::new(host, dummy, options.focus);
        let mut app = Self {
            panel,
            keys: KeyBindings::default(),
            show_help: false,
            tabs: Vec::new(),
            document_panes: Vec::new(),
            opened: 0,
        };

        let tools = app.add_pane(DockState::DockLeft)?;
        app.add_content(tools, "Explorer")?;
        app.add_content(tools, "Outline")?;
        app.document_panes = vec![
            app.add_pane(DockState::Document)?,
            app.add_pane(DockState::Document)?,
        ];
        let output = app.add_pane(DockState::DockBottomAutoHide)?;
        app.add_content(output, "Output")?;
        app.add_content(output, "Problems")?;

        let count = options.documents.clamp(1, MAX_DOCUMENTS);
        let mut first = None;
        for index in 0..count {
            let pane = app.document_panes[index % app.document_panes.len()];
            let content = app.open_document(pane)?;
            first.get_or_insert(content);
        }
        if let Some(first) = first {
            app.activate(first);
        }
        tracing::debug!(documents = count, "dock demo ready");
        Ok(app)
    }

    pub fn panel(&self) -> &DockPanel<TerminalHost> {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut DockPanel<TerminalHost> {
        &mut self.panel
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn document_panes(&self) -> &[PaneId] {
        &self.document_panes
    }

    fn add_pane(&mut self, state: DockState) -> Result<PaneId, DockError> {
        let window = self.panel.host_mut().create_window(None);
        self.panel.add_pane(window, state)
    }

    fn add_content(&mut self, pane: PaneId, title: &str) -> Result<ContentId, DockError> {
        let parent = self
            .panel
            .layout()
            .pane(pane)
            .map(|p| p.window())
            .ok_or(DockError::UnknownPane(pane))?;
        let host = self.panel.host_mut();
        let window = host.create_window(Some(parent));
        host.set_focusable(window, true);
        match self.panel.add_content(window, title, pane) {
            Ok(content) => Ok(content),
            Err(err) => {
                self.panel.host_mut().dispose(window);
                Err(err)
            }
        }
    }

    fn open_document(&mut self, pane: PaneId) -> Result<ContentId, DockError> {
        self.opened += 1;
        let title = format!("doc-{}.txt", self.opened);
        self.add_content(pane, &title)
    }

    fn document_count(&self) -> usize {
        let layout = self.panel.layout();
        self.document_panes
            .iter()
            .filter_map(|p| layout.pane(*p))
            .map(|p| p.contents().len())
            .sum()
    }

    /// Bring a content forward. Its window is shown right away so it can
    /// take focus before the next frame lays it out.
    pub fn activate(&mut self, content: ContentId) {
        let Some(window) = self.panel.layout().content(content).map(|c| c.window()) else {
            return;
        };
        self.panel.host_mut().set_visible(window, true);
        self.panel.activate(content);
    }

    /// Panes that can hold focus, in layout order.
    fn focus_cycle(&self) -> Vec<PaneId> {
        let layout = self.panel.layout();
        layout
            .panes()
            .filter(|(id, pane)| {
                layout.is_attached_pane(*id)
                    && pane.dock_state().is_valid()
                    && pane.active_content().is_some()
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn cycle_pane(&mut self, forward: bool) {
        let order = self.focus_cycle();
        if order.is_empty() {
            return;
        }
        let current = self
            .panel
            .active_pane()
            .and_then(|p| order.iter().position(|id| *id == p));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % order.len(),
            (Some(i), false) => (i + order.len() - 1) % order.len(),
        };
        if let Some(content) = self.panel.layout().pane_active_content(order[next]) {
            self.activate(content);
        }
    }

    fn cycle_tab(&mut self, forward: bool) {
        let Some(pane) = self.panel.active_pane().and_then(|p| self.panel.layout().pane(p)) else {
            return;
        };
        let tabs = pane.contents();
        let Some(index) = pane
            .active_content()
            .and_then(|c| tabs.iter().position(|t| *t == c))
        else {
            return;
        };
        let next = if forward {
            (index + 1) % tabs.len()
        } else {
            (index + tabs.len() - 1) % tabs.len()
        };
        let target = tabs[next];
        self.activate(target);
    }

    fn switch_to_recent(&mut self) {
        if let Some(previous) = self.panel.mru().get(1).copied() {
            self.activate(previous);
        }
    }

    fn close_active(&mut self) {
        let Some(content) = self.panel.active_content() else {
            return;
        };
        match self.panel.close_content(content) {
            Ok(removed) => self.panel.host_mut().dispose(removed.window()),
            Err(err) => tracing::warn!(error = %err, "close failed"),
        }
    }

    fn new_document(&mut self) {
        if self.document_count() >= MAX_DOCUMENTS {
            tracing::debug!("document limit reached");
            return;
        }
        let layout = self.panel.layout();
        let target = self
            .panel
            .active_document_pane()
            .filter(|p| layout.is_attached_pane(*p))
            .or_else(|| layout.default_document_pane())
            .or_else(|| self.document_panes.first().copied());
        let Some(pane) = target else {
            return;
        };
        match self.open_document(pane) {
            Ok(content) => self.activate(content),
            Err(err) => tracing::warn!(error = %err, "could not open document"),
        }
    }

    fn toggle_auto_hide(&mut self) {
        let Some(pane) = self.panel.active_pane() else {
            return;
        };
        let Some(state) = self.panel.layout().pane(pane).map(|p| p.dock_state()) else {
            return;
        };
        let toggled = state.toggle_auto_hide();
        if toggled == state {
            return;
        }
        if let Err(err) = self.panel.set_pane_dock_state(pane, toggled) {
            tracing::warn!(error = %err, "could not change dock state");
        }
    }

    pub fn handle_action(&mut self, action: Action) -> ControlFlow {
        match action {
            Action::Quit => return ControlFlow::Quit,
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::NextPane => self.cycle_pane(true),
            Action::PrevPane => self.cycle_pane(false),
            Action::NextTab => self.cycle_tab(true),
            Action::PrevTab => self.cycle_tab(false),
            Action::CycleRecent => self.switch_to_recent(),
            Action::CloseContent => self.close_active(),
            Action::NewDocument => self.new_document(),
            Action::ToggleAutoHide => self.toggle_auto_hide(),
        }
        ControlFlow::Continue
    }

    fn settle(&mut self) {
        self.panel.pump_focus_events();
        for change in self.panel.take_changes() {
            tracing::debug!(?change, slots = ?self.panel.slots(), "activation changed");
        }
    }
}

impl DockApp for DemoApp {
    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let view = DockView {
            show_help: self.show_help,
            keys: &self.keys,
        };
        self.tabs = render_dock(frame, &mut self.panel, &view);
    }

    fn handle_event(&mut self, event: &Event) -> ControlFlow {
        let flow = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                match self.keys.action_for_key(key) {
                    Some(action @ (Action::Quit | Action::ToggleHelp)) => {
                        self.handle_action(action)
                    }
                    // any other key dismisses the help overlay
                    _ if self.show_help => {
                        self.show_help = false;
                        ControlFlow::Continue
                    }
                    Some(action) => self.handle_action(action),
                    None => ControlFlow::Continue,
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                match tab_at(&self.tabs, mouse.column, mouse.row) {
                    Some(content) => self.activate(content),
                    None => {
                        self.panel.host_mut().handle_terminal_event(event);
                    }
                }
                ControlFlow::Continue
            }
            Event::FocusLost | Event::FocusGained => {
                self.panel.host_mut().handle_terminal_event(event);
                ControlFlow::Continue
            }
            _ => ControlFlow::Continue,
        };
        self.settle();
        flow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn app(documents: usize) -> DemoApp {
        DemoApp::new(DemoOptions {
            documents,
            ..DemoOptions::default()
        })
        .unwrap()
    }

    fn title(app: &DemoApp, content: Option<ContentId>) -> String {
        content
            .and_then(|c| app.panel().layout().content(c))
            .map(|c| c.title().to_string())
            .unwrap_or_default()
    }

    fn press(app: &mut DemoApp, code: KeyCode) -> ControlFlow {
        app.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn draw(app: &mut DemoApp) {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
    }

    #[test]
    fn starts_on_first_document() {
        let a = app(3);
        assert_eq!(title(&a, a.panel().active_content()), "doc-1.txt");
        assert_eq!(title(&a, a.panel().active_document()), "doc-1.txt");
        assert_eq!(a.panel().active_document_pane(), Some(a.document_panes()[0]));
        assert_eq!(a.document_count(), 3);
    }

    #[test]
    fn document_count_is_clamped() {
        assert_eq!(app(0).document_count(), 1);
        assert_eq!(app(100).document_count(), MAX_DOCUMENTS);
    }

    #[test]
    fn recent_key_returns_to_previous_content() {
        let mut a = app(3);
        press(&mut a, KeyCode::Char(']'));
        assert_eq!(title(&a, a.panel().active_content()), "doc-3.txt");
        press(&mut a, KeyCode::Char('r'));
        assert_eq!(title(&a, a.panel().active_content()), "doc-1.txt");
        press(&mut a, KeyCode::Char('r'));
        assert_eq!(title(&a, a.panel().active_content()), "doc-3.txt");
    }

    #[test]
    fn tab_key_walks_panes_in_layout_order() {
        let mut a = app(2);
        // tools, documents, documents, output
        press(&mut a, KeyCode::Tab);
        assert_eq!(title(&a, a.panel().active_content()), "doc-2.txt");
        press(&mut a, KeyCode::Tab);
        assert_eq!(title(&a, a.panel().active_content()), "Output");
        assert!(a.panel().auto_hide_pane().is_some());
        press(&mut a, KeyCode::Tab);
        assert_eq!(title(&a, a.panel().active_content()), "Explorer");
        assert_eq!(a.panel().auto_hide_pane(), None);
        // the document slot still points at the last document
        assert_eq!(title(&a, a.panel().active_document()), "doc-2.txt");
        let back = Event::Key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        a.handle_event(&back);
        assert_eq!(title(&a, a.panel().active_content()), "Output");
    }

    #[test]
    fn closing_falls_back_to_recent_content() {
        let mut a = app(3);
        press(&mut a, KeyCode::Char(']'));
        let closing = a.panel().active_content().unwrap();
        let window = a.panel().layout().content(closing).unwrap().window();
        press(&mut a, KeyCode::Char('w'));
        assert!(a.panel().layout().content(closing).is_none());
        assert!(crate::focus::Windowing::is_disposed(a.panel().host(), window));
        assert_eq!(title(&a, a.panel().active_content()), "doc-1.txt");
        assert!(!a.panel().mru().contains(&closing));
    }

    #[test]
    fn new_document_lands_in_active_document_pane() {
        let mut a = app(1);
        press(&mut a, KeyCode::Char('n'));
        let active = a.panel().active_content();
        assert_eq!(title(&a, active), "doc-2.txt");
        let pane = a.panel().layout().content(active.unwrap()).unwrap().pane();
        assert_eq!(pane, Some(a.document_panes()[0]));
        assert_eq!(a.panel().mru().len(), 2);
    }

    #[test]
    fn open_close_cycles_do_not_grow_the_host() {
        let mut a = app(1);
        let baseline = a.panel().host().control_count();
        for _ in 0..5 {
            press(&mut a, KeyCode::Char('n'));
            press(&mut a, KeyCode::Char('w'));
        }
        assert_eq!(a.panel().host().control_count(), baseline);
    }

    #[test]
    fn toggling_auto_hide_flips_the_tool_pane() {
        let mut a = app(1);
        // the empty second document pane is skipped
        press(&mut a, KeyCode::BackTab);
        assert_eq!(title(&a, a.panel().active_content()), "Explorer");
        let tools = a.panel().active_pane().unwrap();
        press(&mut a, KeyCode::Char('a'));
        assert_eq!(
            a.panel().layout().pane(tools).unwrap().dock_state(),
            DockState::DockLeftAutoHide
        );
        assert_eq!(a.panel().auto_hide_pane(), Some(tools));
        press(&mut a, KeyCode::Char('a'));
        assert_eq!(
            a.panel().layout().pane(tools).unwrap().dock_state(),
            DockState::DockLeft
        );
        assert_eq!(a.panel().auto_hide_pane(), None);
    }

    #[test]
    fn help_overlay_swallows_other_keys() {
        let mut a = app(2);
        press(&mut a, KeyCode::Char('?'));
        assert!(a.show_help());
        let before = a.panel().active_content();
        press(&mut a, KeyCode::Char(']'));
        assert!(!a.show_help());
        assert_eq!(a.panel().active_content(), before);
        assert_eq!(press(&mut a, KeyCode::F(1)), ControlFlow::Continue);
        let quit = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert_eq!(a.handle_event(&quit), ControlFlow::Quit);
    }

    #[test]
    fn clicking_a_background_tab_activates_it() {
        let mut a = app(3);
        draw(&mut a);
        let target = a
            .tabs
            .iter()
            .find(|hit| title(&a, Some(hit.content)) == "doc-3.txt")
            .copied()
            .unwrap();
        a.handle_event(&Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: target.rect.x,
            row: target.rect.y,
            modifiers: KeyModifiers::NONE,
        }));
        assert_eq!(a.panel().active_content(), Some(target.content));
        let changes = a.panel_mut().take_changes();
        assert!(changes.is_empty(), "changes are drained after each event");
    }

    #[test]
    fn terminal_focus_loss_clears_and_restores_the_active_pane() {
        let mut a = app(1);
        let before = a.panel().slots();
        a.handle_event(&Event::FocusLost);
        assert_eq!(a.panel().active_pane(), None);
        a.handle_event(&Event::FocusGained);
        assert_eq!(a.panel().slots(), before);
    }

    #[test]
    fn disabled_hook_never_reports_an_active_pane() {
        let mut a = DemoApp::new(DemoOptions {
            documents: 2,
            focus: FocusTrackingConfig::without_focus_hook(),
        })
        .unwrap();
        press(&mut a, KeyCode::Tab);
        assert_eq!(a.panel().active_pane(), None);
        assert_eq!(a.panel().active_content(), None);
    }
}
