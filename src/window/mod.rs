//! Cell-based windowing layer.
//!
//! [`TerminalHost`] keeps a tree of controls laid out in terminal cells and
//! tracks which one holds keyboard focus. Focus moves are reported through a
//! [`FocusQueue`], or not at all when the host was built without hook
//! support. It is the layer the demo runs on and the one the tests drive.

use std::collections::BTreeMap;

use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;

use crate::focus::{FocusEvent, FocusNotifier, FocusQueue, NullNotifier, WindowHandle, Windowing};

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}

#[derive(Debug, Clone)]
struct Control {
    parent: Option<WindowHandle>,
    children: Vec<WindowHandle>,
    rect: Rect,
    focusable: bool,
    visible: bool,
}

impl Control {
    fn new(parent: Option<WindowHandle>) -> Self {
        Self {
            parent,
            children: Vec::new(),
            rect: Rect::default(),
            focusable: false,
            visible: true,
        }
    }
}

#[derive(Debug)]
pub struct TerminalHost {
    controls: BTreeMap<WindowHandle, Control>,
    next_handle: u64,
    focused: Option<WindowHandle>,
    // focus held when the terminal itself lost focus
    parked_focus: Option<WindowHandle>,
    queue: Option<FocusQueue>,
    null: NullNotifier,
}

impl Default for TerminalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalHost {
    pub fn new() -> Self {
        Self::with_queue(Some(FocusQueue::new()))
    }

    /// A host that cannot report focus changes.
    pub fn without_focus_hook() -> Self {
        Self::with_queue(None)
    }

    fn with_queue(queue: Option<FocusQueue>) -> Self {
        Self {
            controls: BTreeMap::new(),
            next_handle: 1,
            focused: None,
            parked_focus: None,
            queue,
            null: NullNotifier,
        }
    }

    fn notifier(&self) -> &dyn FocusNotifier {
        match &self.queue {
            Some(queue) => queue,
            None => &self.null,
        }
    }

    fn notifier_mut(&mut self) -> &mut dyn FocusNotifier {
        match &mut self.queue {
            Some(queue) => queue,
            None => &mut self.null,
        }
    }

    fn live(&self, handle: WindowHandle) -> Option<&Control> {
        self.controls.get(&handle)
    }

    pub fn create_window(&mut self, parent: Option<WindowHandle>) -> WindowHandle {
        let handle = WindowHandle::new(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        let parent = parent.filter(|p| self.live(*p).is_some());
        if let Some(parent) = parent
            && let Some(entry) = self.controls.get_mut(&parent)
        {
            entry.children.push(handle);
        }
        self.controls.insert(handle, Control::new(parent));
        handle
    }

    /// Live controls in the tree.
    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    pub fn set_focusable(&mut self, handle: WindowHandle, focusable: bool) {
        if let Some(control) = self.controls.get_mut(&handle) {
            control.focusable = focusable;
        }
    }

    pub fn set_rect(&mut self, handle: WindowHandle, rect: Rect) {
        if let Some(control) = self.controls.get_mut(&handle) {
            control.rect = rect;
        }
    }

    pub fn rect(&self, handle: WindowHandle) -> Option<Rect> {
        self.live(handle).map(|c| c.rect)
    }

    pub fn set_visible(&mut self, handle: WindowHandle, visible: bool) {
        if let Some(control) = self.controls.get_mut(&handle) {
            control.visible = visible;
        }
    }

    /// Visible when the control and every ancestor are visible and live.
    pub fn is_visible(&self, handle: WindowHandle) -> bool {
        let mut current = Some(handle);
        while let Some(h) = current {
            match self.live(h) {
                Some(control) if control.visible => current = control.parent,
                _ => return false,
            }
        }
        true
    }

    /// Destroy `handle` and everything beneath it. The subtree is removed
    /// from the tree and focus inside it is dropped.
    pub fn dispose(&mut self, handle: WindowHandle) {
        let Some(root) = self.controls.get(&handle) else {
            return;
        };
        if let Some(parent) = root.parent
            && let Some(entry) = self.controls.get_mut(&parent)
        {
            entry.children.retain(|child| *child != handle);
        }
        let mut stack = vec![handle];
        let mut disposed = Vec::new();
        while let Some(current) = stack.pop() {
            if let Some(control) = self.controls.remove(&current) {
                stack.extend(control.children);
                disposed.push(current);
            }
        }
        if let Some(focused) = self.focused
            && disposed.contains(&focused)
        {
            self.move_focus(None);
        }
        if self.parked_focus.is_some_and(|h| disposed.contains(&h)) {
            self.parked_focus = None;
        }
    }

    fn move_focus(&mut self, target: Option<WindowHandle>) {
        let previous = self.focused;
        if previous == target {
            return;
        }
        self.focused = target;
        if let Some(queue) = &mut self.queue {
            if let Some(window) = previous {
                queue.push(FocusEvent::Lost {
                    window,
                    next: target,
                });
            }
            if let Some(window) = target {
                queue.push(FocusEvent::Gained { window });
            }
        }
    }

    /// Focusable, visible controls beneath `container` in tab order.
    fn tab_order(&self, container: WindowHandle) -> Vec<WindowHandle> {
        let mut order = Vec::new();
        let mut stack: Vec<WindowHandle> = self
            .live(container)
            .map(|c| c.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(current) = stack.pop() {
            let Some(control) = self.live(current) else {
                continue;
            };
            if !control.visible {
                continue;
            }
            if control.focusable {
                order.push(current);
            }
            stack.extend(control.children.iter().rev().copied());
        }
        order
    }

    /// Deepest visible focusable control under the cell, without moving focus.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<WindowHandle> {
        // later controls sit above earlier ones
        self.controls
            .iter()
            .rev()
            .filter(|(_, control)| {
                control.focusable && rect_contains(control.rect, column, row)
            })
            .map(|(handle, _)| *handle)
            .find(|handle| self.is_visible(*handle))
    }

    /// Focus whatever focusable control sits under the cell.
    pub fn focus_at(&mut self, column: u16, row: u16) -> Option<WindowHandle> {
        let target = self.hit_test(column, row)?;
        self.move_focus(Some(target));
        Some(target)
    }

    /// Translate terminal focus and mouse events into focus moves. Returns
    /// true when the event changed focus.
    pub fn handle_terminal_event(&mut self, event: &Event) -> bool {
        match event {
            Event::FocusLost => {
                let Some(focused) = self.focused else {
                    return false;
                };
                self.parked_focus = Some(focused);
                self.move_focus(None);
                true
            }
            Event::FocusGained => {
                let Some(parked) = self.parked_focus.take() else {
                    return false;
                };
                if self.focused.is_some() || self.live(parked).is_none() {
                    return false;
                }
                self.move_focus(Some(parked));
                true
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let before = self.focused;
                self.focus_at(mouse.column, mouse.row);
                before != self.focused
            }
            _ => false,
        }
    }
}

impl FocusNotifier for TerminalHost {
    fn is_supported(&self) -> bool {
        self.notifier().is_supported()
    }

    fn install(&mut self) {
        self.notifier_mut().install();
    }

    fn uninstall(&mut self) {
        self.notifier_mut().uninstall();
    }

    fn is_installed(&self) -> bool {
        self.notifier().is_installed()
    }

    fn drain_focus_events(&mut self) -> Vec<FocusEvent> {
        self.notifier_mut().drain_focus_events()
    }
}

impl Windowing for TerminalHost {
    fn focused(&self) -> Option<WindowHandle> {
        self.focused
    }

    fn control_from_child(&self, handle: WindowHandle) -> Option<WindowHandle> {
        self.live(handle).map(|_| handle)
    }

    fn parent(&self, handle: WindowHandle) -> Option<WindowHandle> {
        self.live(handle).and_then(|c| c.parent)
    }

    fn is_disposed(&self, handle: WindowHandle) -> bool {
        self.live(handle).is_none()
    }

    fn set_focus(&mut self, handle: WindowHandle) -> bool {
        if self.live(handle).is_none() {
            return false;
        }
        self.move_focus(Some(handle));
        true
    }

    fn select_next_control(&mut self, container: WindowHandle) -> bool {
        let order = self.tab_order(container);
        let target = if order.is_empty() {
            // a focusable container with no focusable children takes focus itself
            self.live(container)
                .filter(|c| c.focusable && c.visible)
                .map(|_| container)
        } else {
            let next = self
                .focused
                .and_then(|focused| order.iter().position(|h| *h == focused))
                .map(|index| (index + 1) % order.len())
                .unwrap_or(0);
            order.get(next).copied()
        };
        match target {
            Some(target) => {
                self.move_focus(Some(target));
                true
            }
            None => false,
        }
    }
}
