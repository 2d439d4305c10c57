//! Rendering for the dock demo.
//!
//! Each frame lays the attached panes out by dock state, draws their tab
//! strips and pushes the resulting rectangles and visibility back into the
//! [`TerminalHost`], so mouse hit testing and tab order always follow what is
//! on screen. Only the active tab of a pane is visible; an auto-hide pane is
//! shown only while it is the active pane.

use indoc::indoc;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::constants::{
    AUTO_HIDE_PANE_HEIGHT, AUTO_HIDE_STRIP_HEIGHT, STATUS_BAR_HEIGHT, STATUS_MRU_LEN,
    TAB_STRIP_HEIGHT, TOOL_PANE_WIDTH,
};
use crate::dock::{ContentId, DockState, PaneId};
use crate::focus::{FocusNotifier, WindowHandle, Windowing};
use crate::keybindings::KeyBindings;
use crate::panel::DockPanel;
use crate::window::TerminalHost;

/// Clickable tab cell produced by the last render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabHit {
    pub rect: Rect,
    pub content: ContentId,
}

pub fn tab_at(hits: &[TabHit], column: u16, row: u16) -> Option<ContentId> {
    hits.iter()
        .find(|hit| crate::window::rect_contains(hit.rect, column, row))
        .map(|hit| hit.content)
}

pub struct DockView<'a> {
    pub show_help: bool,
    pub keys: &'a KeyBindings,
}

#[derive(Debug, Clone)]
struct Tab {
    content: ContentId,
    title: String,
    window: WindowHandle,
}

#[derive(Debug, Clone)]
struct PaneView {
    id: PaneId,
    window: WindowHandle,
    state: DockState,
    tabs: Vec<Tab>,
    active: Option<ContentId>,
}

fn collect_panes(panel: &DockPanel<TerminalHost>) -> Vec<PaneView> {
    let layout = panel.layout();
    layout
        .panes()
        .filter(|(id, _)| layout.is_attached_pane(*id))
        .map(|(id, pane)| PaneView {
            id,
            window: pane.window(),
            state: pane.dock_state(),
            tabs: pane
                .contents()
                .iter()
                .filter_map(|c| {
                    layout.content(*c).map(|content| Tab {
                        content: *c,
                        title: content.title().to_string(),
                        window: content.window(),
                    })
                })
                .collect(),
            active: pane.active_content(),
        })
        .collect()
}

fn state_label(state: DockState) -> &'static str {
    match state {
        DockState::Document => "Documents",
        DockState::DockLeft | DockState::DockLeftAutoHide => "Left",
        DockState::DockRight | DockState::DockRightAutoHide => "Right",
        DockState::DockTop | DockState::DockTopAutoHide => "Top",
        DockState::DockBottom | DockState::DockBottomAutoHide => "Bottom",
        DockState::Float => "Float",
        DockState::Hidden | DockState::Unknown => "Hidden",
    }
}

/// Split `area` into equal slices along one axis.
fn split_even(area: Rect, count: usize, horizontal: bool) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let constraints = (0..count).map(|_| Constraint::Ratio(1, count as u32));
    let layout = if horizontal {
        Layout::horizontal(constraints)
    } else {
        Layout::vertical(constraints)
    };
    layout.split(area).to_vec()
}

fn edge_size(present: bool, size: u16) -> Constraint {
    Constraint::Length(if present { size } else { 0 })
}

/// Draw the whole dock and return the tab hit map for mouse routing.
pub fn render_dock(
    frame: &mut Frame<'_>,
    panel: &mut DockPanel<TerminalHost>,
    view: &DockView<'_>,
) -> Vec<TabHit> {
    let panes = collect_panes(panel);
    let active_pane = panel.active_pane();
    let sliding = panel.auto_hide_pane();

    let host = panel.host_mut();
    for pane in &panes {
        host.set_visible(pane.window, false);
        for tab in &pane.tabs {
            host.set_visible(tab.window, false);
        }
    }

    let with_state = |pred: fn(DockState) -> bool| -> Vec<&PaneView> {
        panes.iter().filter(|p| pred(p.state)).collect()
    };
    let left = with_state(|s| s == DockState::DockLeft);
    let right = with_state(|s| s == DockState::DockRight);
    let top = with_state(|s| s == DockState::DockTop);
    let bottom = with_state(|s| s == DockState::DockBottom);
    let documents = with_state(|s| s == DockState::Document);
    let hidden = with_state(DockState::is_auto_hide);

    let rows = Layout::vertical([
        Constraint::Min(1),
        edge_size(!hidden.is_empty(), AUTO_HIDE_STRIP_HEIGHT),
        Constraint::Length(STATUS_BAR_HEIGHT),
    ])
    .split(frame.area());
    let (main, strip, status) = (rows[0], rows[1], rows[2]);

    let columns = Layout::horizontal([
        edge_size(!left.is_empty(), TOOL_PANE_WIDTH),
        Constraint::Min(1),
        edge_size(!right.is_empty(), TOOL_PANE_WIDTH),
    ])
    .split(main);
    let center = Layout::vertical([
        edge_size(!top.is_empty(), AUTO_HIDE_PANE_HEIGHT),
        Constraint::Min(1),
        edge_size(!bottom.is_empty(), AUTO_HIDE_PANE_HEIGHT),
    ])
    .split(columns[1]);

    let mut placed: Vec<(&PaneView, Rect)> = Vec::new();
    placed.extend(left.iter().copied().zip(split_even(columns[0], left.len(), false)));
    placed.extend(right.iter().copied().zip(split_even(columns[2], right.len(), false)));
    placed.extend(top.iter().copied().zip(split_even(center[0], top.len(), true)));
    placed.extend(documents.iter().copied().zip(split_even(center[1], documents.len(), true)));
    placed.extend(bottom.iter().copied().zip(split_even(center[2], bottom.len(), true)));

    let mut hits = Vec::new();
    for (pane, rect) in &placed {
        hits.extend(draw_pane(frame, host, pane, *rect, active_pane == Some(pane.id)));
    }

    hits.extend(draw_auto_hide_strip(frame, &hidden, strip, sliding));
    if let Some(pane) = hidden.iter().find(|p| Some(p.id) == sliding) {
        let height = AUTO_HIDE_PANE_HEIGHT.min(main.height);
        let slide = Rect {
            x: main.x,
            y: main.y + main.height - height,
            width: main.width,
            height,
        };
        frame.render_widget(Clear, slide);
        hits.extend(draw_pane(frame, host, pane, slide, true));
    }

    draw_status(frame, panel, status);
    if view.show_help {
        draw_help(frame, view.keys);
    }
    hits
}

fn draw_pane(
    frame: &mut Frame<'_>,
    host: &mut TerminalHost,
    pane: &PaneView,
    rect: Rect,
    active: bool,
) -> Vec<TabHit> {
    if rect.width == 0 || rect.height == 0 {
        return Vec::new();
    }
    host.set_rect(pane.window, rect);
    host.set_visible(pane.window, true);

    let border = if active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::bordered()
        .border_style(border)
        .title(format!(" {} ", state_label(pane.state)));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);
    if inner.width == 0 || inner.height == 0 {
        return Vec::new();
    }

    let strip = Rect {
        height: TAB_STRIP_HEIGHT.min(inner.height),
        ..inner
    };
    let hits = draw_tabs(frame.buffer_mut(), strip, &pane.tabs, pane.active);

    let body = Rect {
        y: inner.y + strip.height,
        height: inner.height - strip.height,
        ..inner
    };
    let Some(tab) = pane.tabs.iter().find(|t| Some(t.content) == pane.active) else {
        return hits;
    };
    host.set_rect(tab.window, body);
    host.set_visible(tab.window, true);
    if body.height > 0 {
        let focused = host.focused() == Some(tab.window);
        let marker = if focused { "focused" } else { "" };
        let text = vec![
            Line::from(Span::styled(
                tab.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(marker),
        ];
        frame.render_widget(Paragraph::new(text), body);
    }
    hits
}

fn draw_tabs(
    buffer: &mut Buffer,
    strip: Rect,
    tabs: &[Tab],
    active: Option<ContentId>,
) -> Vec<TabHit> {
    let mut hits = Vec::new();
    let end = strip.x.saturating_add(strip.width);
    let mut x = strip.x;
    for tab in tabs {
        if x >= end {
            break;
        }
        let label = format!(" {} ", tab.title);
        let style = if Some(tab.content) == active {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        safe_set_string(buffer, strip, x, strip.y, &label, style);
        let width = (label.chars().count() as u16).min(end - x);
        hits.push(TabHit {
            rect: Rect {
                x,
                y: strip.y,
                width,
                height: 1,
            },
            content: tab.content,
        });
        x = x.saturating_add(width).saturating_add(1);
    }
    hits
}

fn draw_auto_hide_strip(
    frame: &mut Frame<'_>,
    panes: &[&PaneView],
    strip: Rect,
    sliding: Option<PaneId>,
) -> Vec<TabHit> {
    if strip.height == 0 {
        return Vec::new();
    }
    let tabs: Vec<Tab> = panes.iter().flat_map(|p| p.tabs.iter().cloned()).collect();
    let shown = panes
        .iter()
        .find(|p| Some(p.id) == sliding)
        .and_then(|p| p.active);
    draw_tabs(frame.buffer_mut(), strip, &tabs, shown)
}

fn draw_status(frame: &mut Frame<'_>, panel: &DockPanel<TerminalHost>, area: Rect) {
    if area.height == 0 {
        return;
    }
    let layout = panel.layout();
    let title = |c: Option<ContentId>| {
        c.and_then(|id| layout.content(id))
            .map(|content| content.title().to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let pane = panel
        .active_pane()
        .and_then(|p| layout.pane(p))
        .map(|p| state_label(p.dock_state()))
        .unwrap_or("-");
    let recent: Vec<String> = panel
        .mru()
        .into_iter()
        .take(STATUS_MRU_LEN)
        .map(|c| title(Some(c)))
        .collect();
    let left = format!(
        " pane {} | content {} | document {} | recent {}",
        pane,
        title(panel.active_content()),
        title(panel.active_document()),
        recent.join(" > ")
    );
    let hook = if !panel.host().is_installed() {
        "hook: off "
    } else if panel.is_focus_tracking_suspended() {
        "hook: suspended "
    } else {
        "hook: on "
    };

    let style = Style::default().add_modifier(Modifier::REVERSED);
    let buffer = frame.buffer_mut();
    buffer.set_style(area, style);
    safe_set_string(buffer, area, area.x, area.y, &left, style);
    let hook_width = hook.chars().count() as u16;
    if hook_width + (left.chars().count() as u16) < area.width {
        safe_set_string(buffer, area, area.x + area.width - hook_width, area.y, hook, style);
    }
}

const HELP_HEADER: &str = indoc! {"
    Click a tab or a pane body to focus it.
    The status bar follows the active content,
    document and pane as focus moves.
"};

fn draw_help(frame: &mut Frame<'_>, keys: &KeyBindings) {
    let mut lines: Vec<Line> = HELP_HEADER.lines().map(Line::from).collect();
    lines.push(Line::from(""));
    for (action, combos) in keys.help_entries() {
        lines.push(Line::from(format!("{:<14} {}", combos.join(", "), action)));
    }
    let area = frame.area();
    let width = 56.min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let rect = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title(" Help ")),
        rect,
    );
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    let bounds = bounds.intersection(buffer.area);
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let text = truncate_to_width(text, max_x.saturating_sub(x) as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}
