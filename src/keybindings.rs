use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    ToggleHelp,
    // Pane and tab navigation
    NextPane,
    PrevPane,
    NextTab,
    PrevTab,
    // Jump back to the previously active content
    CycleRecent,
    CloseContent,
    NewDocument,
    ToggleAutoHide,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::ToggleHelp => "Toggle help",
            Action::NextPane => "Focus next pane",
            Action::PrevPane => "Focus previous pane",
            Action::NextTab => "Next tab in pane",
            Action::PrevTab => "Previous tab in pane",
            Action::CycleRecent => "Switch to most recent content",
            Action::CloseContent => "Close active content",
            Action::NewDocument => "New document",
            Action::ToggleAutoHide => "Toggle auto-hide for active pane",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        // terminals report BackTab with or without SHIFT
        let mods = if key.code == KeyCode::BackTab {
            key.modifiers.difference(KeyModifiers::SHIFT)
        } else {
            key.modifiers
        };
        key.code == self.code && mods == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "Shift+Tab".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Ordered action table; the first matching binding wins.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: Vec<(Action, KeyCombo)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::empty();
        kb.add(Quit, KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        kb.add(ToggleHelp, KeyCombo::plain(KeyCode::F(1)));
        kb.add(ToggleHelp, KeyCombo::plain(KeyCode::Char('?')));
        kb.add(NextPane, KeyCombo::plain(KeyCode::Tab));
        kb.add(PrevPane, KeyCombo::plain(KeyCode::BackTab));
        kb.add(NextTab, KeyCombo::plain(KeyCode::Char(']')));
        kb.add(PrevTab, KeyCombo::plain(KeyCode::Char('[')));
        kb.add(CycleRecent, KeyCombo::plain(KeyCode::Char('r')));
        kb.add(CycleRecent, KeyCombo::new(KeyCode::Char('e'), KeyModifiers::CONTROL));
        kb.add(CloseContent, KeyCombo::plain(KeyCode::Char('w')));
        kb.add(NewDocument, KeyCombo::plain(KeyCode::Char('n')));
        kb.add(ToggleAutoHide, KeyCombo::plain(KeyCode::Char('a')));
        kb
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.bindings.push((action, combo));
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.bindings
            .iter()
            .any(|(act, combo)| *act == action && combo.matches(key))
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(_, combo)| combo.matches(key))
            .map(|(action, _)| *action)
    }

    /// Actions in binding order, each with every combo bound to it.
    pub fn help_entries(&self) -> Vec<(Action, Vec<String>)> {
        let mut entries: Vec<(Action, Vec<String>)> = Vec::new();
        for (action, combo) in &self.bindings {
            match entries.iter_mut().find(|(a, _)| a == action) {
                Some((_, combos)) => combos.push(combo.display()),
                None => entries.push((*action, vec![combo.display()])),
            }
        }
        entries
    }
}
