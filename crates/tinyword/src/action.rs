use std::collections::HashMap;

use maplit::hashmap;
use tinyword_core::StyleTag;
use tinyword_term::event::{Event, KeyCode, KeyEvent, Modifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,

    /// Start of the screen row.
    Home,
    /// End of the screen row.
    End,

    DocumentStart,
    DocumentEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    InsertChar(char),
    InsertString(String),

    Backspace,
    Delete,

    Move(Motion),
    Select(Motion),
    SelectAll,
    ClearSelection,

    ApplyStyle(StyleTag),

    Quit,
}

pub struct KeyMap {
    keys: HashMap<KeyEvent, Action>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::basic()
    }
}

impl KeyMap {
    pub fn basic() -> Self {
        let key = KeyEvent::new;
        let shift = |key_code| KeyEvent::new_with_mods(key_code, Modifiers::SHIFT);
        let ctrl = |key_code| KeyEvent::new_with_mods(key_code, Modifiers::CTRL);

        let keys = hashmap! {
            key(KeyCode::Left) => Action::Move(Motion::Left),
            key(KeyCode::Right) => Action::Move(Motion::Right),
            key(KeyCode::Up) => Action::Move(Motion::Up),
            key(KeyCode::Down) => Action::Move(Motion::Down),
            key(KeyCode::Home) => Action::Move(Motion::Home),
            key(KeyCode::End) => Action::Move(Motion::End),
            ctrl(KeyCode::Home) => Action::Move(Motion::DocumentStart),
            ctrl(KeyCode::End) => Action::Move(Motion::DocumentEnd),

            shift(KeyCode::Left) => Action::Select(Motion::Left),
            shift(KeyCode::Right) => Action::Select(Motion::Right),
            shift(KeyCode::Up) => Action::Select(Motion::Up),
            shift(KeyCode::Down) => Action::Select(Motion::Down),
            shift(KeyCode::Home) => Action::Select(Motion::Home),
            shift(KeyCode::End) => Action::Select(Motion::End),

            KeyEvent::ctrl('A') => Action::SelectAll,
            key(KeyCode::Escape) => Action::ClearSelection,

            key(KeyCode::Return) => Action::InsertChar('\n'),
            key(KeyCode::Newline) => Action::InsertChar('\n'),
            key(KeyCode::Tab) => Action::InsertChar('\t'),
            key(KeyCode::Backspace) => Action::Backspace,
            key(KeyCode::Delete) => Action::Delete,

            KeyEvent::ctrl('B') => Action::ApplyStyle(StyleTag::Bold),
            KeyEvent::ctrl('R') => Action::ApplyStyle(StyleTag::Red),
            KeyEvent::ctrl('N') => Action::ApplyStyle(StyleTag::Normal),
            KeyEvent::ctrl('K') => Action::ApplyStyle(StyleTag::Code),
            key(KeyCode::Fn(1)) => Action::ApplyStyle(StyleTag::Bold),
            key(KeyCode::Fn(2)) => Action::ApplyStyle(StyleTag::Red),
            key(KeyCode::Fn(3)) => Action::ApplyStyle(StyleTag::Normal),

            KeyEvent::ctrl('Q') => Action::Quit,
        };

        Self { keys }
    }

    /// The action for a keyboard or paste event. Mouse events are handled by
    /// the editor directly.
    pub fn get_action(&self, event: &Event) -> Option<Action> {
        match event {
            Event::Paste(s) => Some(Action::InsertString(s.clone())),

            Event::Key(KeyEvent {
                key_code: KeyCode::Char(ch),
                modifiers,
            }) if (Modifiers::SHIFT).contains(*modifiers) => Some(Action::InsertChar(*ch)),

            Event::Key(key) => self.keys.get(key).cloned(),

            _ => None,
        }
    }
}
