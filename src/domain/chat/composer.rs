//! Draft input and keypress handling for the message box.
//!
//! Enter without a modifier is a submit request, identical to pressing the
//! send control. Enter with any modifier inserts a literal newline instead.

/// Modifier keys held during a keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

/// A key relevant to the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Char(char),
}

/// A key together with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

/// What the caller should do after a keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerAction {
    /// Draft was edited (or nothing happened).
    Edited,
    /// Caller should submit the current draft.
    Submit,
}

/// The user's unsent draft.
///
/// The draft is not cleared on `Submit`; the caller clears it once the
/// session has accepted the submission, so a rejected submit keeps the text.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    draft: String,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, press: KeyPress) -> ComposerAction {
        match press.key {
            Key::Enter if !press.modifiers.any() => ComposerAction::Submit,
            Key::Enter => {
                self.draft.push('\n');
                ComposerAction::Edited
            }
            Key::Backspace => {
                self.draft.pop();
                ComposerAction::Edited
            }
            Key::Char(c) => {
                self.draft.push(c);
                ComposerAction::Edited
            }
        }
    }

    /// Appends text as if typed.
    pub fn type_str(&mut self, text: &str) {
        self.draft.push_str(text);
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// True when the draft has non-whitespace content.
    pub fn has_content(&self) -> bool {
        !self.draft.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.draft.clear();
    }
}
