#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Poll interval elapsed without input; live deliveries are drained on it.
    Tick,
    QuitRequested,
    InputKey(KeyInput),
}

/// A key press. Printable keys carry the character, others a lowercase name
/// such as `enter`, `backspace`, `up`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }

    /// Returns the character for a single printable key.
    pub fn printable(&self) -> Option<char> {
        if self.ctrl {
            return None;
        }

        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_accepts_single_characters_only() {
        assert_eq!(KeyInput::new("a", false).printable(), Some('a'));
        assert_eq!(KeyInput::new("ж", false).printable(), Some('ж'));
        assert_eq!(KeyInput::new("enter", false).printable(), None);
        assert_eq!(KeyInput::new("a", true).printable(), None);
    }
}
