//! Key-to-action mapping.
//!
//! Presses are dispatched as they arrive, one action per press event. OS
//! auto-repeat events count as presses, so holding the pause key keeps
//! toggling. Nothing is debounced.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    F3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TogglePause,
    ToggleDebug,
}

#[derive(Debug, Clone, Copy)]
pub struct KeyBindings {
    pub pause: Key,
    pub debug: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            pause: Key::Space,
            debug: Key::F3,
        }
    }
}

impl KeyBindings {
    pub fn action_for(&self, key: Key) -> Option<Action> {
        if key == self.pause {
            Some(Action::TogglePause)
        } else if key == self.debug {
            Some(Action::ToggleDebug)
        } else {
            None
        }
    }
}
