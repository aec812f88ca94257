//! Application Mode State Machine
//!
//! Decides which handler, if any, may interpret an input in the current
//! mode. Transitions themselves are applied by the dispatcher through
//! [`GameState::set_mode`](crate::game::state::GameState::set_mode).

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::game::input::{InputEvent, InputType};

/// Application phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum AppMode {
    /// Startup not finished
    #[default]
    Uninitialised = 0,
    /// Started, main loop not yet entered
    Ready = 1,
    /// Player select screen
    Menu = 2,
    /// Round in progress
    Playing = 3,
    /// Round over, process still alive
    Finished = 4,
    /// User quit (terminal)
    Quit = 5,
    /// Queue failure (terminal)
    Error = 6,
}

impl AppMode {
    /// Quit and Error end the process.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, AppMode::Quit | AppMode::Error)
    }

    /// Is `self -> next` a legal transition?
    pub fn can_transition_to(self, next: AppMode) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            AppMode::Uninitialised => false,
            AppMode::Ready => self == AppMode::Uninitialised,
            AppMode::Menu => self == AppMode::Ready,
            AppMode::Playing => self == AppMode::Menu,
            AppMode::Finished => self == AppMode::Playing,
            AppMode::Quit | AppMode::Error => true,
        }
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppMode::Uninitialised => "uninitialised",
            AppMode::Ready => "ready",
            AppMode::Menu => "menu",
            AppMode::Playing => "playing",
            AppMode::Finished => "finished",
            AppMode::Quit => "quit",
            AppMode::Error => "error",
        };
        f.write_str(name)
    }
}

/// Where an input goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputRoute {
    /// Long Back: quit from any mode
    Quit,
    /// Player select handler
    Menu,
    /// In-game handler
    Game,
    /// Not legal here; drop without touching state
    Ignore,
}

/// Route an input for the current mode.
pub fn route_input(mode: AppMode, input: &InputEvent) -> InputRoute {
    if mode.is_terminal() {
        return InputRoute::Ignore;
    }

    if input.is_quit() {
        return InputRoute::Quit;
    }

    if input.kind != InputType::Short {
        return InputRoute::Ignore;
    }

    match mode {
        AppMode::Menu => InputRoute::Menu,
        AppMode::Playing => InputRoute::Game,
        _ => InputRoute::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::input::InputKey;

    const ALL_MODES: [AppMode; 7] = [
        AppMode::Uninitialised,
        AppMode::Ready,
        AppMode::Menu,
        AppMode::Playing,
        AppMode::Finished,
        AppMode::Quit,
        AppMode::Error,
    ];

    #[test]
    fn test_long_back_quits_from_every_live_mode() {
        let quit = InputEvent::long(InputKey::Back);
        for mode in ALL_MODES {
            let expected = if mode.is_terminal() { InputRoute::Ignore } else { InputRoute::Quit };
            assert_eq!(route_input(mode, &quit), expected, "mode {mode}");
        }
    }

    #[test]
    fn test_short_inputs_route_by_mode() {
        let ok = InputEvent::short(InputKey::Ok);
        assert_eq!(route_input(AppMode::Menu, &ok), InputRoute::Menu);
        assert_eq!(route_input(AppMode::Playing, &ok), InputRoute::Game);
        assert_eq!(route_input(AppMode::Ready, &ok), InputRoute::Ignore);
        assert_eq!(route_input(AppMode::Finished, &ok), InputRoute::Ignore);
        assert_eq!(route_input(AppMode::Uninitialised, &ok), InputRoute::Ignore);
    }

    #[test]
    fn test_edges_and_repeats_ignored() {
        for kind in [InputType::Press, InputType::Release, InputType::Repeat] {
            let input = InputEvent::new(InputKey::Up, kind);
            assert_eq!(route_input(AppMode::Playing, &input), InputRoute::Ignore);
            assert_eq!(route_input(AppMode::Menu, &input), InputRoute::Ignore);
        }
        // Long press of anything but Back is not a quit.
        assert_eq!(
            route_input(AppMode::Playing, &InputEvent::long(InputKey::Ok)),
            InputRoute::Ignore
        );
    }

    #[test]
    fn test_transition_table() {
        assert!(AppMode::Uninitialised.can_transition_to(AppMode::Ready));
        assert!(AppMode::Ready.can_transition_to(AppMode::Menu));
        assert!(AppMode::Menu.can_transition_to(AppMode::Playing));
        assert!(AppMode::Playing.can_transition_to(AppMode::Finished));

        assert!(!AppMode::Menu.can_transition_to(AppMode::Finished));
        assert!(!AppMode::Finished.can_transition_to(AppMode::Playing));
        assert!(!AppMode::Quit.can_transition_to(AppMode::Error));
        assert!(!AppMode::Error.can_transition_to(AppMode::Quit));

        for mode in ALL_MODES.into_iter().filter(|m| !m.is_terminal()) {
            assert!(mode.can_transition_to(AppMode::Quit));
            assert!(mode.can_transition_to(AppMode::Error));
        }
    }
}
