#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure session system that drives the screen state machine.
//!
//! Each frame the adapter hands over the input it observed, in arrival order,
//! together with the events the world broadcast. The session translates them
//! into screen transitions and the gameplay commands those transitions imply.

use snake_arcade_core::{ButtonAction, Command, Event, InputEvent, Key, Screen};
use tracing::info;

/// Screen change performed while handling a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Screen shown before the change.
    pub from: Screen,
    /// Screen shown after the change.
    pub to: Screen,
}

impl Transition {
    /// Reports whether the transition leaves the pause screen for gameplay.
    #[must_use]
    pub fn is_resume(&self) -> bool {
        self.from == Screen::Paused && self.to == Screen::Playing
    }
}

/// Screen state machine translating input into commands.
#[derive(Clone, Debug)]
pub struct Session {
    screen: Screen,
    instructions_origin: Screen,
    quit_requested: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a session showing the main menu.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            screen: Screen::Menu,
            instructions_origin: Screen::Menu,
            quit_requested: false,
        }
    }

    /// Screen currently shown.
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    /// Screen the instructions page returns to.
    #[must_use]
    pub const fn instructions_origin(&self) -> Screen {
        self.instructions_origin
    }

    /// Reports whether the player asked to leave the game.
    #[must_use]
    pub const fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Consumes world events and frame input, emitting gameplay commands and
    /// recording every screen change.
    ///
    /// World events are processed before input. Input arriving after a quit
    /// request is ignored.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: &[InputEvent],
        out: &mut Vec<Command>,
        transitions: &mut Vec<Transition>,
    ) {
        for event in events {
            if let Event::SnakeDied { .. } = event {
                if self.screen == Screen::Playing {
                    self.go_to(Screen::GameOver, transitions);
                }
            }
        }

        for event in input {
            if self.quit_requested {
                return;
            }
            self.handle_input(*event, out, transitions);
        }
    }

    fn handle_input(
        &mut self,
        event: InputEvent,
        out: &mut Vec<Command>,
        transitions: &mut Vec<Transition>,
    ) {
        let action = match event {
            InputEvent::QuitRequested => {
                self.request_quit();
                return;
            }
            InputEvent::Click { button } => button,
            InputEvent::KeyPressed(_) => None,
        };

        match (self.screen, event) {
            (Screen::Menu | Screen::Paused, InputEvent::Click { .. }) => match action {
                Some(ButtonAction::NewGame) => self.start_game(out, transitions),
                Some(ButtonAction::Instructions) => self.open_instructions(transitions),
                Some(ButtonAction::Quit) => self.request_quit(),
                Some(ButtonAction::Resume) if self.screen == Screen::Paused => {
                    self.go_to(Screen::Playing, transitions);
                }
                _ => {}
            },
            (Screen::Playing, InputEvent::KeyPressed(Key::Escape)) => {
                self.go_to(Screen::Paused, transitions);
            }
            (Screen::Playing, InputEvent::KeyPressed(key)) => {
                if let Some(direction) = key.direction() {
                    out.push(Command::SteerSnake { direction });
                }
            }
            (Screen::Paused, InputEvent::KeyPressed(Key::Escape)) => {
                self.go_to(Screen::Playing, transitions);
            }
            (Screen::Instructions, InputEvent::KeyPressed(_) | InputEvent::Click { .. }) => {
                self.go_to(self.instructions_origin, transitions);
            }
            (Screen::GameOver, InputEvent::KeyPressed(Key::Enter)) => {
                self.start_game(out, transitions);
            }
            (Screen::GameOver, InputEvent::KeyPressed(Key::Escape)) => {
                self.go_to(Screen::Menu, transitions);
            }
            _ => {}
        }
    }

    fn start_game(&mut self, out: &mut Vec<Command>, transitions: &mut Vec<Transition>) {
        out.push(Command::NewGame);
        self.go_to(Screen::Playing, transitions);
    }

    fn open_instructions(&mut self, transitions: &mut Vec<Transition>) {
        self.instructions_origin = self.screen;
        self.go_to(Screen::Instructions, transitions);
    }

    fn request_quit(&mut self) {
        info!(screen = ?self.screen, "quit requested");
        self.quit_requested = true;
    }

    fn go_to(&mut self, to: Screen, transitions: &mut Vec<Transition>) {
        let from = self.screen;
        if from == to {
            return;
        }
        info!(?from, ?to, "screen changed");
        self.screen = to;
        transitions.push(Transition { from, to });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_menu() {
        let session = Session::new();
        assert_eq!(session.screen(), Screen::Menu);
        assert!(!session.quit_requested());
    }

    #[test]
    fn resume_transition_is_recognised() {
        let resume = Transition {
            from: Screen::Paused,
            to: Screen::Playing,
        };
        let start = Transition {
            from: Screen::Menu,
            to: Screen::Playing,
        };
        assert!(resume.is_resume());
        assert!(!start.is_resume());
    }
}
