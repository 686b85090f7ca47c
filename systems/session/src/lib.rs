#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session system: the top-level screen machine that frames gameplay.
//!
//! The session decides which screen is active (menu, gameplay, controls,
//! game over, victory) and gates both input delivery and tick delivery while
//! gameplay is suspended. Screen changes are driven by menu inputs from the
//! adapter and by world events; the system answers with command batches like
//! every other pure system.

use girder_rescue_core::{Command, Event, LifePhase, Screen};

/// Menu-level inputs forwarded by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionInput {
    /// Begin a fresh game from the menu.
    Start,
    /// Open the control reference screen.
    ShowControls,
    /// Return to the menu.
    Back,
    /// Start over after game over or victory.
    Restart,
    /// Suspend or resume gameplay.
    TogglePause,
}

/// Read-only view of the world state the session needs.
#[derive(Clone, Copy, Debug)]
pub struct SessionView {
    /// Lives remaining in the shared tally.
    pub lives: u32,
    /// Current life-state phase of the player.
    pub life_phase: LifePhase,
}

/// Pure system owning the screen state machine.
#[derive(Debug)]
pub struct Session {
    screen: Screen,
    paused: bool,
}

impl Session {
    /// Creates a session resting on the title menu.
    #[must_use]
    pub fn new() -> Self {
        Self {
            screen: Screen::Menu,
            paused: false,
        }
    }

    /// The currently active screen.
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Whether gameplay input and ticks should be delivered.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.screen == Screen::Playing && !self.paused
    }

    /// Whether gameplay is suspended by the pause flag.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    fn change_screen(&mut self, to: Screen) {
        if self.screen == to {
            return;
        }
        log::info!("screen {:?} -> {to:?}", self.screen);
        self.screen = to;
        self.paused = false;
    }

    /// Reacts to a menu-level input, emitting commands for the next pass.
    ///
    /// Starting or restarting resets shared progress; the adapter observes
    /// the transition into [`Screen::Playing`] and supplies the first level's
    /// blueprint.
    pub fn handle_input(&mut self, input: SessionInput, out: &mut Vec<Command>) {
        match (self.screen, input) {
            (Screen::Menu, SessionInput::Start) => {
                out.push(Command::ResetProgress);
                self.change_screen(Screen::Playing);
            }
            (Screen::Menu, SessionInput::ShowControls) => {
                self.change_screen(Screen::Controls);
            }
            (Screen::Controls, SessionInput::Back) => {
                self.change_screen(Screen::Menu);
            }
            (Screen::GameOver | Screen::Victory, SessionInput::Restart) => {
                out.push(Command::ResetProgress);
                self.change_screen(Screen::Playing);
            }
            (Screen::GameOver | Screen::Victory, SessionInput::Back) => {
                self.change_screen(Screen::Menu);
            }
            (Screen::Playing, SessionInput::TogglePause) => {
                self.paused = !self.paused;
                log::debug!("pause toggled: {}", self.paused);
            }
            _ => {}
        }
    }

    /// Consumes world events and the session view to advance the screen.
    pub fn handle_events(&mut self, events: &[Event], view: SessionView) {
        if self.screen != Screen::Playing {
            return;
        }

        if events
            .iter()
            .any(|event| matches!(event, Event::GameCompleted))
        {
            self.change_screen(Screen::Victory);
            return;
        }

        if view.lives == 0 && view.life_phase == LifePhase::Dead {
            self.change_screen(Screen::GameOver);
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
