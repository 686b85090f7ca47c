//! Scripted input playback for headless runs.
//!
//! Scripts are TOML files holding a list of directives:
//!
//! ```toml
//! [[directive]]
//! tick = 30
//! action = "right"
//!
//! [[directive]]
//! tick = 90
//! action = "right"
//! pressed = false
//! ```
//!
//! Directives are replayed in tick order regardless of file order, which
//! keeps replays deterministic for a given seed.

use anyhow::{Context, Result};
use girder_rescue_core::InputIntent;
use serde::Deserialize;

/// Action a directive performs when its tick arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ScriptAction {
    /// Hold or release leftward walking.
    Left,
    /// Hold or release rightward walking.
    Right,
    /// Hold or release upward climbing.
    Up,
    /// Hold or release downward climbing.
    Down,
    /// Press or release the jump key.
    Jump,
    /// Toggle the pause flag (release directives are ignored).
    Pause,
}

impl ScriptAction {
    /// Gameplay intent carried by the action, `None` for menu-level actions.
    pub(crate) fn intent(self) -> Option<InputIntent> {
        match self {
            Self::Left => Some(InputIntent::MoveLeft),
            Self::Right => Some(InputIntent::MoveRight),
            Self::Up => Some(InputIntent::ClimbUp),
            Self::Down => Some(InputIntent::ClimbDown),
            Self::Jump => Some(InputIntent::Jump),
            Self::Pause => None,
        }
    }
}

/// Single timed entry in a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub(crate) struct Directive {
    /// Tick on which the directive fires.
    pub(crate) tick: u64,
    /// Action performed.
    pub(crate) action: ScriptAction,
    /// Whether the key goes down or up.
    #[serde(default = "default_pressed")]
    pub(crate) pressed: bool,
}

fn default_pressed() -> bool {
    true
}

#[derive(Deserialize)]
struct ScriptFile {
    #[serde(default)]
    directive: Vec<Directive>,
}

/// Parsed script with a replay cursor.
#[derive(Debug)]
pub(crate) struct InputScript {
    directives: Vec<Directive>,
    cursor: usize,
}

impl InputScript {
    /// A script with no directives.
    pub(crate) fn empty() -> Self {
        Self {
            directives: Vec::new(),
            cursor: 0,
        }
    }

    /// Parses a TOML script, sorting directives by tick.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        let file: ScriptFile = toml::from_str(text).context("malformed input script")?;
        let mut directives = file.directive;
        directives.sort_by_key(|directive| directive.tick);
        Ok(Self {
            directives,
            cursor: 0,
        })
    }

    /// Directives due at or before `tick` that have not yet been replayed.
    pub(crate) fn take_due(&mut self, tick: u64) -> &[Directive] {
        let start = self.cursor;
        while self.cursor < self.directives.len() && self.directives[self.cursor].tick <= tick {
            self.cursor += 1;
        }
        &self.directives[start..self.cursor]
    }
}
