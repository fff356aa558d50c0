mod game;
mod menu;
mod options;
mod records;
mod skins;

use serde::{Deserialize, Serialize};
use strum::Display;

pub use crate::action::game::GameAction;
pub use crate::action::menu::MenuAction;
pub use crate::action::options::OptionsAction;
pub use crate::action::records::RecordsAction;
pub use crate::action::skins::SkinsAction;

/// Key phase for hold-style bindings: Start on press, Repeat while
/// held, End on release. Click bindings always carry Start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, Deserialize, Default)]
pub enum ActionState {
    #[default]
    Start,
    Repeat,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Deserialize)]
pub enum Command {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    Refresh,
    Error(String),
    ToggleShowHelp,
    // Navigation between screens
    StartGame,
    ShowSkins,
    ShowRecords,
    ShowOptions,
    BackToMenu,
    /// A play session ended with this final score.
    FinishRound(u32),
    // Page-scoped actions
    Menu(MenuAction),
    Game(GameAction),
    Skins(SkinsAction),
    Records(RecordsAction),
    Options(OptionsAction),
}

impl Command {
    /// Display name for the help overlay; page commands show the inner
    /// action instead of the wrapper variant.
    pub fn string(&self) -> String {
        match self {
            Command::Menu(a) => a.to_string(),
            Command::Game(a) => a.to_string(),
            Command::Skins(a) => a.to_string(),
            Command::Records(a) => a.to_string(),
            Command::Options(a) => a.to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub command: Command,
    pub state: ActionState,
}

macro_rules! act {
    ($command:expr) => {
        $crate::action::Action { command: $command, state: $crate::action::ActionState::default() }
    };
    ($command:expr, $state:expr) => {
        $crate::action::Action { command: $command, state: $state }
    };
}

pub(crate) use act;
