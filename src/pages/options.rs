use std::collections::HashMap;

use color_eyre::eyre::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{layout::Flex, layout::Position, prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;

use super::{Page, PageId};
use crate::{
    action::{act, Action, Command, OptionsAction},
    config::PageKeyBindings,
    store::{Settings, Store},
};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum OptionEntry {
    Difficulty,
    Back,
}

pub struct OptionsPage {
    pub action_tx: Option<UnboundedSender<Action>>,
    pub keymap: PageKeyBindings,
    store: Store,
    settings: Settings,
    entries: Vec<OptionEntry>,
    selected_index: usize,
    regions: Vec<(Rect, OptionEntry)>,
}

impl OptionsPage {
    pub fn new() -> Self {
        OptionsPage {
            action_tx: None,
            keymap: PageKeyBindings::default(),
            store: Store::new(),
            settings: Settings::default(),
            entries: vec![OptionEntry::Difficulty, OptionEntry::Back],
            selected_index: 0,
            regions: Vec::new(),
        }
    }

    fn up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    fn down(&mut self) {
        if self.selected_index + 1 < self.entries.len() {
            self.selected_index += 1;
        }
    }

    /// Difficulty cycles in place; only Back leaves the page.
    fn activate(&mut self, entry: OptionEntry) -> Option<Action> {
        match entry {
            OptionEntry::Difficulty => {
                self.settings = self.store.cycle_difficulty();
                None
            },
            OptionEntry::Back => Some(act!(Command::BackToMenu)),
        }
    }

    fn label(&self, entry: OptionEntry) -> String {
        match entry {
            OptionEntry::Difficulty => format!("Dificultad: {}", self.settings.difficulty),
            OptionEntry::Back => "Volver".to_string(),
        }
    }
}

impl Page for OptionsPage {
    fn id(&self) -> PageId {
        PageId::Options
    }

    fn register_keymap(&mut self, keymaps: &HashMap<PageId, PageKeyBindings>) -> Result<()> {
        if let Some(keymap) = keymaps.get(&self.id()) {
            self.keymap = keymap.clone();
        }
        Ok(())
    }

    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(tx);
        Ok(())
    }

    fn register_store_handler(&mut self, store: Store) -> Result<()> {
        self.store = store;
        Ok(())
    }

    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            let pos = Position::new(mouse.column, mouse.row);
            if let Some((_, entry)) = self.regions.iter().find(|(region, _)| region.contains(pos)).copied() {
                return Ok(self.activate(entry));
            }
        }
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action.command {
            Command::ShowOptions => self.settings = self.store.load(),
            Command::Options(command) => {
                match command {
                    OptionsAction::Up => self.up(),
                    OptionsAction::Down => self.down(),
                    OptionsAction::Select => {
                        let entry = self.entries[self.selected_index];
                        return Ok(self.activate(entry));
                    },
                    OptionsAction::Back => return Ok(Some(act!(Command::BackToMenu))),
                }
            },
            _ => {},
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect) -> Result<()> {
        let num_entries = self.entries.len() as u16;
        let [heading_area, list_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(num_entries * 2 - 1)])
                .flex(Flex::SpaceAround)
                .areas(rect);

        let heading = Paragraph::new("Opciones")
            .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        f.render_widget(heading, heading_area);

        let labels: Vec<String> = self.entries.iter().map(|entry| self.label(*entry)).collect();
        let max_len = labels.iter().map(|label| label.chars().count()).max().unwrap_or(0) as u16;
        let [list_area] =
            Layout::horizontal([Constraint::Length(max_len + 4)]).flex(Flex::SpaceAround).areas(list_area);

        self.regions.clear();
        for (index, (entry, label)) in self.entries.iter().zip(labels.iter()).enumerate() {
            let dy = (index as u16) * 2;
            if dy >= list_area.height {
                break;
            }
            let line_area = Rect { y: list_area.y + dy, height: 1, ..list_area };
            let style = if index == self.selected_index {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            f.render_widget(Paragraph::new(format!("  {label}  ")).style(style), line_area);
            self.regions.push((line_area, *entry));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{action::ActionState, store::Difficulty};

    fn temp_store(tag: &str) -> Store {
        let path = std::env::temp_dir().join(format!("pajaro_options_{}_{}.json", tag, std::process::id()));
        let _ = std::fs::remove_file(&path);
        Store::with_path(path)
    }

    fn action(command: Command) -> Action {
        Action { command, state: ActionState::Start }
    }

    #[test]
    fn test_select_cycles_difficulty_and_stays() -> Result<()> {
        let store = temp_store("cycle");
        let mut page = OptionsPage::new();
        page.register_store_handler(store.clone())?;

        page.update(action(Command::ShowOptions))?;
        assert_eq!(page.settings.difficulty, Difficulty::Normal);

        let result = page.update(action(Command::Options(OptionsAction::Select)))?;
        assert_eq!(result, None);
        assert_eq!(page.settings.difficulty, Difficulty::Hard);
        assert_eq!(store.load().difficulty, Difficulty::Hard);
        Ok(())
    }

    #[test]
    fn test_back_returns_to_menu() -> Result<()> {
        let mut page = OptionsPage::new();
        page.register_store_handler(temp_store("back"))?;
        page.update(action(Command::Options(OptionsAction::Down)))?;
        let result = page.update(action(Command::Options(OptionsAction::Select)))?;
        assert_eq!(result, Some(act!(Command::BackToMenu)));
        Ok(())
    }
}
