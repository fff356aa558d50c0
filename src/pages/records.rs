use std::collections::HashMap;

use color_eyre::eyre::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{layout::Flex, layout::Position, prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;

use super::{Page, PageId};
use crate::{
    action::{act, Action, Command, RecordsAction},
    config::PageKeyBindings,
    store::{Settings, Store},
};

/// How many recent scores the screen lists (the store keeps more).
const SHOWN_SCORES: usize = 5;

pub struct RecordsPage {
    pub action_tx: Option<UnboundedSender<Action>>,
    pub keymap: PageKeyBindings,
    store: Store,
    settings: Settings,
    back_region: Option<Rect>,
}

impl RecordsPage {
    pub fn new() -> Self {
        RecordsPage {
            action_tx: None,
            keymap: PageKeyBindings::default(),
            store: Store::new(),
            settings: Settings::default(),
            back_region: None,
        }
    }
}

impl Page for RecordsPage {
    fn id(&self) -> PageId {
        PageId::Records
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
            if self.back_region.is_some_and(|region| region.contains(pos)) {
                return Ok(Some(act!(Command::BackToMenu)));
            }
        }
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action.command {
            // Reload on entry so external edits and fresh results show.
            Command::ShowRecords => self.settings = self.store.load(),
            Command::Records(RecordsAction::Back) => return Ok(Some(act!(Command::BackToMenu))),
            _ => {},
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect) -> Result<()> {
        let list_height = 2 + SHOWN_SCORES as u16;
        let [heading_area, list_area, back_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(list_height), Constraint::Length(1)])
                .flex(Flex::SpaceAround)
                .areas(rect);

        let heading = Paragraph::new("Récords")
            .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        f.render_widget(heading, heading_area);

        let mut lines = vec![Line::from(format!("Highscore: {}", self.settings.highscore)), Line::from("")];
        for (index, score) in self.settings.last_scores.iter().take(SHOWN_SCORES).enumerate() {
            lines.push(Line::from(format!("{}. {}", index + 1, score)));
        }
        let list = Paragraph::new(lines).style(Style::default().fg(Color::White)).alignment(Alignment::Center);
        f.render_widget(list, list_area);

        let back_label = "  Volver  ";
        let [back_area] = Layout::horizontal([Constraint::Length(back_label.chars().count() as u16)])
            .flex(Flex::SpaceAround)
            .areas(back_area);
        let back = Paragraph::new(back_label).style(Style::default().fg(Color::Black).bg(Color::Gray));
        f.render_widget(back, back_area);
        self.back_region = Some(back_area);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::action::ActionState;

    fn temp_store(tag: &str) -> Store {
        let path = std::env::temp_dir().join(format!("pajaro_records_{}_{}.json", tag, std::process::id()));
        let _ = std::fs::remove_file(&path);
        Store::with_path(path)
    }

    fn action(command: Command) -> Action {
        Action { command, state: ActionState::Start }
    }

    #[test]
    fn test_reloads_settings_on_entry() -> Result<()> {
        let store = temp_store("reload");
        let mut page = RecordsPage::new();
        page.register_store_handler(store.clone())?;

        page.update(action(Command::ShowRecords))?;
        assert_eq!(page.settings.highscore, 0);

        // A result recorded after the page was created still shows up.
        store.record_round_result(9);
        page.update(action(Command::ShowRecords))?;
        assert_eq!(page.settings.highscore, 9);
        assert_eq!(page.settings.last_scores, vec![9]);
        Ok(())
    }

    #[test]
    fn test_back_returns_to_menu() -> Result<()> {
        let mut page = RecordsPage::new();
        page.register_store_handler(temp_store("back"))?;
        let result = page.update(action(Command::Records(RecordsAction::Back)))?;
        assert_eq!(result, Some(act!(Command::BackToMenu)));
        Ok(())
    }
}
