use std::collections::HashMap;

use color_eyre::eyre::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{layout::Flex, layout::Position, prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;

use super::{Page, PageId};
use crate::{
    action::{act, Action, Command, SkinsAction},
    config::PageKeyBindings,
    store::{Settings, Skin, Store},
};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum SkinEntry {
    Pick(Skin),
    Back,
}

pub struct SkinsPage {
    pub action_tx: Option<UnboundedSender<Action>>,
    pub keymap: PageKeyBindings,
    store: Store,
    settings: Settings,
    entries: Vec<(SkinEntry, &'static str)>,
    selected_index: usize,
    regions: Vec<(Rect, SkinEntry)>,
}

impl SkinsPage {
    pub fn new() -> Self {
        let mut entries: Vec<(SkinEntry, &'static str)> =
            Skin::ALL.iter().map(|skin| (SkinEntry::Pick(*skin), skin.label())).collect();
        entries.push((SkinEntry::Back, "Volver"));

        SkinsPage {
            action_tx: None,
            keymap: PageKeyBindings::default(),
            store: Store::new(),
            settings: Settings::default(),
            entries,
            selected_index: 0,
            regions: Vec::new(),
        }
    }

    /// Refreshes from disk and moves the cursor to the active skin.
    fn reload(&mut self) {
        self.settings = self.store.load();
        self.selected_index = self
            .entries
            .iter()
            .position(|(entry, _)| *entry == SkinEntry::Pick(self.settings.skin))
            .unwrap_or(0);
    }

    fn up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    fn down(&mut self) {
        if self.selected_index + 1 < self.entries.len() {
            self.selected_index += 1;
        }
    }

    fn activate(&mut self, entry: SkinEntry) -> Action {
        if let SkinEntry::Pick(skin) = entry {
            self.settings = self.store.set_skin(skin);
        }
        act!(Command::BackToMenu)
    }
}

impl Page for SkinsPage {
    fn id(&self) -> PageId {
        PageId::Skins
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
                return Ok(Some(self.activate(entry)));
            }
        }
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action.command {
            Command::ShowSkins => self.reload(),
            Command::Skins(command) => {
                match command {
                    SkinsAction::Up => self.up(),
                    SkinsAction::Down => self.down(),
                    SkinsAction::Select => {
                        let entry = self.entries[self.selected_index].0;
                        return Ok(Some(self.activate(entry)));
                    },
                    SkinsAction::Back => return Ok(Some(act!(Command::BackToMenu))),
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

        let heading = Paragraph::new("Skins")
            .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        f.render_widget(heading, heading_area);

        let max_len = self.entries.iter().map(|(_, label)| label.chars().count()).max().unwrap_or(0) as u16;
        let [list_area] =
            Layout::horizontal([Constraint::Length(max_len + 8)]).flex(Flex::SpaceAround).areas(list_area);

        self.regions.clear();
        for (index, (entry, label)) in self.entries.iter().enumerate() {
            let dy = (index as u16) * 2;
            if dy >= list_area.height {
                break;
            }
            let line_area = Rect { y: list_area.y + dy, height: 1, ..list_area };

            let current = *entry == SkinEntry::Pick(self.settings.skin);
            let marker = if current { "*" } else { " " };
            let text = format!("{marker} {label}");
            let color = match entry {
                SkinEntry::Pick(skin) => skin.color(0.0),
                SkinEntry::Back => Color::Gray,
            };
            let style = if index == self.selected_index {
                Style::default().fg(Color::Black).bg(color)
            } else {
                Style::default().fg(color)
            };
            f.render_widget(Paragraph::new(text).style(style), line_area);
            self.regions.push((line_area, *entry));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::action::ActionState;

    fn temp_store(tag: &str) -> Store {
        let path = std::env::temp_dir().join(format!("pajaro_skins_{}_{}.json", tag, std::process::id()));
        let _ = std::fs::remove_file(&path);
        Store::with_path(path)
    }

    fn action(command: Command) -> Action {
        Action { command, state: ActionState::Start }
    }

    #[test]
    fn test_choose_skin_persists_and_returns_to_menu() -> Result<()> {
        let store = temp_store("choose");
        let mut page = SkinsPage::new();
        page.register_store_handler(store.clone())?;

        // Entering the page from the menu reloads the settings.
        page.update(action(Command::ShowSkins))?;
        assert_eq!(page.settings.skin, Skin::Amarillo);

        // Move to "Rojo" and select it.
        page.update(action(Command::Skins(SkinsAction::Down)))?;
        let result = page.update(action(Command::Skins(SkinsAction::Select)))?;

        assert_eq!(result, Some(act!(Command::BackToMenu)));
        assert_eq!(store.load().skin, Skin::Rojo);
        Ok(())
    }

    #[test]
    fn test_back_leaves_settings_untouched() -> Result<()> {
        let store = temp_store("back");
        let mut page = SkinsPage::new();
        page.register_store_handler(store.clone())?;

        page.update(action(Command::ShowSkins))?;
        let result = page.update(action(Command::Skins(SkinsAction::Back)))?;

        assert_eq!(result, Some(act!(Command::BackToMenu)));
        assert_eq!(store.load(), Settings::default());
        Ok(())
    }

    #[test]
    fn test_reload_selects_active_skin() -> Result<()> {
        let store = temp_store("cursor");
        store.set_skin(Skin::Verde);
        let mut page = SkinsPage::new();
        page.register_store_handler(store.clone())?;

        page.update(action(Command::ShowSkins))?;
        assert_eq!(page.entries[page.selected_index].0, SkinEntry::Pick(Skin::Verde));
        Ok(())
    }
}
