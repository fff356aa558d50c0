use std::{collections::HashMap, time::Instant};

use color_eyre::eyre::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use derive_builder::Builder;
use ratatui::{layout::Flex, layout::Position, prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;

use super::{Page, PageId};
use crate::{
    action::{act, Action, Command, MenuAction},
    components::sprite::Sprite,
    config::PageKeyBindings,
    constants::{SUBTITLE_TEXT, TITLE_TEXT},
};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum MenuEntry {
    Play,
    Skins,
    Records,
    Options,
    Exit,
}

impl MenuEntry {
    fn command(&self) -> Command {
        match self {
            MenuEntry::Play => Command::StartGame,
            MenuEntry::Skins => Command::ShowSkins,
            MenuEntry::Records => Command::ShowRecords,
            MenuEntry::Options => Command::ShowOptions,
            MenuEntry::Exit => Command::Quit,
        }
    }
}

#[derive(Builder)]
pub struct MenuPage {
    #[builder(default)]
    pub action_tx: Option<UnboundedSender<Action>>,
    #[builder(default)]
    pub keymap: PageKeyBindings,
    options: Vec<(MenuEntry, &'static str)>,
    selected_index: usize,
    #[builder(default = "Instant::now()")]
    started: Instant,
    /// Clickable rows recorded during the last draw.
    #[builder(default)]
    regions: Vec<(Rect, MenuEntry)>,
}

impl MenuPage {
    pub fn new() -> Self {
        MenuPageBuilder::default()
            .options(vec![
                (MenuEntry::Play, "Jugar"),
                (MenuEntry::Skins, "Skins"),
                (MenuEntry::Records, "Récords"),
                (MenuEntry::Options, "Opciones"),
                (MenuEntry::Exit, "Salir"),
            ])
            .selected_index(0)
            .build()
            .unwrap()
    }

    fn up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    fn down(&mut self) {
        if self.selected_index + 1 < self.options.len() {
            self.selected_index += 1;
        }
    }

    fn select(&self) -> Action {
        act!(self.options[self.selected_index].0.command())
    }
}

impl Page for MenuPage {
    fn id(&self) -> PageId {
        PageId::Menu
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

    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            let pos = Position::new(mouse.column, mouse.row);
            for (region, entry) in &self.regions {
                if region.contains(pos) {
                    return Ok(Some(act!(entry.command())));
                }
            }
        }
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Command::Menu(command) = action.command {
            match command {
                MenuAction::Up => self.up(),
                MenuAction::Down => self.down(),
                MenuAction::Select => return Ok(Some(self.select())),
            }
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect) -> Result<()> {
        let title_lines: Vec<&str> = TITLE_TEXT.lines().filter(|s| !s.is_empty()).collect();
        let num_title_lines = title_lines.len() as u16;

        let num_options = self.options.len() as u16;
        let option_height = num_options * 2 - 1;

        let [title_area, subtitle_area, option_area] = Layout::vertical([
            Constraint::Length(num_title_lines + 2),
            Constraint::Length(1),
            Constraint::Length(option_height),
        ])
        .flex(Flex::SpaceAround)
        .areas(rect);

        // Bobbing title
        let title_width = title_lines.iter().map(|line| line.chars().count()).max().unwrap_or(0) as u16;
        let title_x = (title_area.width.saturating_sub(title_width) / 2) as i32;
        let bob = (self.started.elapsed().as_secs_f32() * 2.0).sin();
        let title_y = 1 + if bob > 0.3 { 1 } else if bob < -0.3 { -1 } else { 0 };
        let title = Sprite::new(TITLE_TEXT)
            .origin(title_x, title_y)
            .style(Style::default().fg(Color::Yellow))
            .transparent(true);
        f.render_widget(title, title_area);

        let subtitle =
            Paragraph::new(SUBTITLE_TEXT).style(Style::default().fg(Color::White)).alignment(Alignment::Center);
        f.render_widget(subtitle, subtitle_area);

        // Options, centered and padded to equal width
        let max_option_len = self.options.iter().map(|(_, label)| label.chars().count()).max().unwrap_or(0) as u16;
        let [option_area] = Layout::horizontal([Constraint::Length(max_option_len + 4)])
            .flex(Flex::SpaceAround)
            .areas(option_area);

        self.regions.clear();
        for (index, (entry, label)) in self.options.iter().enumerate() {
            let dy = (index as u16) * 2;
            if dy >= option_area.height {
                break;
            }
            let line_area = Rect { y: option_area.y + dy, height: 1, ..option_area };
            let pad = max_option_len as usize - label.chars().count();
            let text = format!("  {}{}  ", label, " ".repeat(pad));
            let style = if index == self.selected_index {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
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

    #[test]
    fn test_select_maps_entries_to_commands() -> Result<()> {
        let mut page = MenuPage::new();
        let action = Action { command: Command::Menu(MenuAction::Select), state: ActionState::Start };

        assert_eq!(page.update(action.clone())?, Some(act!(Command::StartGame)));
        page.down();
        assert_eq!(page.update(action.clone())?, Some(act!(Command::ShowSkins)));
        page.down();
        assert_eq!(page.update(action.clone())?, Some(act!(Command::ShowRecords)));
        page.down();
        assert_eq!(page.update(action.clone())?, Some(act!(Command::ShowOptions)));
        page.down();
        assert_eq!(page.update(action)?, Some(act!(Command::Quit)));
        Ok(())
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut page = MenuPage::new();
        page.up();
        assert_eq!(page.selected_index, 0);
        for _ in 0..10 {
            page.down();
        }
        assert_eq!(page.selected_index, page.options.len() - 1);
    }
}
