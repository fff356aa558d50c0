use color_eyre::eyre::Result;
use ratatui::{
    layout::{Constraint, Layout, Margin},
    prelude::Rect,
    style::{Color, Style},
    widgets::{Block, BorderType, Borders},
    Frame,
};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::{
    action::{act, Action, Command},
    components::{
        background::{Background, BackgroundState},
        help::Help,
    },
    config::Config,
    constants::{background, HEIGHT, WIDTH},
    pages::{
        game::GamePage, menu::MenuPage, options::OptionsPage, records::RecordsPage, skins::SkinsPage, Page, PageId,
    },
    store::Store,
    tui,
};

pub struct App {
    config: Config,
    store: Store,
    tick_rate: f64,
    frame_rate: f64,
    should_quit: bool,
    should_suspend: bool,
    show_help: bool,
    pages: Vec<Box<dyn Page>>,
    active_page_index: usize,
    background_state: BackgroundState,
}

/// The navigation table: which commands move the app to another page.
/// Everything else leaves the active page alone.
fn route(command: &Command) -> Option<PageId> {
    match command {
        Command::StartGame => Some(PageId::Game),
        Command::ShowSkins => Some(PageId::Skins),
        Command::ShowRecords => Some(PageId::Records),
        Command::ShowOptions => Some(PageId::Options),
        Command::BackToMenu | Command::FinishRound(_) => Some(PageId::Menu),
        _ => None,
    }
}

impl App {
    pub fn new(tick_rate: f64, frame_rate: f64) -> Result<Self> {
        let config = Config::new()?;
        let store = Store::new();

        Ok(Self {
            tick_rate,
            frame_rate,
            should_quit: false,
            should_suspend: false,
            show_help: false,
            config,
            store,
            pages: vec![
                Box::new(MenuPage::new()),
                Box::new(GamePage::new()),
                Box::new(SkinsPage::new()),
                Box::new(RecordsPage::new()),
                Box::new(OptionsPage::new()),
            ],
            active_page_index: 0,
            background_state: BackgroundState::new(background::CLOUD_SPEED, background::CLOUD_COUNT),
        })
    }

    fn get_active_page(&mut self) -> &mut Box<dyn Page> {
        self.pages.get_mut(self.active_page_index).unwrap()
    }

    fn set_active_page(&mut self, id: PageId) {
        if let Some(index) = self.pages.iter().position(|page| page.id() == id) {
            self.active_page_index = index;
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let mut tui = tui::Tui::new()?;
        tui.tick_rate(self.tick_rate);
        tui.frame_rate(self.frame_rate);
        tui.enter()?;

        for page in self.pages.iter_mut() {
            page.register_keymap(&self.config.keybindings.pages)?;
        }

        for page in self.pages.iter_mut() {
            page.register_action_handler(action_tx.clone())?;
        }

        for page in self.pages.iter_mut() {
            page.register_config_handler(self.config.clone())?;
        }

        for page in self.pages.iter_mut() {
            page.register_store_handler(self.store.clone())?;
        }

        for page in self.pages.iter_mut() {
            page.init()?;
        }

        loop {
            if let Some(e) = tui.next().await {
                match e {
                    tui::Event::Quit => action_tx.send(act!(Command::Quit))?,
                    tui::Event::Tick => action_tx.send(act!(Command::Tick))?,
                    tui::Event::Render => action_tx.send(act!(Command::Render))?,
                    tui::Event::Resize(x, y) => action_tx.send(act!(Command::Resize(x, y)))?,
                    tui::Event::Key(key) => {
                        let mut action = None;

                        let active_page_id = self.get_active_page().id();
                        if let Some(keymap) = self.config.keybindings.pages.get(&active_page_id) {
                            action = keymap.0.get(&key);
                        };
                        if let Some(global) = self.config.keybindings.global.0.get(&key) {
                            action = Some(global)
                        }

                        if let Some(action) = action {
                            log::info!("Got action: {action:?}");
                            action_tx.send(action.clone())?;
                        }
                    },
                    _ => {},
                }
                if let Some(action) = self.get_active_page().handle_events(Some(e))? {
                    action_tx.send(action)?;
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                let Action { command, state: _ } = &action;
                if *command != Command::Tick && *command != Command::Render {
                    log::debug!("{command:?}");
                }
                match command {
                    Command::Tick => {},
                    Command::Quit => self.should_quit = true,
                    Command::Suspend => self.should_suspend = true,
                    Command::Resume => self.should_suspend = false,
                    Command::ToggleShowHelp => self.show_help = !self.show_help,
                    Command::Error(message) => log::error!("{message}"),
                    Command::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, *w, *h))?;
                        self.render(&mut tui, &action_tx)?;
                    },
                    Command::Render => {
                        self.render(&mut tui, &action_tx)?;
                    },
                    Command::FinishRound(score) => {
                        let settings = self.store.record_round_result(*score);
                        log::info!("round finished with score {score}, highscore now {}", settings.highscore);
                    },
                    _ => {},
                }
                if let Some(page_id) = route(command) {
                    self.set_active_page(page_id);
                }
                if !self.show_help {
                    if let Some(action) = self.get_active_page().update(action)? {
                        action_tx.send(action)?
                    }
                }
            }
            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(act!(Command::Resume))?;
                tui = tui::Tui::new()?;
                tui.tick_rate(self.tick_rate);
                tui.frame_rate(self.frame_rate);
                tui.enter()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    fn render(&mut self, tui: &mut tui::Tui, action_tx: &UnboundedSender<Action>) -> Result<()> {
        tui.draw(|f| {
            let area = f.area();

            let [_, area, _] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(HEIGHT), Constraint::Fill(1)]).areas(area);
            let [_, area, _] =
                Layout::horizontal([Constraint::Fill(1), Constraint::Length(WIDTH), Constraint::Fill(1)]).areas(area);

            let border = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().bg(Color::Black));
            f.render_widget(border, area);

            let area = area.inner(Margin { horizontal: 1, vertical: 1 });

            // The game draws its own world; the menus sit on the
            // cloud background.
            let active_page_id = self.pages[self.active_page_index].id();
            let area = if active_page_id == PageId::Game {
                area
            } else {
                f.render_stateful_widget(Background::default(), area, &mut self.background_state);
                self.background_state.get_empty_area(area)
            };

            if let Some(page) = self.pages.get_mut(self.active_page_index) {
                let r = page.draw(f, area);
                if let Err(e) = r {
                    action_tx.send(act!(Command::Error(format!("Failed to draw: {:?}", e)))).unwrap();
                }
            }

            if self.show_help {
                let r = self.draw_help(f, area);
                if let Err(e) = r {
                    action_tx.send(act!(Command::Error(format!("Failed to draw: {:?}", e)))).unwrap();
                }
            };
        })?;

        Ok(())
    }

    fn draw_help(&mut self, f: &mut Frame<'_>, rect: Rect) -> Result<()> {
        let active_page_id = self.get_active_page().id();
        let help = Help::new(vec![
            ("Global".to_string(), self.config.keybindings.global.clone()),
            (active_page_id.to_string(), self.config.keybindings.pages.get(&active_page_id).unwrap().clone()),
        ]);

        f.render_widget(help, rect);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_route_navigation_commands() {
        assert_eq!(route(&Command::StartGame), Some(PageId::Game));
        assert_eq!(route(&Command::ShowSkins), Some(PageId::Skins));
        assert_eq!(route(&Command::ShowRecords), Some(PageId::Records));
        assert_eq!(route(&Command::ShowOptions), Some(PageId::Options));
        assert_eq!(route(&Command::BackToMenu), Some(PageId::Menu));
        assert_eq!(route(&Command::FinishRound(3)), Some(PageId::Menu));
    }

    #[test]
    fn test_route_ignores_non_navigation_commands() {
        assert_eq!(route(&Command::Tick), None);
        assert_eq!(route(&Command::Render), None);
        assert_eq!(route(&Command::Quit), None);
        assert_eq!(route(&Command::ToggleShowHelp), None);
    }
}
