use std::{collections::HashMap, time::Instant};

use color_eyre::eyre::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{layout::Flex, prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;

use super::{Page, PageId};
use crate::{
    action::{act, Action, ActionState, Command, GameAction},
    components::sprite::Sprite,
    config::PageKeyBindings,
    constants::game,
    sim::{Bird, Phase, Round, RoundInput, Tube},
    store::{Skin, Store},
};

/// Runs one play session: owns the simulation, batches the tick's
/// inputs, and scales world units to terminal cells for drawing.
pub struct GamePage {
    pub action_tx: Option<UnboundedSender<Action>>,
    pub keymap: PageKeyBindings,
    store: Store,
    skin: Skin,
    round: Option<Round>,
    /// Inputs collected since the last tick, applied as one batch.
    pending: Vec<RoundInput>,
    last_tick: Instant,
}

fn scale_x(canvas: Rect, x: f32) -> i32 {
    (x / game::WORLD_WIDTH * canvas.width as f32).round() as i32
}

fn scale_y(canvas: Rect, y: f32) -> i32 {
    (y / game::WORLD_HEIGHT * canvas.height as f32).round() as i32
}

fn column_lines(row: String, height: u16) -> Vec<String> {
    std::iter::repeat_with(|| row.clone()).take(height as usize).collect()
}

impl GamePage {
    pub fn new() -> Self {
        GamePage {
            action_tx: None,
            keymap: PageKeyBindings::default(),
            store: Store::new(),
            skin: Skin::default(),
            round: None,
            pending: Vec::new(),
            last_tick: Instant::now(),
        }
    }

    fn start_round(&mut self) {
        let settings = self.store.load();
        self.skin = settings.skin;
        self.round = Some(Round::new(settings.difficulty.params()));
        self.pending.clear();
        self.last_tick = Instant::now();
    }

    fn step(&mut self) -> Option<Action> {
        let dt = self.last_tick.elapsed().as_secs_f32();
        self.last_tick = Instant::now();
        let inputs: Vec<RoundInput> = self.pending.drain(..).collect();

        let round = self.round.as_mut()?;
        if let Some(score) = round.tick(dt, &inputs) {
            self.round = None;
            return Some(act!(Command::FinishRound(score)));
        }
        None
    }

    fn draw_ground(&self, f: &mut Frame<'_>, canvas: Rect) {
        let ground_row = scale_y(canvas, game::GROUND_LINE).clamp(0, canvas.height as i32) as u16;
        let area = Rect {
            y: canvas.y + ground_row,
            height: canvas.height - ground_row,
            ..canvas
        };
        let row = "#".repeat(area.width as usize);
        let lines = column_lines(row, area.height).into_iter().map(Line::from).collect::<Vec<_>>();
        f.render_widget(Paragraph::new(lines).style(Style::default().fg(game::GROUND_COLOR)), area);
    }

    fn draw_tube(&self, f: &mut Frame<'_>, canvas: Rect, tube: &Tube) {
        let left = scale_x(canvas, tube.x);
        let right = scale_x(canvas, tube.right_edge());
        let width = (right - left).max(1) as usize;
        let body_row = "|".repeat(width);
        let cap_row = "█".repeat(width);

        let gap_top_row = scale_y(canvas, tube.gap_top());
        let gap_bottom_row = scale_y(canvas, tube.gap_bottom());
        let ground_row = scale_y(canvas, game::GROUND_LINE);

        if gap_top_row > 0 {
            let body = Sprite::from_lines(column_lines(body_row.clone(), gap_top_row as u16))
                .origin(left, 0)
                .style(Style::default().fg(game::TUBE_COLOR));
            f.render_widget(body, canvas);
            let cap = Sprite::new(&cap_row)
                .origin(left, gap_top_row - 1)
                .style(Style::default().fg(game::TUBE_CAP_COLOR));
            f.render_widget(cap, canvas);
        }
        if ground_row > gap_bottom_row {
            let height = (ground_row - gap_bottom_row) as u16;
            let body = Sprite::from_lines(column_lines(body_row, height))
                .origin(left, gap_bottom_row)
                .style(Style::default().fg(game::TUBE_COLOR));
            f.render_widget(body, canvas);
            let cap = Sprite::new(&cap_row)
                .origin(left, gap_bottom_row)
                .style(Style::default().fg(game::TUBE_CAP_COLOR));
            f.render_widget(cap, canvas);
        }
    }

    fn draw_bird(&self, f: &mut Frame<'_>, canvas: Rect, bird: &Bird) {
        let frame = (bird.time * 8.0) as usize % game::BIRD_TEXTS.len();
        let sprite = Sprite::new(game::BIRD_TEXTS[frame])
            .style(Style::default().fg(self.skin.color(bird.time)))
            .transparent(true);
        let (width, height) = sprite.size();
        let x = scale_x(canvas, bird.x) - (width / 2) as i32;
        let y = scale_y(canvas, bird.y) - (height / 2) as i32;
        f.render_widget(sprite.origin(x, y), canvas);
    }

    fn draw_game_over(&self, f: &mut Frame<'_>, canvas: Rect) {
        let [banner_area] = Layout::vertical([Constraint::Length(3)]).flex(Flex::Center).areas(canvas);
        let lines = vec![
            Line::from(game::GAME_OVER_TEXT)
                .style(Style::default().fg(game::GAME_OVER_COLOR).add_modifier(Modifier::BOLD)),
            Line::from(""),
            Line::from(game::RESTART_HINT_TEXT).style(Style::default().fg(Color::White)),
        ];
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), banner_area);
    }
}

impl Page for GamePage {
    fn id(&self) -> PageId {
        PageId::Game
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
        // A click flaps, but only mid-flight; restarting from game over
        // stays on the keyboard.
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            if self.round.as_ref().is_some_and(|round| round.phase() == Phase::Running) {
                self.pending.push(RoundInput::Flap);
            }
        }
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action.command {
            Command::StartGame => self.start_round(),
            Command::Game(GameAction::Flap) if action.state == ActionState::Start => {
                self.pending.push(RoundInput::Flap)
            },
            Command::Game(GameAction::Cancel) => self.pending.push(RoundInput::Cancel),
            // The simulation missed time while the app was suspended or
            // covered by the help overlay; don't feed it as one huge dt.
            Command::Resume | Command::ToggleShowHelp => self.last_tick = Instant::now(),
            Command::Tick => return Ok(self.step()),
            _ => {},
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect) -> Result<()> {
        let Some(round) = self.round.as_ref() else {
            return Ok(());
        };

        for tube in round.tubes() {
            self.draw_tube(f, rect, tube);
        }
        self.draw_ground(f, rect);
        self.draw_bird(f, rect, round.bird());

        let score_area = Rect { y: rect.y + 1, height: 1, ..rect };
        let score = Paragraph::new(round.score().to_string())
            .style(Style::default().fg(game::SCORE_COLOR).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        f.render_widget(score, score_area);

        if round.phase() == Phase::GameOver {
            self.draw_game_over(f, rect);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::store::Difficulty;

    fn temp_store(tag: &str) -> Store {
        let path = std::env::temp_dir().join(format!("pajaro_game_{}_{}.json", tag, std::process::id()));
        let _ = std::fs::remove_file(&path);
        Store::with_path(path)
    }

    fn action(command: Command) -> Action {
        Action { command, state: ActionState::Start }
    }

    fn click() -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 5,
            modifiers: KeyModifiers::empty(),
        }
    }

    #[test]
    fn test_round_runs_until_cancelled() -> Result<()> {
        let mut page = GamePage::new();
        page.register_store_handler(temp_store("cancel"))?;

        page.update(action(Command::StartGame))?;
        assert!(page.round.is_some());

        page.update(action(Command::Game(GameAction::Flap)))?;
        assert_eq!(page.update(action(Command::Tick))?, None);
        assert!(page.round.is_some());

        page.update(action(Command::Game(GameAction::Cancel)))?;
        let finished = page.update(action(Command::Tick))?;
        assert_eq!(finished, Some(act!(Command::FinishRound(0))));
        assert!(page.round.is_none());
        Ok(())
    }

    #[test]
    fn test_round_uses_stored_difficulty() -> Result<()> {
        let store = temp_store("difficulty");
        store.cycle_difficulty(); // Normal -> Hard
        let mut page = GamePage::new();
        page.register_store_handler(store)?;

        page.update(action(Command::StartGame))?;
        let round = page.round.as_ref().unwrap();
        assert_eq!(round.params(), Difficulty::Hard.params());
        Ok(())
    }

    #[test]
    fn test_click_flaps_only_while_running() -> Result<()> {
        let mut page = GamePage::new();
        page.register_store_handler(temp_store("click"))?;
        page.update(action(Command::StartGame))?;

        page.handle_mouse_events(click())?;
        assert_eq!(page.pending, vec![RoundInput::Flap]);
        page.pending.clear();

        // Force game over, then clicks are ignored.
        let round = page.round.as_mut().unwrap();
        while round.phase() == Phase::Running {
            round.tick(0.0, &[]);
        }
        page.handle_mouse_events(click())?;
        assert!(page.pending.is_empty());
        Ok(())
    }

    #[test]
    fn test_inputs_drain_each_tick() -> Result<()> {
        let mut page = GamePage::new();
        page.register_store_handler(temp_store("drain"))?;
        page.update(action(Command::StartGame))?;

        page.update(action(Command::Game(GameAction::Flap)))?;
        page.update(action(Command::Game(GameAction::Flap)))?;
        assert_eq!(page.pending.len(), 2);
        page.update(action(Command::Tick))?;
        assert!(page.pending.is_empty());
        Ok(())
    }
}
