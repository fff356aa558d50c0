use std::time::SystemTime;

use rand::prelude::*;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Paragraph, StatefulWidget, Widget},
};

use crate::{components::sprite::Sprite, constants::background};

#[derive(Debug)]
struct Cloud {
    x: f32,
    row: u16,
}

/// Sky with a few clouds drifting right-to-left above a ground strip,
/// shown behind the menu screens.
#[derive(Debug)]
pub struct BackgroundState {
    /// Columns per second.
    speed: f32,
    count: usize,
    last_time: SystemTime,
    clouds: Vec<Cloud>,
    width: u16,
}

impl BackgroundState {
    pub fn new(speed: f32, count: usize) -> Self {
        Self { speed, count, last_time: SystemTime::now(), clouds: Vec::new(), width: 0 }
    }

    fn cloud_width() -> f32 {
        Sprite::new(background::CLOUD_TEXT).size().0 as f32
    }

    fn update(&mut self, area: Rect) {
        if self.width != area.width || self.clouds.is_empty() {
            self.width = area.width;
            let mut rng = thread_rng();
            self.clouds = (0..self.count)
                .map(|i| {
                    Cloud {
                        x: rng.gen_range(0.0..area.width.max(1) as f32),
                        row: 1 + (i as u16) * background::CLOUD_ROW_STRIDE,
                    }
                })
                .collect();
        }

        let now = SystemTime::now();
        let dt = now.duration_since(self.last_time).unwrap_or_default().as_secs_f32();
        self.last_time = now;

        let span = area.width as f32 + Self::cloud_width();
        for cloud in self.clouds.iter_mut() {
            cloud.x -= self.speed * dt;
            if cloud.x < -Self::cloud_width() {
                cloud.x += span;
            }
        }
    }

    /// The sky area pages may draw content into.
    pub fn get_empty_area(&self, area: Rect) -> Rect {
        Rect { height: area.height.saturating_sub(background::GROUND_HEIGHT), ..area }
    }
}

#[derive(Debug, Default)]
pub struct Background;

impl Background {
    fn render_ground(&self, area: Rect, buf: &mut Buffer) {
        let ground_string = std::iter::repeat_n('#', area.width as usize).collect::<String>();
        let ground_lines = std::iter::repeat_with(|| Line::from(ground_string.clone()))
            .take(area.height as usize)
            .collect::<Vec<_>>();
        Paragraph::new(ground_lines).style(Style::default().fg(Color::Green)).render(area, buf);
    }

    fn render_clouds(&self, area: Rect, buf: &mut Buffer, state: &BackgroundState) {
        for cloud in &state.clouds {
            Sprite::new(background::CLOUD_TEXT)
                .origin(cloud.x as i32, cloud.row as i32)
                .style(Style::default().fg(Color::White))
                .transparent(true)
                .render(area, buf);
        }
    }
}

impl StatefulWidget for Background {
    type State = BackgroundState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut BackgroundState) {
        let [sky_area, ground_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(background::GROUND_HEIGHT)]).areas(area);

        state.update(sky_area);
        self.render_clouds(sky_area, buf, state);
        self.render_ground(ground_area, buf);
    }
}
