use ratatui::style::Color;

// World space: 480x720 logical units, origin top-left, y grows down.
// The simulation runs entirely in these units; rendering scales them
// to terminal cells.
pub const WORLD_WIDTH: f32 = 480.0;
pub const WORLD_HEIGHT: f32 = 720.0;
pub const GROUND_OFFSET: f32 = 80.0;
pub const GROUND_LINE: f32 = WORLD_HEIGHT - GROUND_OFFSET;

pub const GRAVITY: f32 = 0.6;
pub const FLAP_VELOCITY: f32 = -9.5;

pub const BIRD_RADIUS: f32 = 18.0;
pub const BIRD_START_X: f32 = WORLD_WIDTH * 0.28;

pub const TUBE_WIDTH: f32 = 84.0;
pub const TUBE_SPAWN_X: f32 = WORLD_WIDTH + 20.0;
pub const TUBE_RETIRE_X: f32 = -50.0;
pub const GAP_MARGIN: f32 = 120.0;

pub const TUBE_COLOR: Color = Color::LightGreen;
pub const TUBE_CAP_COLOR: Color = Color::Green;
pub const GROUND_COLOR: Color = Color::Rgb(90, 60, 40);
pub const SCORE_COLOR: Color = Color::White;
pub const GAME_OVER_COLOR: Color = Color::LightRed;

pub const GAME_OVER_TEXT: &str = "¡PERDISTE!";
pub const RESTART_HINT_TEXT: &str = "Pulsa ESPACIO para reiniciar o ESC para salir";

// Bird sprite frames, alternated over alive-time for a wing beat; the
// whole sprite is tinted by the selected skin.
pub const BIRD_TEXTS: [&str; 2] = [
    r#"
 __
( o>
 \_/
"#,
    r#"
 __
( o>
 \./
"#,
];
