pub mod background;
pub mod game;

/// Playable canvas size in terminal cells. The world (480x720 logical
/// units) is scaled into this area; the aspect ratio compensates for
/// terminal cells being roughly twice as tall as wide.
pub const WIDTH: u16 = 96;
pub const HEIGHT: u16 = 44;

pub const TITLE_TEXT: &str = r#"
 ___   _     _  _    ___  ___     ___ _    ___    _ ___
| _ \ /_\ _ | |/_\  | _ \/ _ \   | __| |  / _ \ _| / _ \
|  _// _ \ || / _ \ |   / (_) |  | _|| |_| (_) | || (_) |
|_| /_/ \_\_|/_/ \_\|_|_\\___/   |_| |____\___/ \__/\___/
"#;

pub const SUBTITLE_TEXT: &str = "Espacio/Click para aletear  -  ESC: menu";
