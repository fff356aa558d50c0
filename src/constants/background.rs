pub const GROUND_HEIGHT: u16 = 3;

/// Drift speed of the menu clouds, columns per second.
pub const CLOUD_SPEED: f32 = 4.0;
pub const CLOUD_COUNT: usize = 3;
pub const CLOUD_ROW_STRIDE: u16 = 5;

pub const CLOUD_TEXT: &str = r#"
   .--.
 .(    ).
(___.__)__)
"#;
