//! Persisted user preferences and score history. One JSON document in
//! the data dir, rewritten whole on every mutation; a missing or
//! corrupt file never makes the game unplayable.

use std::path::PathBuf;

use ratatui::style::Color;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{sim::DifficultyParams, utils};

pub const MAX_LAST_SCORES: usize = 10;
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skin {
    #[default]
    Amarillo,
    Rojo,
    Azul,
    Verde,
    Rainbow,
}

serde_plain::derive_fromstr_from_deserialize!(Skin);
serde_plain::derive_display_from_serialize!(Skin);

impl Skin {
    pub const ALL: [Skin; 5] = [Skin::Amarillo, Skin::Rojo, Skin::Azul, Skin::Verde, Skin::Rainbow];

    pub fn label(&self) -> &'static str {
        match self {
            Skin::Amarillo => "Amarillo",
            Skin::Rojo => "Rojo",
            Skin::Azul => "Azul",
            Skin::Verde => "Verde",
            Skin::Rainbow => "Rainbow",
        }
    }

    /// The bird's body color. The simulation only carries the skin tag;
    /// this is the one place appearance is decided. `t` is the bird's
    /// alive-time, which the rainbow skin cycles over.
    pub fn color(&self, t: f32) -> Color {
        const BANDS: [Color; 5] =
            [Color::LightRed, Color::LightYellow, Color::LightGreen, Color::LightBlue, Color::LightMagenta];
        match self {
            Skin::Amarillo => Color::Yellow,
            Skin::Rojo => Color::Red,
            Skin::Azul => Color::Blue,
            Skin::Verde => Color::Green,
            Skin::Rainbow => BANDS[(t * 6.0) as usize % BANDS.len()],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

serde_plain::derive_fromstr_from_deserialize!(Difficulty);
serde_plain::derive_display_from_serialize!(Difficulty);

impl Difficulty {
    /// Fixed cyclic order: Easy -> Normal -> Hard -> Easy.
    pub fn next(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Normal,
            Difficulty::Normal => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn params(&self) -> DifficultyParams {
        match self {
            Difficulty::Easy => DifficultyParams { gap_height: 200.0, speed: 3.6, spawn_interval: 1.8 },
            Difficulty::Normal => DifficultyParams { gap_height: 175.0, speed: 4.2, spawn_interval: 1.4 },
            Difficulty::Hard => DifficultyParams { gap_height: 150.0, speed: 5.0, spawn_interval: 1.1 },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub highscore: u32,
    /// Most recent first, capped at [`MAX_LAST_SCORES`].
    pub last_scores: Vec<u32>,
    #[serde(deserialize_with = "lenient")]
    pub skin: Skin,
    #[serde(deserialize_with = "lenient")]
    pub difficulty: Difficulty,
}

/// A corrupted enum field degrades to its default instead of failing
/// the whole settings load.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr + Default,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or_default())
}

/// Cheap handle on the settings file. Every mutation reloads first so
/// concurrent external edits are not clobbered beyond the field being
/// written; persistence is synchronous, last writer wins.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new() -> Self {
        Store { path: utils::get_data_dir().join(SETTINGS_FILE) }
    }

    pub fn with_path(path: PathBuf) -> Self {
        Store { path }
    }

    pub fn load(&self) -> Settings {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("settings file unreadable ({e}), using defaults");
                Settings::default()
            }),
            Err(_) => Settings::default(),
        }
    }

    pub fn save(&self, settings: &Settings) {
        if let Err(e) = self.try_save(settings) {
            tracing::error!("failed to persist settings: {e}");
        }
    }

    fn try_save(&self, settings: &Settings) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, json)
    }

    pub fn record_round_result(&self, score: u32) -> Settings {
        let mut settings = self.load();
        settings.highscore = settings.highscore.max(score);
        settings.last_scores.insert(0, score);
        settings.last_scores.truncate(MAX_LAST_SCORES);
        self.save(&settings);
        settings
    }

    pub fn set_skin(&self, skin: Skin) -> Settings {
        let mut settings = self.load();
        settings.skin = skin;
        self.save(&settings);
        settings
    }

    pub fn cycle_difficulty(&self) -> Settings {
        let mut settings = self.load();
        settings.difficulty = settings.difficulty.next();
        self.save(&settings);
        settings
    }
}

impl Default for Store {
    fn default() -> Self {
        Store::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn temp_store(tag: &str) -> Store {
        let path = std::env::temp_dir().join(format!("pajaro_store_{}_{}.json", tag, std::process::id()));
        let _ = std::fs::remove_file(&path);
        Store::with_path(path)
    }

    fn cleanup(store: &Store) {
        let _ = std::fs::remove_file(&store.path);
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let store = temp_store("missing");
        let settings = store.load();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.highscore, 0);
        assert!(settings.last_scores.is_empty());
        assert_eq!(settings.skin, Skin::Amarillo);
        assert_eq!(settings.difficulty, Difficulty::Normal);
    }

    #[test]
    fn test_load_corrupt_file_yields_defaults() {
        let store = temp_store("corrupt");
        std::fs::write(&store.path, "not json at all {{{").unwrap();
        assert_eq!(store.load(), Settings::default());
        cleanup(&store);
    }

    #[test]
    fn test_unknown_enum_values_degrade_to_defaults() {
        let store = temp_store("bad_enums");
        std::fs::write(
            &store.path,
            r#"{"highscore": 4, "last_scores": [4], "skin": "octarine", "difficulty": "Nightmare"}"#,
        )
        .unwrap();
        let settings = store.load();
        assert_eq!(settings.highscore, 4);
        assert_eq!(settings.skin, Skin::Amarillo);
        assert_eq!(settings.difficulty, Difficulty::Normal);
        cleanup(&store);
    }

    #[test]
    fn test_record_round_result_scenario() {
        let store = temp_store("record");
        store.save(&Settings {
            highscore: 5,
            last_scores: vec![5, 3, 1],
            ..Settings::default()
        });

        let settings = store.record_round_result(8);
        assert_eq!(settings.highscore, 8);
        assert_eq!(settings.last_scores, vec![8, 5, 3, 1]);

        // Persisted, not just returned.
        assert_eq!(store.load(), settings);
        cleanup(&store);
    }

    #[test]
    fn test_record_round_result_never_lowers_highscore() {
        let store = temp_store("no_lower");
        store.record_round_result(8);
        let settings = store.record_round_result(2);
        assert_eq!(settings.highscore, 8);
        assert_eq!(settings.last_scores, vec![2, 8]);
        cleanup(&store);
    }

    #[test]
    fn test_last_scores_capped_at_ten() {
        let store = temp_store("cap");
        for score in 0..15 {
            store.record_round_result(score);
        }
        let settings = store.load();
        assert_eq!(settings.last_scores.len(), MAX_LAST_SCORES);
        assert_eq!(settings.last_scores, vec![14, 13, 12, 11, 10, 9, 8, 7, 6, 5]);
        cleanup(&store);
    }

    #[test]
    fn test_set_skin_persists() {
        let store = temp_store("skin");
        store.set_skin(Skin::Rojo);
        // A fresh handle on the same path sees the change.
        let reread = Store::with_path(store.path.clone());
        assert_eq!(reread.load().skin, Skin::Rojo);
        cleanup(&store);
    }

    #[test]
    fn test_cycle_difficulty_is_cyclic() {
        let store = temp_store("cycle");
        assert_eq!(store.cycle_difficulty().difficulty, Difficulty::Hard);
        assert_eq!(store.cycle_difficulty().difficulty, Difficulty::Easy);
        assert_eq!(store.cycle_difficulty().difficulty, Difficulty::Normal);
        cleanup(&store);
    }

    #[test]
    fn test_settings_document_shape() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["highscore"], 0);
        assert_eq!(value["last_scores"], serde_json::json!([]));
        assert_eq!(value["skin"], "amarillo");
        assert_eq!(value["difficulty"], "Normal");
    }

    #[test]
    fn test_difficulty_parameter_table() {
        let easy = Difficulty::Easy.params();
        assert_eq!((easy.gap_height, easy.speed, easy.spawn_interval), (200.0, 3.6, 1.8));
        let normal = Difficulty::Normal.params();
        assert_eq!((normal.gap_height, normal.speed, normal.spawn_interval), (175.0, 4.2, 1.4));
        let hard = Difficulty::Hard.params();
        assert_eq!((hard.gap_height, hard.speed, hard.spawn_interval), (150.0, 5.0, 1.1));
    }

    #[test]
    fn test_rainbow_skin_cycles_with_time() {
        let first = Skin::Rainbow.color(0.0);
        let second = Skin::Rainbow.color(0.2);
        assert_ne!(first, second);
        // Plain skins ignore time.
        assert_eq!(Skin::Rojo.color(0.0), Skin::Rojo.color(5.0));
    }
}
