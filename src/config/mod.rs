use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Look for a config file in the user's config directory first, falling
/// back to ./config in the working tree.
pub fn resolve_config(filename: &str) -> Result<PathBuf, String> {
	let mut searched = Vec::new();

	if let Some(dir) = dirs::config_dir() {
		let user_path = dir.join("set-rush").join(filename);
		if user_path.exists() {
			return Ok(user_path);
		}
		searched.push(user_path);
	}

	let fallback = Path::new("config").join(filename);
	if fallback.exists() {
		return Ok(fallback);
	}
	searched.push(fallback);

	let searched: Vec<String> = searched.iter().map(|p| p.display().to_string()).collect();
	Err(format!("no {} found (looked in {})", filename, searched.join(", ")))
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
	#[serde(default = "default_rows")]
	pub rows: usize,
	#[serde(default = "default_columns")]
	pub columns: usize,

	/// Cards per set, and values per feature.
	#[serde(default = "default_feature_size")]
	pub feature_size: usize,
	/// Independent features on a card.
	#[serde(default = "default_feature_count")]
	pub feature_count: usize,

	#[serde(default = "default_human_players")]
	pub human_players: usize,
	#[serde(default = "default_computer_players")]
	pub computer_players: usize,

	/// Positive: countdown round length. Negative: free play.
	/// Zero: show elapsed time instead.
	#[serde(default = "default_turn_timeout_ms")]
	pub turn_timeout_ms: i64,
	#[serde(default = "default_turn_timeout_warning_ms")]
	pub turn_timeout_warning_ms: i64,

	#[serde(default = "default_point_freeze_ms")]
	pub point_freeze_ms: i64,
	#[serde(default = "default_penalty_freeze_ms")]
	pub penalty_freeze_ms: i64,

	/// Pause after each card placement, for visual pacing.
	#[serde(default)]
	pub table_delay_ms: u64,

	#[serde(default)]
	pub hints: bool,

	#[serde(default)]
	pub seed: Option<u64>,

	/// One string per human player: character at position i presses slot i.
	#[serde(default = "default_keys")]
	pub keys: Vec<String>,
}

fn default_rows() -> usize {
	3
}

fn default_columns() -> usize {
	4
}

fn default_feature_size() -> usize {
	3
}

fn default_feature_count() -> usize {
	4
}

fn default_human_players() -> usize {
	1
}

fn default_computer_players() -> usize {
	1
}

fn default_turn_timeout_ms() -> i64 {
	60_000
}

fn default_turn_timeout_warning_ms() -> i64 {
	5_000
}

fn default_point_freeze_ms() -> i64 {
	1_000
}

fn default_penalty_freeze_ms() -> i64 {
	3_000
}

fn default_keys() -> Vec<String> {
	vec!["qwerasdfzxcv".to_string(), "uiopjkl;m,./".to_string()]
}

impl Default for GameConfig {
	fn default() -> Self {
		toml::from_str("").unwrap()
	}
}

impl GameConfig {
	pub fn table_size(&self) -> usize {
		self.rows * self.columns
	}

	pub fn deck_size(&self) -> usize {
		self.feature_size.pow(self.feature_count as u32)
	}

	pub fn players(&self) -> usize {
		self.human_players + self.computer_players
	}

	pub fn is_human(&self, player: usize) -> bool {
		player < self.human_players
	}

	/// Which (player, slot) a keyboard character maps to, if any.
	pub fn key_slot(&self, ch: char) -> Option<(usize, usize)> {
		for (player, keys) in self.keys.iter().enumerate().take(self.human_players) {
			if let Some(slot) = keys.chars().position(|k| k == ch) {
				if slot < self.table_size() {
					return Some((player, slot));
				}
			}
		}
		None
	}

	pub fn validate(&self) -> Result<(), String> {
		if self.rows == 0 || self.columns == 0 {
			return Err("rows and columns must be positive".to_string());
		}
		if self.feature_size < 2 {
			return Err("feature_size must be at least 2".to_string());
		}
		if self.feature_count == 0 {
			return Err("feature_count must be positive".to_string());
		}
		if self.players() == 0 {
			return Err("at least one player is required".to_string());
		}
		if self.keys.len() < self.human_players {
			return Err(format!(
				"{} human players configured but only {} key rows",
				self.human_players,
				self.keys.len()
			));
		}
		for (i, keys) in self.keys.iter().enumerate().take(self.human_players) {
			if keys.chars().count() < self.table_size() {
				return Err(format!(
					"key row {} covers {} slots but the table has {}",
					i,
					keys.chars().count(),
					self.table_size()
				));
			}
		}
		Ok(())
	}
}

pub fn load_game<P: AsRef<Path>>(path: P) -> Result<GameConfig, String> {
	let content = fs::read_to_string(&path)
		.map_err(|e| format!("could not read {}: {}", path.as_ref().display(), e))?;

	let config: GameConfig = toml::from_str(&content)
		.map_err(|e| format!("bad game config in {}: {}", path.as_ref().display(), e))?;

	config.validate()?;
	Ok(config)
}

pub fn load_game_auto() -> Result<GameConfig, String> {
	let path = resolve_config("game.toml")?;
	load_game(&path)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_describe_the_standard_game() {
		let config = GameConfig::default();
		assert_eq!(config.table_size(), 12);
		assert_eq!(config.deck_size(), 81);
		assert_eq!(config.players(), 2);
		assert!(config.is_human(0));
		assert!(!config.is_human(1));
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_key_slot_maps_by_position() {
		let config = GameConfig::default();
		assert_eq!(config.key_slot('q'), Some((0, 0)));
		assert_eq!(config.key_slot('v'), Some((0, 11)));
		assert_eq!(config.key_slot('!'), None);
		// second key row belongs to a computer seat by default
		assert_eq!(config.key_slot('u'), None);
	}

	#[test]
	fn test_key_slot_second_human() {
		let mut config = GameConfig::default();
		config.human_players = 2;
		assert_eq!(config.key_slot('u'), Some((1, 0)));
		assert_eq!(config.key_slot('/'), Some((1, 11)));
	}

	#[test]
	fn test_parse_partial_toml() {
		let config: GameConfig = toml::from_str(
			"rows = 2\ncolumns = 2\ncomputer_players = 3\nturn_timeout_ms = -1\n",
		)
		.unwrap();
		assert_eq!(config.table_size(), 4);
		assert_eq!(config.computer_players, 3);
		assert_eq!(config.turn_timeout_ms, -1);
		assert_eq!(config.point_freeze_ms, 1_000);
	}

	#[test]
	fn test_validate_rejects_short_key_rows() {
		let mut config = GameConfig::default();
		config.keys = vec!["qwer".to_string()];
		assert!(config.validate().is_err());
	}

	#[test]
	fn test_validate_rejects_missing_key_rows() {
		let mut config = GameConfig::default();
		config.human_players = 3;
		assert!(config.validate().is_err());
	}

	#[test]
	fn test_validate_rejects_empty_table() {
		let mut config = GameConfig::default();
		config.rows = 0;
		assert!(config.validate().is_err());
	}
}
