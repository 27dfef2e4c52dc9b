use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::logging;
use crate::player::Player;

/// Pause between generated presses; keeps the producer from spinning
/// against a full or gated queue.
const PRESS_PAUSE_MS: u64 = 10;

/// Random key-press producer for a computer seat. Presses uniformly
/// distributed slots until the owning player terminates.
pub fn spawn(player: Arc<Player>, table_size: usize, seed: Option<u64>) -> JoinHandle<()> {
	let name = format!("computer-{}", player.id);
	thread::Builder::new()
		.name(name.clone())
		.spawn(move || {
			logging::thread_started(&name);

			let mut rng = match seed {
				Some(s) => StdRng::seed_from_u64(s.wrapping_add(player.id as u64)),
				None => StdRng::from_os_rng(),
			};

			while !player.is_terminated() {
				player.key_pressed(rng.random_range(0..table_size));
				thread::sleep(Duration::from_millis(PRESS_PAUSE_MS));
			}

			logging::thread_terminated(&name);
		})
		.unwrap()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::claims::ClaimBoard;
	use crate::config::GameConfig;
	use crate::events::NullUi;
	use crate::table::Table;

	use crate::events::UserInterface;

	#[test]
	fn test_generator_stops_on_player_terminate() {
		let config = GameConfig::default();
		let ui: Arc<dyn UserInterface> = Arc::new(NullUi);
		let table = Arc::new(Table::new(4, 81, 1, Arc::clone(&ui)));
		let board = Arc::new(ClaimBoard::new(1, 3));
		let player = Arc::new(Player::new(0, false, &config, table, board, ui));

		let handle = spawn(Arc::clone(&player), 4, Some(7));
		std::thread::sleep(Duration::from_millis(40));
		player.terminate();
		handle.join().unwrap();
	}

	#[test]
	fn test_generator_fills_the_queue_when_admitted() {
		let config = GameConfig::default();
		let ui: Arc<dyn UserInterface> = Arc::new(NullUi);
		let table = Arc::new(Table::new(4, 81, 1, Arc::clone(&ui)));
		table.set_ready(true);
		let board = Arc::new(ClaimBoard::new(1, 3));
		let player = Arc::new(Player::new(0, false, &config, table, board, ui));

		let handle = spawn(Arc::clone(&player), 4, Some(7));
		std::thread::sleep(Duration::from_millis(80));
		player.terminate();
		handle.join().unwrap();

		// nobody drained the queue, so it filled to capacity
		assert_eq!(player.queued_presses(), 3);
	}
}
