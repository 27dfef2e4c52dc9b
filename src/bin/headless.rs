use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use set_rush::config::GameConfig;
use set_rush::dealer::Dealer;
use set_rush::events::{ChannelUi, UiEvent};
use set_rush::judge::FeatureJudge;

/// Wall-clock budget for a demo run; random players may take a long time
/// to play the deck down, so the game is cut off after this.
const RUN_LIMIT: Duration = Duration::from_secs(60);

fn main() {
	println!("=== set-rush headless run ===\n");

	let mut config = set_rush::config::load_game_auto().unwrap_or_else(|_| GameConfig::default());
	config.human_players = 0;
	if config.computer_players < 2 {
		config.computer_players = 2;
	}

	let (ui, rx) = ChannelUi::new();
	let judge = Arc::new(FeatureJudge::new(config.feature_size, config.feature_count));
	let dealer = Arc::new(Dealer::new(config, judge, Arc::new(ui)));

	let runner = Arc::clone(&dealer);
	let dealer_thread = thread::spawn(move || runner.run());

	let started = Instant::now();
	let mut event_count = 0u64;
	let mut sets_claimed = 0u64;

	loop {
		match rx.recv_timeout(Duration::from_millis(200)) {
			Ok(event) => {
				event_count += 1;
				match &event {
					UiEvent::CardPlaced { card, slot } => {
						println!("[TABLE] card {} placed in slot {}", card.0, slot);
					}
					UiEvent::CardRemoved { slot } => {
						println!("[TABLE] slot {} cleared", slot);
					}
					UiEvent::Score { player, score } => {
						sets_claimed += 1;
						println!("[SCORE] player {} is at {}", player, score);
					}
					UiEvent::Countdown { millis, warn } if *warn => {
						println!("[CLOCK] {} ms to reshuffle", millis);
					}
					UiEvent::Winners { players } => {
						println!("\n[GAME OVER] winners: {:?}", players);
						break;
					}
					_ => {}
				}
			}
			Err(RecvTimeoutError::Timeout) => {
				if started.elapsed() > RUN_LIMIT && !dealer.terminated() {
					println!("\n[CUTOFF] run limit reached, terminating");
					dealer.terminate();
				}
			}
			Err(RecvTimeoutError::Disconnected) => break,
		}
	}

	// drain whatever arrived after the winner announcement
	while let Ok(event) = rx.try_recv() {
		event_count += 1;
		if let UiEvent::Winners { players } = event {
			println!("[GAME OVER] winners: {:?}", players);
		}
	}

	let _ = dealer_thread.join();

	println!("\n=== Summary ===");
	println!("Events emitted: {}", event_count);
	println!("Sets claimed:   {}", sets_claimed);
	for player in dealer.players() {
		println!("Player {}: {} points", player.id, player.score());
	}
}
