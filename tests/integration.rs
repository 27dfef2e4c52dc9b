use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use set_rush::config::GameConfig;
use set_rush::dealer::Dealer;
use set_rush::events::{Card, ChannelUi, UiEvent};
use set_rush::judge::{FeatureJudge, SetJudge};

/// A scripted judge that accepts every three-card claim, so random
/// players drain the deck quickly and the game ends on its own.
struct EveryTripleLegal;

impl SetJudge for EveryTripleLegal {
	fn test_set(&self, cards: &[Card]) -> bool {
		cards.len() == 3
	}

	fn find_sets(&self, cards: &[Card], limit: usize) -> Vec<Vec<Card>> {
		if limit == 0 || cards.len() < 3 {
			return Vec::new();
		}
		vec![cards[..3].to_vec()]
	}
}

fn computers_only_config() -> GameConfig {
	let mut config = GameConfig::default();
	config.human_players = 0;
	config.computer_players = 2;
	config.point_freeze_ms = 0;
	config.penalty_freeze_ms = 0;
	config.seed = Some(1234);
	config
}

fn drain_until_winners(rx: &Receiver<UiEvent>, deadline: Duration) -> Vec<UiEvent> {
	let started = Instant::now();
	let mut events = Vec::new();
	loop {
		let left = deadline
			.checked_sub(started.elapsed())
			.expect("game did not announce winners in time");
		match rx.recv_timeout(left.min(Duration::from_millis(500))) {
			Ok(event) => {
				let done = matches!(event, UiEvent::Winners { .. });
				events.push(event);
				if done {
					return events;
				}
			}
			Err(RecvTimeoutError::Timeout) => {}
			Err(RecvTimeoutError::Disconnected) => {
				panic!("dealer hung up without announcing winners");
			}
		}
	}
}

#[test]
fn test_countdown_game_plays_to_completion() {
	let mut config = computers_only_config();
	config.rows = 2;
	config.columns = 2;
	config.feature_count = 2; // nine-card deck
	config.turn_timeout_ms = 3_000;
	config.turn_timeout_warning_ms = 500;

	let (ui, rx) = ChannelUi::new();
	let dealer = Arc::new(Dealer::new(config, Arc::new(EveryTripleLegal), Arc::new(ui)));

	let runner = Arc::clone(&dealer);
	let handle = thread::spawn(move || runner.run());

	let events = drain_until_winners(&rx, Duration::from_secs(30));
	handle.join().unwrap();

	// the stream respects the slot/card bijection
	let mut occupied = vec![false; 4];
	let mut last_score = vec![0u32; 2];
	let mut saw_countdown = false;
	for event in &events {
		match event {
			UiEvent::CardPlaced { slot, .. } => {
				assert!(!occupied[*slot], "card placed on an occupied slot");
				occupied[*slot] = true;
			}
			UiEvent::CardRemoved { slot } => {
				assert!(occupied[*slot], "card removed from an empty slot");
				occupied[*slot] = false;
			}
			UiEvent::Score { player, score } => {
				assert_eq!(*score, last_score[*player] + 1, "score must grow by one");
				last_score[*player] = *score;
			}
			UiEvent::Countdown { .. } => {
				saw_countdown = true;
			}
			_ => {}
		}
	}
	assert!(saw_countdown, "countdown mode must emit countdown updates");

	// the winners really are the top scorers
	let Some(UiEvent::Winners { players }) = events.last() else {
		panic!("stream must end with a winner announcement");
	};
	let top = last_score.iter().max().copied().unwrap();
	for (player, &score) in last_score.iter().enumerate() {
		assert_eq!(players.contains(&player), score == top);
	}
}

#[test]
fn test_free_play_terminates_cleanly_on_request() {
	let mut config = computers_only_config();
	config.turn_timeout_ms = -1;

	let (ui, rx) = ChannelUi::new();
	let judge = Arc::new(FeatureJudge::new(config.feature_size, config.feature_count));
	let dealer = Arc::new(Dealer::new(config, judge, Arc::new(ui)));

	let runner = Arc::clone(&dealer);
	let handle = thread::spawn(move || runner.run());

	thread::sleep(Duration::from_millis(400));
	dealer.terminate();

	let events = drain_until_winners(&rx, Duration::from_secs(10));
	handle.join().unwrap();

	let placed = events
		.iter()
		.filter(|e| matches!(e, UiEvent::CardPlaced { .. }))
		.count();
	assert!(placed >= 12, "the opening deal fills the table, saw {}", placed);

	for player in dealer.players() {
		assert!(player.is_terminated());
	}
}

#[test]
fn test_elapsed_mode_emits_elapsed_updates_only() {
	let mut config = computers_only_config();
	config.turn_timeout_ms = 0;

	let (ui, rx) = ChannelUi::new();
	let judge = Arc::new(FeatureJudge::new(config.feature_size, config.feature_count));
	let dealer = Arc::new(Dealer::new(config, judge, Arc::new(ui)));

	let runner = Arc::clone(&dealer);
	let handle = thread::spawn(move || runner.run());

	thread::sleep(Duration::from_millis(1_500));
	dealer.terminate();

	let events = drain_until_winners(&rx, Duration::from_secs(10));
	handle.join().unwrap();

	assert!(events.iter().any(|e| matches!(e, UiEvent::Elapsed { .. })));
	assert!(!events.iter().any(|e| matches!(e, UiEvent::Countdown { .. })));
}
