use std::sync::mpsc;

use serde::{Deserialize, Serialize};

/// Opaque card identifier in `[0, deck_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card(pub usize);

/// One variant per outbound `UserInterface` call, so a single channel
/// carries everything the core tells the outside world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UiEvent {
	CardPlaced { card: Card, slot: usize },
	CardRemoved { slot: usize },
	TokenPlaced { player: usize, slot: usize },
	TokenRemoved { player: usize, slot: usize },
	SlotTokensCleared { slot: usize },
	AllTokensCleared,
	Score { player: usize, score: u32 },
	Freeze { player: usize, millis: i64 },
	Countdown { millis: i64, warn: bool },
	Elapsed { millis: i64 },
	Winners { players: Vec<usize> },
}

pub trait UserInterface: Send + Sync {
	fn place_card(&self, card: Card, slot: usize);
	fn remove_card(&self, slot: usize);
	fn place_token(&self, player: usize, slot: usize);
	fn remove_token(&self, player: usize, slot: usize);
	fn remove_slot_tokens(&self, slot: usize);
	fn remove_all_tokens(&self);
	fn set_score(&self, player: usize, score: u32);
	fn set_freeze(&self, player: usize, millis: i64);
	fn set_countdown(&self, millis: i64, warn: bool);
	fn set_elapsed(&self, millis: i64);
	fn announce_winner(&self, players: &[usize]);
}

/// Forwards every call onto an mpsc channel. The TUI, the headless
/// printer and the integration tests all consume the same stream.
pub struct ChannelUi {
	tx: mpsc::Sender<UiEvent>,
}

impl ChannelUi {
	pub fn new() -> (Self, mpsc::Receiver<UiEvent>) {
		let (tx, rx) = mpsc::channel();
		(Self { tx }, rx)
	}

	fn emit(&self, event: UiEvent) {
		let _ = self.tx.send(event);
	}
}

impl UserInterface for ChannelUi {
	fn place_card(&self, card: Card, slot: usize) {
		self.emit(UiEvent::CardPlaced { card, slot });
	}

	fn remove_card(&self, slot: usize) {
		self.emit(UiEvent::CardRemoved { slot });
	}

	fn place_token(&self, player: usize, slot: usize) {
		self.emit(UiEvent::TokenPlaced { player, slot });
	}

	fn remove_token(&self, player: usize, slot: usize) {
		self.emit(UiEvent::TokenRemoved { player, slot });
	}

	fn remove_slot_tokens(&self, slot: usize) {
		self.emit(UiEvent::SlotTokensCleared { slot });
	}

	fn remove_all_tokens(&self) {
		self.emit(UiEvent::AllTokensCleared);
	}

	fn set_score(&self, player: usize, score: u32) {
		self.emit(UiEvent::Score { player, score });
	}

	fn set_freeze(&self, player: usize, millis: i64) {
		self.emit(UiEvent::Freeze { player, millis });
	}

	fn set_countdown(&self, millis: i64, warn: bool) {
		self.emit(UiEvent::Countdown { millis, warn });
	}

	fn set_elapsed(&self, millis: i64) {
		self.emit(UiEvent::Elapsed { millis });
	}

	fn announce_winner(&self, players: &[usize]) {
		self.emit(UiEvent::Winners { players: players.to_vec() });
	}
}

/// Discards everything. Useful for tests that only care about state.
pub struct NullUi;

impl UserInterface for NullUi {
	fn place_card(&self, _card: Card, _slot: usize) {}
	fn remove_card(&self, _slot: usize) {}
	fn place_token(&self, _player: usize, _slot: usize) {}
	fn remove_token(&self, _player: usize, _slot: usize) {}
	fn remove_slot_tokens(&self, _slot: usize) {}
	fn remove_all_tokens(&self) {}
	fn set_score(&self, _player: usize, _score: u32) {}
	fn set_freeze(&self, _player: usize, _millis: i64) {}
	fn set_countdown(&self, _millis: i64, _warn: bool) {}
	fn set_elapsed(&self, _millis: i64) {}
	fn announce_winner(&self, _players: &[usize]) {}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_channel_ui_forwards_calls_in_order() {
		let (ui, rx) = ChannelUi::new();

		ui.place_card(Card(7), 2);
		ui.place_token(1, 2);
		ui.set_score(1, 3);
		ui.announce_winner(&[0, 1]);

		assert_eq!(rx.recv().unwrap(), UiEvent::CardPlaced { card: Card(7), slot: 2 });
		assert_eq!(rx.recv().unwrap(), UiEvent::TokenPlaced { player: 1, slot: 2 });
		assert_eq!(rx.recv().unwrap(), UiEvent::Score { player: 1, score: 3 });
		assert_eq!(rx.recv().unwrap(), UiEvent::Winners { players: vec![0, 1] });
	}

	#[test]
	fn test_channel_ui_survives_dropped_receiver() {
		let (ui, rx) = ChannelUi::new();
		drop(rx);
		ui.set_countdown(1000, false);
	}
}
