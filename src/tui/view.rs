use crate::events::{Card, UiEvent};

/// Screen-side mirror of the game, folded from the UI event stream.
pub struct TableView {
	pub cards: Vec<Option<Card>>,
	/// tokens[slot][player]
	pub tokens: Vec<Vec<bool>>,
	pub scores: Vec<u32>,
	pub freezes: Vec<i64>,
	pub countdown: Option<(i64, bool)>,
	pub elapsed: Option<i64>,
	pub winners: Option<Vec<usize>>,
}

impl TableView {
	pub fn new(table_size: usize, players: usize) -> Self {
		Self {
			cards: vec![None; table_size],
			tokens: vec![vec![false; players]; table_size],
			scores: vec![0; players],
			freezes: vec![0; players],
			countdown: None,
			elapsed: None,
			winners: None,
		}
	}

	pub fn apply(&mut self, event: &UiEvent) {
		match event {
			UiEvent::CardPlaced { card, slot } => {
				self.cards[*slot] = Some(*card);
			}
			UiEvent::CardRemoved { slot } => {
				self.cards[*slot] = None;
			}
			UiEvent::TokenPlaced { player, slot } => {
				self.tokens[*slot][*player] = true;
			}
			UiEvent::TokenRemoved { player, slot } => {
				self.tokens[*slot][*player] = false;
			}
			UiEvent::SlotTokensCleared { slot } => {
				self.tokens[*slot].fill(false);
			}
			UiEvent::AllTokensCleared => {
				for slot in &mut self.tokens {
					slot.fill(false);
				}
			}
			UiEvent::Score { player, score } => {
				self.scores[*player] = *score;
			}
			UiEvent::Freeze { player, millis } => {
				self.freezes[*player] = *millis;
			}
			UiEvent::Countdown { millis, warn } => {
				self.countdown = Some((*millis, *warn));
			}
			UiEvent::Elapsed { millis } => {
				self.elapsed = Some(*millis);
			}
			UiEvent::Winners { players } => {
				self.winners = Some(players.clone());
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_view_tracks_cards_and_tokens() {
		let mut view = TableView::new(4, 2);

		view.apply(&UiEvent::CardPlaced { card: Card(3), slot: 1 });
		view.apply(&UiEvent::TokenPlaced { player: 0, slot: 1 });
		assert_eq!(view.cards[1], Some(Card(3)));
		assert!(view.tokens[1][0]);

		view.apply(&UiEvent::SlotTokensCleared { slot: 1 });
		view.apply(&UiEvent::CardRemoved { slot: 1 });
		assert!(!view.tokens[1][0]);
		assert_eq!(view.cards[1], None);
	}

	#[test]
	fn test_view_tracks_scores_and_timers() {
		let mut view = TableView::new(4, 2);

		view.apply(&UiEvent::Score { player: 1, score: 2 });
		view.apply(&UiEvent::Countdown { millis: 9_000, warn: false });
		view.apply(&UiEvent::Winners { players: vec![1] });

		assert_eq!(view.scores[1], 2);
		assert_eq!(view.countdown, Some((9_000, false)));
		assert_eq!(view.winners, Some(vec![1]));
	}
}
