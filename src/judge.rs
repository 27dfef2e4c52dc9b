use crate::events::Card;

/// The card-semantics collaborator. The game core never inspects card
/// features itself; it only asks whether a combination is legal and
/// whether any legal combination can still be drawn from a pool.
pub trait SetJudge: Send + Sync {
	fn test_set(&self, cards: &[Card]) -> bool;

	/// Up to `limit` legal combinations drawable from `cards`.
	fn find_sets(&self, cards: &[Card], limit: usize) -> Vec<Vec<Card>>;
}

/// Judges by decoding a card id into `feature_count` base-`feature_size`
/// digits. A combination of `feature_size` distinct cards is legal iff
/// every feature column is all-same or all-different.
pub struct FeatureJudge {
	feature_size: usize,
	feature_count: usize,
}

impl FeatureJudge {
	pub fn new(feature_size: usize, feature_count: usize) -> Self {
		Self {
			feature_size,
			feature_count,
		}
	}

	pub fn deck_size(&self) -> usize {
		self.feature_size.pow(self.feature_count as u32)
	}

	pub fn feature(&self, card: Card, index: usize) -> usize {
		card.0 / self.feature_size.pow(index as u32) % self.feature_size
	}

	fn column_legal(&self, cards: &[Card], index: usize) -> bool {
		let first = self.feature(cards[0], index);
		let all_same = cards.iter().all(|&c| self.feature(c, index) == first);
		if all_same {
			return true;
		}
		let mut seen = vec![false; self.feature_size];
		for &card in cards {
			let value = self.feature(card, index);
			if seen[value] {
				return false;
			}
			seen[value] = true;
		}
		true
	}
}

impl SetJudge for FeatureJudge {
	fn test_set(&self, cards: &[Card]) -> bool {
		if cards.len() != self.feature_size {
			return false;
		}
		for (i, &card) in cards.iter().enumerate() {
			if card.0 >= self.deck_size() || cards[..i].contains(&card) {
				return false;
			}
		}
		(0..self.feature_count).all(|index| self.column_legal(cards, index))
	}

	fn find_sets(&self, cards: &[Card], limit: usize) -> Vec<Vec<Card>> {
		let mut found = Vec::new();
		if limit == 0 || cards.len() < self.feature_size {
			return found;
		}

		let mut picked = Vec::with_capacity(self.feature_size);
		self.search(cards, 0, &mut picked, limit, &mut found);
		found
	}
}

impl FeatureJudge {
	fn search(
		&self,
		cards: &[Card],
		from: usize,
		picked: &mut Vec<Card>,
		limit: usize,
		found: &mut Vec<Vec<Card>>,
	) {
		if picked.len() == self.feature_size {
			if self.test_set(picked) {
				found.push(picked.clone());
			}
			return;
		}
		for i in from..cards.len() {
			if found.len() >= limit {
				return;
			}
			picked.push(cards[i]);
			self.search(cards, i + 1, picked, limit, found);
			picked.pop();
		}
	}
}
