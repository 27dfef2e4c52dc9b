use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::table::{SlotState, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
	Placed,
	/// The placement completed a full selection and queued a claim.
	Claimed,
	Removed,
	Ignored,
}

/// Claim-side shared state: each player's token slots, the FIFO of
/// players awaiting examination, and the condvar the dealer parks on.
/// Submitting a claim is what wakes the dealer.
pub struct ClaimBoard {
	feature_size: usize,
	tokens: Vec<Mutex<BTreeSet<usize>>>,
	examined: Vec<AtomicBool>,
	claims: Mutex<VecDeque<usize>>,
	wake: Condvar,
}

impl ClaimBoard {
	pub fn new(players: usize, feature_size: usize) -> Self {
		Self {
			feature_size,
			tokens: (0..players).map(|_| Mutex::new(BTreeSet::new())).collect(),
			examined: (0..players).map(|_| AtomicBool::new(false)).collect(),
			claims: Mutex::new(VecDeque::new()),
			wake: Condvar::new(),
		}
	}

	/// Toggle a player's token on a slot. The caller holds the slot's
	/// write lock and passes its guard so the table marks stay in step
	/// with the model. A selection cannot grow past `feature_size`; the
	/// press that reaches it queues a claim and wakes the dealer.
	pub fn toggle_token(
		&self,
		table: &Table,
		state: &mut SlotState,
		player: usize,
		slot: usize,
	) -> ToggleOutcome {
		let mut tokens = self.tokens[player].lock().unwrap();

		if tokens.remove(&slot) {
			table.remove_token(state, player, slot);
			return ToggleOutcome::Removed;
		}

		if tokens.len() >= self.feature_size {
			return ToggleOutcome::Ignored;
		}

		tokens.insert(slot);
		table.place_token(state, player, slot);

		if tokens.len() == self.feature_size {
			self.examined[player].store(true, Ordering::Release);
			self.claims.lock().unwrap().push_back(player);
			self.wake.notify_all();
			return ToggleOutcome::Claimed;
		}

		ToggleOutcome::Placed
	}

	/// Ascending-slot copy of the player's current selection.
	pub fn snapshot(&self, player: usize) -> Vec<usize> {
		self.tokens[player].lock().unwrap().iter().copied().collect()
	}

	pub fn token_count(&self, player: usize) -> usize {
		self.tokens[player].lock().unwrap().len()
	}

	/// Drop a token from the model only; table marks disappear when the
	/// card itself is removed. Returns whether anything changed.
	pub fn discard_token(&self, player: usize, slot: usize) -> bool {
		self.tokens[player].lock().unwrap().remove(&slot)
	}

	pub fn clear_all(&self) {
		for tokens in &self.tokens {
			tokens.lock().unwrap().clear();
		}
	}

	pub fn is_examined(&self, player: usize) -> bool {
		self.examined[player].load(Ordering::Acquire)
	}

	pub fn set_examined(&self, player: usize, examined: bool) {
		self.examined[player].store(examined, Ordering::Release);
	}

	pub fn next_claim(&self) -> Option<usize> {
		self.claims.lock().unwrap().pop_front()
	}

	pub fn claims_pending(&self) -> usize {
		self.claims.lock().unwrap().len()
	}

	/// Park the dealer until a claim arrives, someone calls
	/// `wake_dealer`, or the timeout passes. Spurious wake-ups surface as
	/// an early return; the caller re-checks its state either way.
	pub fn park(&self, timeout: Duration) {
		let claims = self.claims.lock().unwrap();
		if claims.is_empty() {
			let _ = self.wake.wait_timeout(claims, timeout).unwrap();
		}
	}

	pub fn wake_dealer(&self) {
		self.wake.notify_all();
	}
}
