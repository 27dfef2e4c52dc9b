use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::events::{Card, UserInterface};

/// Everything protected by one slot's lock: the card in the slot and the
/// per-player token marks on it.
pub struct SlotState {
	pub card: Option<Card>,
	tokens: Vec<bool>,
}

impl SlotState {
	fn new(players: usize) -> Self {
		Self {
			card: None,
			tokens: vec![false; players],
		}
	}

	pub fn has_token(&self, player: usize) -> bool {
		self.tokens[player]
	}
}

/// Write guards over a set of slots, acquired in ascending slot order and
/// released in descending order.
pub struct WriteGuards<'a> {
	slots: Vec<usize>,
	guards: Vec<RwLockWriteGuard<'a, SlotState>>,
}

impl<'a> WriteGuards<'a> {
	pub fn slots(&self) -> &[usize] {
		&self.slots
	}

	pub fn get_mut(&mut self, slot: usize) -> &mut SlotState {
		let index = self
			.slots
			.iter()
			.position(|&s| s == slot)
			.expect("slot is not covered by this lock set");
		&mut self.guards[index]
	}
}

impl Drop for WriteGuards<'_> {
	fn drop(&mut self) {
		while let Some(guard) = self.guards.pop() {
			drop(guard);
		}
	}
}

/// Read guards over the whole table, one per slot, same lock discipline.
pub struct ReadGuards<'a> {
	guards: Vec<RwLockReadGuard<'a, SlotState>>,
}

impl<'a> ReadGuards<'a> {
	pub fn get(&self, slot: usize) -> &SlotState {
		&self.guards[slot]
	}
}

impl Drop for ReadGuards<'_> {
	fn drop(&mut self) {
		while let Some(guard) = self.guards.pop() {
			drop(guard);
		}
	}
}

/// The shared grid: slot↔card bijection plus token marks, with one
/// read-write lock per slot and a global admission flag.
pub struct Table {
	slots: Vec<RwLock<SlotState>>,
	card_slots: RwLock<Vec<Option<usize>>>,
	ready: AtomicBool,
	ui: Arc<dyn UserInterface>,
}

impl Table {
	pub fn new(table_size: usize, deck_size: usize, players: usize, ui: Arc<dyn UserInterface>) -> Self {
		Self {
			slots: (0..table_size).map(|_| RwLock::new(SlotState::new(players))).collect(),
			card_slots: RwLock::new(vec![None; deck_size]),
			ready: AtomicBool::new(false),
			ui,
		}
	}

	pub fn slot_count(&self) -> usize {
		self.slots.len()
	}

	/// While false, player agents must not turn key-presses into token
	/// actions. Written only by the dealer.
	pub fn is_ready(&self) -> bool {
		self.ready.load(Ordering::Acquire)
	}

	pub fn set_ready(&self, ready: bool) {
		self.ready.store(ready, Ordering::Release);
	}

	pub fn read_slot(&self, slot: usize) -> RwLockReadGuard<'_, SlotState> {
		self.slots[slot].read().unwrap()
	}

	pub fn write_slot(&self, slot: usize) -> RwLockWriteGuard<'_, SlotState> {
		self.slots[slot].write().unwrap()
	}

	/// Lock several slots for writing; duplicates collapse.
	pub fn write_slots(&self, slots: &[usize]) -> WriteGuards<'_> {
		let mut sorted = slots.to_vec();
		sorted.sort_unstable();
		sorted.dedup();
		let guards = sorted
			.iter()
			.map(|&slot| self.slots[slot].write().unwrap())
			.collect();
		WriteGuards { slots: sorted, guards }
	}

	pub fn write_all(&self) -> WriteGuards<'_> {
		let all: Vec<usize> = (0..self.slots.len()).collect();
		self.write_slots(&all)
	}

	pub fn read_all(&self) -> ReadGuards<'_> {
		ReadGuards {
			guards: self.slots.iter().map(|slot| slot.read().unwrap()).collect(),
		}
	}

	/// Requires the slot empty and the card unplaced; the caller holds the
	/// slot's write lock.
	pub fn place_card(&self, state: &mut SlotState, card: Card, slot: usize) {
		debug_assert!(state.card.is_none());
		state.card = Some(card);
		self.card_slots.write().unwrap()[card.0] = Some(slot);
		self.ui.place_card(card, slot);
	}

	/// Clears the slot and every token on it. Returns the removed card, or
	/// None if the slot was already empty.
	pub fn remove_card(&self, state: &mut SlotState, slot: usize) -> Option<Card> {
		let card = state.card.take()?;
		self.card_slots.write().unwrap()[card.0] = None;
		if state.tokens.iter().any(|&t| t) {
			state.tokens.fill(false);
			self.ui.remove_slot_tokens(slot);
		}
		self.ui.remove_card(slot);
		Some(card)
	}

	/// No-op on an empty slot: a token may only mark a card.
	pub fn place_token(&self, state: &mut SlotState, player: usize, slot: usize) {
		if state.card.is_some() && !state.tokens[player] {
			state.tokens[player] = true;
			self.ui.place_token(player, slot);
		}
	}

	/// No-op if the token is absent.
	pub fn remove_token(&self, state: &mut SlotState, player: usize, slot: usize) {
		if state.tokens[player] {
			state.tokens[player] = false;
			self.ui.remove_token(player, slot);
		}
	}

	pub fn slot_of(&self, card: Card) -> Option<usize> {
		self.card_slots.read().unwrap()[card.0]
	}

	pub fn count_cards(&self) -> usize {
		self.slots
			.iter()
			.filter(|slot| slot.read().unwrap().card.is_some())
			.count()
	}

	pub fn cards_on_table(&self) -> Vec<Card> {
		self.slots
			.iter()
			.filter_map(|slot| slot.read().unwrap().card)
			.collect()
	}

	pub fn empty_slots(&self) -> Vec<usize> {
		(0..self.slots.len())
			.filter(|&slot| self.slots[slot].read().unwrap().card.is_none())
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::events::NullUi;

	fn table() -> Table {
		Table::new(4, 9, 2, Arc::new(NullUi))
	}

	#[test]
	fn test_place_and_remove_keep_the_bijection() {
		let table = table();

		{
			let mut state = table.write_slot(2);
			table.place_card(&mut state, Card(5), 2);
		}
		assert_eq!(table.read_slot(2).card, Some(Card(5)));
		assert_eq!(table.slot_of(Card(5)), Some(2));
		assert_eq!(table.count_cards(), 1);

		{
			let mut state = table.write_slot(2);
			assert_eq!(table.remove_card(&mut state, 2), Some(Card(5)));
		}
		assert_eq!(table.read_slot(2).card, None);
		assert_eq!(table.slot_of(Card(5)), None);
		assert_eq!(table.count_cards(), 0);
	}

	#[test]
	fn test_remove_empty_slot_is_a_noop() {
		let table = table();
		let mut state = table.write_slot(0);
		assert_eq!(table.remove_card(&mut state, 0), None);
	}

	#[test]
	fn test_tokens_require_a_card() {
		let table = table();

		{
			let mut state = table.write_slot(1);
			table.place_token(&mut state, 0, 1);
			assert!(!state.has_token(0));

			table.place_card(&mut state, Card(3), 1);
			table.place_token(&mut state, 0, 1);
			assert!(state.has_token(0));
		}
	}

	#[test]
	fn test_remove_card_clears_tokens() {
		let table = table();
		let mut state = table.write_slot(1);
		table.place_card(&mut state, Card(3), 1);
		table.place_token(&mut state, 0, 1);
		table.place_token(&mut state, 1, 1);

		table.remove_card(&mut state, 1);
		assert!(!state.has_token(0));
		assert!(!state.has_token(1));
	}

	#[test]
	fn test_remove_absent_token_is_a_noop() {
		let table = table();
		let mut state = table.write_slot(0);
		table.place_card(&mut state, Card(0), 0);
		table.remove_token(&mut state, 1, 0);
		assert!(!state.has_token(1));
	}

	#[test]
	fn test_write_slots_collapses_duplicates_and_sorts() {
		let table = table();
		let guards = table.write_slots(&[3, 1, 3, 1, 0]);
		assert_eq!(guards.slots(), &[0, 1, 3]);
	}

	#[test]
	fn test_empty_slots_and_cards_on_table() {
		let table = table();
		{
			let mut state = table.write_slot(0);
			table.place_card(&mut state, Card(7), 0);
		}
		{
			let mut state = table.write_slot(3);
			table.place_card(&mut state, Card(8), 3);
		}
		assert_eq!(table.empty_slots(), vec![1, 2]);
		assert_eq!(table.cards_on_table(), vec![Card(7), Card(8)]);
	}

	#[test]
	fn test_ready_flag_round_trip() {
		let table = table();
		assert!(!table.is_ready());
		table.set_ready(true);
		assert!(table.is_ready());
		table.set_ready(false);
		assert!(!table.is_ready());
	}
}
