use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::claims::ClaimBoard;
use crate::clock::{display_round, now_millis, GameClock, Mode};
use crate::config::GameConfig;
use crate::events::{Card, UserInterface};
use crate::generator;
use crate::judge::SetJudge;
use crate::logging;
use crate::player::Player;
use crate::table::Table;

/// Gap between starting (and stopping) consecutive player threads.
const STAGGER_MS: u64 = 10;

/// The single coordinator: owns the deck and the round state machine,
/// consumes the claim queue, and is the only writer of table structure.
pub struct Dealer {
	config: GameConfig,
	table: Arc<Table>,
	board: Arc<ClaimBoard>,
	players: Vec<Arc<Player>>,
	judge: Arc<dyn SetJudge>,
	ui: Arc<dyn UserInterface>,

	deck: Mutex<Vec<Card>>,
	pending_removals: Mutex<VecDeque<Vec<usize>>>,
	clock: Mutex<GameClock>,
	rng: Mutex<StdRng>,
	terminate: AtomicBool,
}

impl Dealer {
	pub fn new(config: GameConfig, judge: Arc<dyn SetJudge>, ui: Arc<dyn UserInterface>) -> Self {
		let table = Arc::new(Table::new(
			config.table_size(),
			config.deck_size(),
			config.players(),
			Arc::clone(&ui),
		));
		let board = Arc::new(ClaimBoard::new(config.players(), config.feature_size));

		let players = (0..config.players())
			.map(|id| {
				Arc::new(Player::new(
					id,
					config.is_human(id),
					&config,
					Arc::clone(&table),
					Arc::clone(&board),
					Arc::clone(&ui),
				))
			})
			.collect();

		let deck = (0..config.deck_size()).map(Card).collect();
		let rng = match config.seed {
			Some(s) => StdRng::seed_from_u64(s),
			None => StdRng::from_os_rng(),
		};
		let clock = GameClock::new(&config);

		Self {
			config,
			table,
			board,
			players,
			judge,
			ui,
			deck: Mutex::new(deck),
			pending_removals: Mutex::new(VecDeque::new()),
			clock: Mutex::new(clock),
			rng: Mutex::new(rng),
			terminate: AtomicBool::new(false),
		}
	}

	pub fn table(&self) -> &Arc<Table> {
		&self.table
	}

	pub fn players(&self) -> &[Arc<Player>] {
		&self.players
	}

	/// The dealer thread: start the seats, run rounds until the game is
	/// decided or terminated, then shut everything down in order.
	pub fn run(&self) {
		logging::thread_started("dealer");

		let mut player_handles = Vec::new();
		for player in &self.players {
			let runner = Arc::clone(player);
			let handle = thread::Builder::new()
				.name(format!("player-{}", player.id))
				.spawn(move || runner.run())
				.unwrap();
			player_handles.push(handle);
			thread::sleep(Duration::from_millis(STAGGER_MS));
		}

		let mut generator_handles = Vec::new();
		for player in self.players.iter().filter(|p| !p.human) {
			generator_handles.push(generator::spawn(
				Arc::clone(player),
				self.config.table_size(),
				self.config.seed,
			));
		}

		let mut round = 0;
		while !self.should_finish() {
			round += 1;
			logging::set_round(round);
			logging::dealer::round_started(round, self.deck.lock().unwrap().len());

			self.place_cards_on_table();
			self.timer_loop();
			self.remove_all_cards_from_table();
			logging::dealer::reshuffle();
		}

		self.announce_winners();

		if !self.terminated() {
			self.terminate();
		}

		for handle in generator_handles.into_iter().rev() {
			let _ = handle.join();
		}
		for handle in player_handles.into_iter().rev() {
			let _ = handle.join();
		}

		logging::thread_terminated("dealer");
	}

	/// Stop every player in descending id order, then the dealer itself.
	/// Safe to call from any thread.
	pub fn terminate(&self) {
		for player in self.players.iter().rev() {
			player.terminate();
			thread::sleep(Duration::from_millis(STAGGER_MS));
		}
		self.terminate.store(true, Ordering::Release);
		self.board.wake_dealer();
	}

	pub fn terminated(&self) -> bool {
		self.terminate.load(Ordering::Acquire)
	}

	/// The game is over when no legal set can be drawn from the deck and
	/// the table combined.
	fn should_finish(&self) -> bool {
		if self.terminated() {
			return true;
		}
		let mut pool = self.deck.lock().unwrap().clone();
		pool.extend(self.table.cards_on_table());
		self.judge.find_sets(&pool, 1).is_empty()
	}

	/// The round's inner loop: nap until woken or due, then do one
	/// bookkeeping pass.
	fn timer_loop(&self) {
		loop {
			let now = now_millis();
			let (expired, nap) = {
				let clock = self.clock.lock().unwrap();
				(clock.round_expired(now), clock.nap(now))
			};
			if self.terminated() || expired {
				return;
			}

			self.board.park(nap);
			self.examine_claims();
			self.update_timer_display(false);
			self.apply_pending_removals();
			self.place_cards_on_table();
		}
	}

	/// Fill every empty slot from the deck, then re-arm the round clock.
	/// The only place that flips the table back to ready.
	fn place_cards_on_table(&self) {
		self.table.set_ready(false);

		let empty = self.table.empty_slots();
		let mut placed_any = false;

		if !empty.is_empty() {
			let mut guards = self.table.write_slots(&empty);
			let mut deck = self.deck.lock().unwrap();

			let mut order = empty.clone();
			{
				let mut rng = self.rng.lock().unwrap();
				order.shuffle(&mut *rng);
				deck.shuffle(&mut *rng);
			}

			for slot in order {
				let Some(card) = deck.pop() else {
					break;
				};
				self.table.place_card(guards.get_mut(slot), card, slot);
				placed_any = true;
				if self.config.table_delay_ms > 0 {
					thread::sleep(Duration::from_millis(self.config.table_delay_ms));
				}
			}
		}

		if self.clock.lock().unwrap().mode() != Mode::Countdown {
			// without a round timer the table reshuffles as soon as it
			// goes dead
			let sets_available = !self.judge.find_sets(&self.table.cards_on_table(), 1).is_empty();
			let mut clock = self.clock.lock().unwrap();
			if sets_available {
				clock.cancel_reshuffle();
			} else {
				clock.force_reshuffle(now_millis());
			}
		}

		if placed_any && !self.should_finish() {
			self.update_timer_display(true);
			if self.config.hints {
				self.log_hints();
			}
		}

		self.table.set_ready(true);
	}

	/// Drain the claim queue in submission order. Each claim is judged
	/// under read locks across the table; stale claims whose tokens were
	/// stolen by an earlier winner are discarded without penalty.
	fn examine_claims(&self) {
		while let Some(claimer) = self.board.next_claim() {
			let snapshot = self.board.snapshot(claimer);

			let guards = self.table.read_all();
			let cards: Vec<Card> = snapshot
				.iter()
				.filter_map(|&slot| guards.get(slot).card)
				.collect();

			if snapshot.len() != self.config.feature_size || cards.len() != snapshot.len() {
				self.board.set_examined(claimer, false);
				logging::dealer::stale_claim(claimer);
				continue;
			}

			if self.judge.test_set(&cards) {
				self.pending_removals.lock().unwrap().push_back(snapshot.clone());
				for player in &self.players {
					for &slot in &snapshot {
						if self.board.discard_token(player.id, slot) {
							self.board.set_examined(player.id, false);
						}
					}
				}
				self.players[claimer].point();
				logging::dealer::legal_set(claimer, &snapshot);
			} else {
				self.players[claimer].penalty();
				logging::dealer::illegal_set(claimer, &snapshot);
			}
		}
		self.table.set_ready(false);
	}

	/// Clear claimed slot triples. Removed cards rejoin the deck except
	/// in Countdown mode, where a claimed set leaves the game for good.
	fn apply_pending_removals(&self) {
		let return_to_deck = self.clock.lock().unwrap().mode() != Mode::Countdown;

		loop {
			let Some(slots) = self.pending_removals.lock().unwrap().pop_front() else {
				break;
			};
			self.table.set_ready(false);

			let mut guards = self.table.write_slots(&slots);
			let mut deck = self.deck.lock().unwrap();
			for slot in guards.slots().to_vec() {
				if let Some(card) = self.table.remove_card(guards.get_mut(slot), slot) {
					if return_to_deck {
						deck.push(card);
					}
				}
			}
		}
	}

	/// Round end: every card and token comes off the table, cards rejoin
	/// the deck, and stale player selections are flushed.
	fn remove_all_cards_from_table(&self) {
		self.table.set_ready(false);
		{
			let mut guards = self.table.write_all();
			self.board.clear_all();
			self.ui.remove_all_tokens();

			let mut deck = self.deck.lock().unwrap();
			for slot in guards.slots().to_vec() {
				if let Some(card) = self.table.remove_card(guards.get_mut(slot), slot) {
					deck.push(card);
				}
			}
		}

		for player in &self.players {
			player.clear_queue();
			self.board.set_examined(player.id, false);
		}
	}

	/// Push freeze and countdown/elapsed readings to the UI; on reset,
	/// re-arm the round deadline and lift every freeze.
	fn update_timer_display(&self, reset: bool) {
		let now = now_millis();
		let mut clock = self.clock.lock().unwrap();
		let warning_ms = clock.warning_ms();

		for player in &self.players {
			let left = (player.freeze_until() - now).max(0);
			self.ui.set_freeze(player.id, display_round(left, left <= warning_ms));
		}

		match clock.mode() {
			Mode::Countdown => {
				if reset {
					clock.reset(now);
					for player in &self.players {
						player.set_freeze_until(-1);
					}
				}
				let delta = clock.countdown(now);
				let warn = delta <= warning_ms;
				self.ui.set_countdown(display_round(delta, warn), warn);
			}
			Mode::Elapsed => {
				if reset {
					clock.reset(now);
				}
				self.ui.set_elapsed(clock.elapsed(now));
			}
			Mode::FreePlay => {}
		}
	}

	fn log_hints(&self) {
		let on_table = self.table.cards_on_table();
		let sets = self.judge.find_sets(&on_table, usize::MAX);
		let as_slots: Vec<Vec<usize>> = sets
			.iter()
			.map(|set| {
				let mut slots: Vec<usize> =
					set.iter().filter_map(|&card| self.table.slot_of(card)).collect();
				slots.sort_unstable();
				slots
			})
			.collect();
		logging::dealer::hints(&as_slots);
	}

	/// Every player tied for the top score wins.
	fn announce_winners(&self) {
		let top = self.players.iter().map(|p| p.score()).max().unwrap_or(0);
		let winners: Vec<usize> = self
			.players
			.iter()
			.filter(|p| p.score() == top)
			.map(|p| p.id)
			.collect();
		self.ui.announce_winner(&winners);
		logging::dealer::winners(&winners, top);
	}

	#[cfg(test)]
	fn enqueue_removal(&self, slots: Vec<usize>) {
		self.pending_removals.lock().unwrap().push_back(slots);
	}
}
