use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use crate::claims::ClaimBoard;
use crate::clock::now_millis;
use crate::config::GameConfig;
use crate::events::UserInterface;
use crate::logging;
use crate::table::Table;

/// One seat at the table. Key-presses from the keyboard or the generator
/// land in a bounded queue; the agent's own thread drains it and turns
/// each press into a token toggle under the slot's lock.
pub struct Player {
	pub id: usize,
	pub human: bool,

	score: AtomicU32,
	terminate: AtomicBool,
	freeze_until: AtomicI64,

	queue: Mutex<VecDeque<usize>>,
	available: Condvar,

	feature_size: usize,
	point_freeze_ms: i64,
	penalty_freeze_ms: i64,

	table: Arc<Table>,
	board: Arc<ClaimBoard>,
	ui: Arc<dyn UserInterface>,
}

impl Player {
	pub fn new(
		id: usize,
		human: bool,
		config: &GameConfig,
		table: Arc<Table>,
		board: Arc<ClaimBoard>,
		ui: Arc<dyn UserInterface>,
	) -> Self {
		Self {
			id,
			human,
			score: AtomicU32::new(0),
			terminate: AtomicBool::new(false),
			freeze_until: AtomicI64::new(-1),
			queue: Mutex::new(VecDeque::with_capacity(config.feature_size)),
			available: Condvar::new(),
			feature_size: config.feature_size,
			point_freeze_ms: config.point_freeze_ms,
			penalty_freeze_ms: config.penalty_freeze_ms,
			table,
			board,
			ui,
		}
	}

	/// Admit a key-press. Dropped silently while a claim is pending,
	/// while the table is not ready, while frozen, or when the queue is
	/// already full.
	pub fn key_pressed(&self, slot: usize) {
		if slot >= self.table.slot_count()
			|| self.board.is_examined(self.id)
			|| !self.table.is_ready()
			|| self.freeze_until.load(Ordering::Acquire) >= now_millis()
		{
			return;
		}

		let mut queue = self.queue.lock().unwrap();
		if queue.len() < self.feature_size {
			queue.push_back(slot);
			self.available.notify_one();
		}
	}

	/// The agent loop: drain presses, toggle tokens, stop on terminate.
	pub fn run(&self) {
		let name = format!("player-{}", self.id);
		logging::thread_started(&name);

		while let Some(slot) = self.next_slot() {
			let mut state = self.table.write_slot(slot);
			if self.table.is_ready() && state.card.is_some() {
				self.board.toggle_token(&self.table, &mut state, self.id, slot);
			}
		}

		logging::thread_terminated(&name);
	}

	fn next_slot(&self) -> Option<usize> {
		let mut queue = self.queue.lock().unwrap();
		loop {
			if self.terminate.load(Ordering::Acquire) {
				return None;
			}
			if let Some(slot) = queue.pop_front() {
				return Some(slot);
			}
			queue = self.available.wait(queue).unwrap();
		}
	}

	/// Reward for a legal set.
	pub fn point(&self) {
		let score = self.score.fetch_add(1, Ordering::AcqRel) + 1;
		self.freeze_for(self.point_freeze_ms);
		self.board.set_examined(self.id, false);
		self.clear_queue();
		self.ui.set_score(self.id, score);
		self.ui.set_freeze(self.id, self.point_freeze_ms);
		logging::player::point(self.id, score);
	}

	/// Freeze-out for an illegal claim.
	pub fn penalty(&self) {
		self.freeze_for(self.penalty_freeze_ms);
		self.board.set_examined(self.id, false);
		self.clear_queue();
		logging::player::penalty(self.id);
	}

	fn freeze_for(&self, millis: i64) {
		self.freeze_until.store(now_millis() + millis, Ordering::Release);
	}

	pub fn terminate(&self) {
		self.terminate.store(true, Ordering::Release);
		self.available.notify_all();
	}

	pub fn is_terminated(&self) -> bool {
		self.terminate.load(Ordering::Acquire)
	}

	pub fn score(&self) -> u32 {
		self.score.load(Ordering::Acquire)
	}

	pub fn freeze_until(&self) -> i64 {
		self.freeze_until.load(Ordering::Acquire)
	}

	pub fn set_freeze_until(&self, millis: i64) {
		self.freeze_until.store(millis, Ordering::Release);
	}

	pub fn clear_queue(&self) {
		self.queue.lock().unwrap().clear();
	}

	pub fn queued_presses(&self) -> usize {
		self.queue.lock().unwrap().len()
	}
}
