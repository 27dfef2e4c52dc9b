use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

const DAY_MS: u128 = 86_400_000;

static ROUND: AtomicU32 = AtomicU32::new(0);
static SINK: Mutex<Sink> = Mutex::new(Sink { day: 0, file: None });

/// One log file per calendar day; `day` is the day count the open file
/// belongs to, so rotation is a single comparison.
struct Sink {
	day: u64,
	file: Option<File>,
}

impl Sink {
	fn writer(&mut self, now_ms: u128) -> Option<&mut File> {
		let day = (now_ms / DAY_MS) as u64;
		if self.file.is_none() || self.day != day {
			fs::create_dir_all("logs").ok()?;
			let (year, month, dom) = civil_date(day);
			let file = OpenOptions::new()
				.append(true)
				.create(true)
				.open(format!("logs/set-{:04}-{:02}-{:02}.log", year, month, dom))
				.ok()?;
			self.day = day;
			self.file = Some(file);
		}
		self.file.as_mut()
	}
}

fn epoch_millis() -> u128 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap()
		.as_millis()
}

/// Gregorian date for a day count since 1970-01-01. Works on a calendar
/// rebased to March so the leap day falls at the end of the year.
fn civil_date(days: u64) -> (u64, u64, u64) {
	let shifted = days + 719_468;
	let era = shifted / 146_097;
	let day_of_era = shifted % 146_097;
	let year_of_era =
		(day_of_era - day_of_era / 1_460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
	let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
	let rebased_month = (5 * day_of_year + 2) / 153;
	let day = day_of_year - (153 * rebased_month + 2) / 5 + 1;
	let month = if rebased_month < 10 { rebased_month + 3 } else { rebased_month - 9 };
	let year = year_of_era + era * 400 + if month <= 2 { 1 } else { 0 };
	(year, month, day)
}

fn wall_clock(now_ms: u128) -> String {
	let second_of_day = now_ms / 1_000 % 86_400;
	format!(
		"{:02}:{:02}:{:02}.{:03}",
		second_of_day / 3_600,
		second_of_day / 60 % 60,
		second_of_day % 60,
		now_ms % 1_000
	)
}

pub fn set_round(round: u32) {
	ROUND.store(round, Ordering::Relaxed);
}

pub fn log(module: &str, log_type: &str, message: &str) {
	let now_ms = epoch_millis();
	let line = format!(
		"[{}][R{}][{}:{}] {}\n",
		wall_clock(now_ms),
		ROUND.load(Ordering::Relaxed),
		module,
		log_type,
		message
	);

	let Ok(mut sink) = SINK.lock() else {
		return;
	};
	if let Some(file) = sink.writer(now_ms) {
		let _ = file.write_all(line.as_bytes());
		let _ = file.flush();
	}
}

pub fn thread_started(name: &str) {
	log("Thread", "START", name);
}

pub fn thread_terminated(name: &str) {
	log("Thread", "END", name);
}

pub mod dealer {
	use super::log;

	pub fn round_started(round: u32, deck_left: usize) {
		log("Dealer", "ROUND", &format!("round {} started, {} cards in deck", round, deck_left));
	}

	pub fn legal_set(player: usize, slots: &[usize]) {
		log("Dealer", "SET", &format!("player {} claimed a legal set on slots {:?}", player, slots));
	}

	pub fn illegal_set(player: usize, slots: &[usize]) {
		log("Dealer", "MISS", &format!("player {} claimed an illegal set on slots {:?}", player, slots));
	}

	pub fn stale_claim(player: usize) {
		log("Dealer", "STALE", &format!("player {}'s claim lost its tokens before examination", player));
	}

	pub fn reshuffle() {
		log("Dealer", "SHUFFLE", "returning all cards to the deck");
	}

	pub fn hints(sets: &[Vec<usize>]) {
		log("Dealer", "HINT", &format!("sets on table: {:?}", sets));
	}

	pub fn winners(players: &[usize], score: u32) {
		log("Dealer", "WINNER", &format!("players {:?} win with {} points", players, score));
	}
}

pub mod player {
	use super::log;

	pub fn point(id: usize, score: u32) {
		log("Player", "POINT", &format!("player {} scored, now {}", id, score));
	}

	pub fn penalty(id: usize) {
		log("Player", "PENALTY", &format!("player {} frozen for a false claim", id));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_civil_date_epoch() {
		assert_eq!(civil_date(0), (1970, 1, 1));
	}

	#[test]
	fn test_civil_date_handles_leap_day() {
		// 2000-01-01 is day 10957; Feb 29 lands 59 days later
		assert_eq!(civil_date(10_957), (2000, 1, 1));
		assert_eq!(civil_date(11_016), (2000, 2, 29));
		assert_eq!(civil_date(11_017), (2000, 3, 1));
	}

	#[test]
	fn test_civil_date_year_boundary() {
		assert_eq!(civil_date(19_722), (2023, 12, 31));
		assert_eq!(civil_date(19_723), (2024, 1, 1));
	}

	#[test]
	fn test_wall_clock_folds_to_time_of_day() {
		assert_eq!(wall_clock(0), "00:00:00.000");
		assert_eq!(wall_clock(45_296_789), "12:34:56.789");
		assert_eq!(wall_clock(DAY_MS + 1_000), "00:00:01.000");
	}
}
