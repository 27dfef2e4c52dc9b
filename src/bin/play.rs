use std::io;
use std::sync::Arc;
use std::thread;

use crossterm::execute;
use crossterm::terminal::{
	disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};

use set_rush::config;
use set_rush::dealer::Dealer;
use set_rush::defaults;
use set_rush::events::ChannelUi;
use set_rush::judge::FeatureJudge;
use set_rush::tui;

fn main() -> io::Result<()> {
	defaults::ensure_config();

	let game_config = match config::load_game_auto() {
		Ok(config) => config,
		Err(e) => {
			eprintln!("{}", e);
			std::process::exit(1);
		}
	};

	let (ui, rx) = ChannelUi::new();
	let judge = Arc::new(FeatureJudge::new(
		game_config.feature_size,
		game_config.feature_count,
	));
	let dealer = Arc::new(Dealer::new(game_config.clone(), judge, Arc::new(ui)));

	let runner = Arc::clone(&dealer);
	let dealer_thread = thread::spawn(move || runner.run());

	enable_raw_mode()?;
	let mut stdout = io::stdout();
	execute!(stdout, EnterAlternateScreen)?;
	let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

	let result = tui::run_game(&mut terminal, &rx, &dealer, &game_config);

	disable_raw_mode()?;
	execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
	terminal.show_cursor()?;

	if !dealer.terminated() {
		dealer.terminate();
	}
	let _ = dealer_thread.join();

	result
}
