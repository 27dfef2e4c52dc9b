pub mod view;
pub mod widgets;

pub use view::TableView;

use std::io;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::GameConfig;
use crate::dealer::Dealer;
use crate::events::UiEvent;

/// Draw/poll loop for an interactive game. Keyboard characters route to
/// player slots through the config key map; Esc or Ctrl-C ends the game.
/// Returns once the winner screen is dismissed.
pub fn run_game(
	terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
	rx: &mpsc::Receiver<UiEvent>,
	dealer: &Dealer,
	config: &GameConfig,
) -> io::Result<()> {
	// drop keystrokes buffered before the game started
	while event::poll(Duration::ZERO)? {
		let _ = event::read();
	}

	let mut view = TableView::new(config.table_size(), config.players());

	loop {
		while let Ok(event) = rx.try_recv() {
			view.apply(&event);
		}

		terminal.draw(|f| widgets::render_game(f, &view, config))?;

		if event::poll(Duration::from_millis(50))? {
			if let Event::Key(key) = event::read()? {
				if key.kind != KeyEventKind::Press {
					continue;
				}

				if view.winners.is_some() {
					return Ok(());
				}

				let quit = key.code == KeyCode::Esc
					|| (key.code == KeyCode::Char('c')
						&& key.modifiers.contains(KeyModifiers::CONTROL));
				if quit {
					if !dealer.terminated() {
						dealer.terminate();
					}
					continue;
				}

				if let KeyCode::Char(ch) = key.code {
					if let Some((player, slot)) = config.key_slot(ch) {
						dealer.players()[player].key_pressed(slot);
					}
				}
			}
		}
	}
}
