use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::config::GameConfig;
use crate::events::Card;
use crate::tui::view::TableView;

const SHAPES: [char; 3] = ['▲', '●', '■'];
const COLORS: [Color; 3] = [Color::Red, Color::Green, Color::Cyan];
const TOKEN_COLORS: [Color; 4] = [Color::Yellow, Color::Magenta, Color::Blue, Color::White];

pub fn render_game(frame: &mut Frame, view: &TableView, config: &GameConfig) {
	let layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([
			Constraint::Length(3),
			Constraint::Min(config.rows as u16 * 4),
			Constraint::Length(view.scores.len() as u16 + 2),
			Constraint::Length(1),
		])
		.split(frame.area());

	render_header(frame, layout[0], view);
	render_grid(frame, layout[1], view, config);
	render_players(frame, layout[2], view, config);
	render_footer(frame, layout[3], view);
}

fn render_header(frame: &mut Frame, area: Rect, view: &TableView) {
	let (text, style) = if let Some((millis, warn)) = view.countdown {
		let style = if warn {
			Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
		} else {
			Style::default().fg(Color::White)
		};
		(format!("Reshuffle in {}", fmt_clock(millis)), style)
	} else if let Some(millis) = view.elapsed {
		(format!("Elapsed {}", fmt_clock(millis)), Style::default().fg(Color::White))
	} else {
		("Free play".to_string(), Style::default().fg(Color::DarkGray))
	};

	let header = Paragraph::new(text)
		.style(style)
		.block(Block::default().borders(Borders::ALL).title(" set-rush "));
	frame.render_widget(header, area);
}

fn render_grid(frame: &mut Frame, area: Rect, view: &TableView, config: &GameConfig) {
	let row_areas = Layout::default()
		.direction(Direction::Vertical)
		.constraints(vec![Constraint::Ratio(1, config.rows as u32); config.rows])
		.split(area);

	for row in 0..config.rows {
		let cell_areas = Layout::default()
			.direction(Direction::Horizontal)
			.constraints(vec![Constraint::Ratio(1, config.columns as u32); config.columns])
			.split(row_areas[row]);

		for column in 0..config.columns {
			let slot = row * config.columns + column;
			render_cell(frame, cell_areas[column], view, config, slot);
		}
	}
}

fn render_cell(frame: &mut Frame, area: Rect, view: &TableView, config: &GameConfig, slot: usize) {
	let key = slot_key(config, slot);
	let title = match key {
		Some(ch) => format!(" {} ", ch),
		None => format!(" {} ", slot),
	};

	let card_line = match view.cards[slot] {
		Some(card) => card_line(card, config),
		None => Line::from(Span::styled("· · ·", Style::default().fg(Color::DarkGray))),
	};

	let mut token_spans = Vec::new();
	for (player, &held) in view.tokens[slot].iter().enumerate() {
		if held {
			let color = TOKEN_COLORS[player % TOKEN_COLORS.len()];
			token_spans.push(Span::styled(format!("●{} ", player), Style::default().fg(color)));
		}
	}

	let cell = Paragraph::new(vec![card_line, Line::from(token_spans)])
		.block(Block::default().borders(Borders::ALL).title(title))
		.centered();
	frame.render_widget(cell, area);
}

fn render_players(frame: &mut Frame, area: Rect, view: &TableView, config: &GameConfig) {
	let mut lines = Vec::new();
	for (player, &score) in view.scores.iter().enumerate() {
		let kind = if config.is_human(player) { "human" } else { "computer" };
		let frozen = view.freezes[player];
		let freeze_note = if frozen > 0 {
			format!("  frozen {}", fmt_clock(frozen))
		} else {
			String::new()
		};

		let is_winner = view
			.winners
			.as_ref()
			.map(|winners| winners.contains(&player))
			.unwrap_or(false);
		let style = if is_winner {
			Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
		} else if frozen > 0 {
			Style::default().fg(Color::Blue)
		} else {
			Style::default().fg(Color::White)
		};

		let token_color = TOKEN_COLORS[player % TOKEN_COLORS.len()];
		lines.push(Line::from(vec![
			Span::styled(format!("●{} ", player), Style::default().fg(token_color)),
			Span::styled(
				format!("{:<8} score {:>2}{}", kind, score, freeze_note),
				style,
			),
		]));
	}

	let panel = Paragraph::new(lines)
		.block(Block::default().borders(Borders::ALL).title(" Players "));
	frame.render_widget(panel, area);
}

fn render_footer(frame: &mut Frame, area: Rect, view: &TableView) {
	let text = match &view.winners {
		Some(winners) => {
			let names: Vec<String> = winners.iter().map(|p| format!("P{}", p)).collect();
			format!("Winner: {} — press any key to exit", names.join(", "))
		}
		None => "press your slot keys to mark cards · Esc quits".to_string(),
	};
	let footer = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
	frame.render_widget(footer, area);
}

fn slot_key(config: &GameConfig, slot: usize) -> Option<char> {
	config
		.keys
		.first()
		.filter(|_| config.human_players > 0)
		.and_then(|keys| keys.chars().nth(slot))
}

fn card_line(card: Card, config: &GameConfig) -> Line<'static> {
	let digit = |index: usize| card.0 / config.feature_size.pow(index as u32) % config.feature_size;

	let count = digit(0) % 3 + 1;
	let shape = SHAPES[digit(1) % SHAPES.len()];
	let color = COLORS[digit(2) % COLORS.len()];
	let modifier = match digit(3) % 3 {
		0 => Modifier::BOLD,
		1 => Modifier::DIM,
		_ => Modifier::UNDERLINED,
	};

	let glyphs: String = std::iter::repeat(shape).take(count).collect();
	Line::from(Span::styled(glyphs, Style::default().fg(color).add_modifier(modifier)))
}

fn fmt_clock(millis: i64) -> String {
	if millis < 10_000 && millis % 1_000 != 0 {
		format!("{:.1}s", millis as f64 / 1_000.0)
	} else {
		let secs = millis / 1_000;
		if secs >= 60 {
			format!("{}:{:02}", secs / 60, secs % 60)
		} else {
			format!("{}s", secs)
		}
	}
}
