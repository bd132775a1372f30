//! Terminal view for the guessing game: key handling and ratatui rendering
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, warn};

use crate::core::game::{Flow, Game};
use super::error::{parse_guess, GameError};
use super::game::{Outcome, RoundEngine, RoundSnapshot};
use super::preset::Difficulty;
use super::target::{RandomTarget, TargetSource};

// i64 has 19 digits; anything longer cannot parse anyway.
const MAX_INPUT_LEN: usize = 19;

pub struct GuessApp<S: TargetSource = RandomTarget> {
    engine: RoundEngine<S>,
    snapshot: RoundSnapshot,
    input: String,
    notice: Option<String>,
}

impl<S: TargetSource> GuessApp<S> {
    pub fn new(engine: RoundEngine<S>) -> Self {
        let snapshot = engine.snapshot();
        Self {
            engine,
            snapshot,
            input: String::new(),
            notice: None,
        }
    }

    pub fn engine(&self) -> &RoundEngine<S> {
        &self.engine
    }

    pub fn snapshot(&self) -> &RoundSnapshot {
        &self.snapshot
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Boundary error shown instead of the round message, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn switch_difficulty(&mut self, difficulty: Difficulty) {
        self.snapshot = self.engine.change_difficulty(difficulty);
        self.input.clear();
        self.notice = None;
    }

    fn new_round(&mut self) {
        self.snapshot = self.engine.start_round(None);
        self.input.clear();
        self.notice = None;
    }

    fn submit(&mut self) {
        let raw = std::mem::take(&mut self.input);
        if self.snapshot.is_over {
            self.notice = Some(GameError::RoundAlreadyOver.to_string());
            return;
        }
        match parse_guess(&raw).and_then(|value| self.engine.submit_guess(value)) {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                self.notice = None;
            }
            Err(e) => {
                warn!(input = %raw, error = %e, "guess not accepted");
                self.notice = Some(e.to_string());
            }
        }
    }

    fn message_line(&self) -> Line<'static> {
        if let Some(notice) = &self.notice {
            return Line::styled(notice.clone(), Style::default().fg(Color::Yellow));
        }
        let style = match self.snapshot.outcome {
            Outcome::Won => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            Outcome::Lost => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            Outcome::InProgress => Style::default(),
        };
        Line::styled(self.snapshot.message.clone(), style)
    }

    fn difficulty_bar(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for d in Difficulty::ALL {
            let style = if d == self.snapshot.difficulty {
                Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!(" {} ", d.label()), style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }
}

impl<S: TargetSource> Game for GuessApp<S> {
    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        debug!(code = ?key.code, "key pressed");
        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Flow::Quit;
            }
            KeyCode::Left | KeyCode::BackTab => {
                self.switch_difficulty(self.snapshot.difficulty.prev())
            }
            KeyCode::Right | KeyCode::Tab => {
                self.switch_difficulty(self.snapshot.difficulty.next())
            }
            KeyCode::Char('n') | KeyCode::Char('N') if self.snapshot.is_over => self.new_round(),
            KeyCode::Char(c) if c.is_ascii_digit() && !self.snapshot.is_over => {
                if self.input.len() < MAX_INPUT_LEN {
                    self.input.push(c);
                }
            }
            KeyCode::Char('-') if self.input.is_empty() && !self.snapshot.is_over => {
                self.input.push('-')
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => self.submit(),
            _ => {}
        }
        Flow::Continue
    }

    fn render(&self, frame: &mut Frame) {
        let s = &self.snapshot;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.area());

        frame.render_widget(
            Paragraph::new("Guess the Number")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Cyan)),
            chunks[0],
        );

        frame.render_widget(
            Paragraph::new(self.difficulty_bar()).alignment(Alignment::Center),
            chunks[1],
        );

        let info = vec![
            Line::from(format!("I'm thinking of a number between 1 and {}.", s.max_value)),
            Line::from(format!("Attempts left: {}", s.attempts_remaining)),
            Line::from(format!(
                "Score: {}   (won {}, lost {})",
                s.cumulative_score, s.rounds_won, s.rounds_lost
            )),
        ];
        frame.render_widget(Paragraph::new(info), chunks[2]);

        let (title, input_style) = if s.is_over {
            (" Round over ", Style::default().fg(Color::DarkGray))
        } else {
            (" Your guess ", Style::default())
        };
        let input_area = chunks[3];
        frame.render_widget(
            Paragraph::new(format!("> {}", self.input))
                .style(input_style)
                .block(Block::default().borders(Borders::ALL).title(title)),
            input_area,
        );
        if !s.is_over {
            // border + "> "
            let x = input_area.x + 3 + self.input.len() as u16;
            let x = x.min(input_area.right().saturating_sub(2));
            frame.set_cursor_position((x, input_area.y + 1));
        }

        frame.render_widget(Paragraph::new(self.message_line()), chunks[4]);

        let help = if s.is_over {
            "[N] New game  [←/→] Difficulty  [Esc] Quit"
        } else {
            "[0-9] Type  [Enter] Guess  [←/→] Difficulty  [Esc] Quit"
        };
        frame.render_widget(
            Paragraph::new(help)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray)),
            chunks[6],
        );
    }
}
