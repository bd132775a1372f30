use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::error::GameError;
use super::preset::{Difficulty, DifficultyPreset};
use super::target::{RandomTarget, TargetSource};

const ATTEMPT_PENALTY: u32 = 10;
const MIN_AWARD: u32 = 10;

/// Where the current round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

/// Per-round state. Replaced wholesale when a new round starts.
#[derive(Debug, Clone)]
struct RoundState {
    target: u32,
    attempts_used: u32,
    outcome: Outcome,
    last_message: String,
}

impl RoundState {
    fn is_over(&self) -> bool {
        self.outcome != Outcome::InProgress
    }
}

/// State that outlives individual rounds.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub difficulty: Difficulty,
    pub cumulative_score: u64,
    pub rounds_won: u32,
    pub rounds_lost: u32,
}

/// Read-only view of the engine handed to the front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSnapshot {
    pub difficulty: Difficulty,
    pub max_value: u32,
    pub max_attempts: u32,
    pub attempts_used: u32,
    pub attempts_remaining: u32,
    pub message: String,
    pub is_over: bool,
    pub outcome: Outcome,
    pub cumulative_score: u64,
    pub rounds_won: u32,
    pub rounds_lost: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revealed_target: Option<u32>,
}

/// Points for a win on the given 1-based attempt.
pub fn score_for(preset: DifficultyPreset, attempt: u32) -> u32 {
    let penalty = attempt.saturating_sub(1).saturating_mul(ATTEMPT_PENALTY);
    preset.max_value.saturating_sub(penalty).max(MIN_AWARD)
}

/// Owns the round and session state and applies the game rules.
pub struct RoundEngine<S: TargetSource = RandomTarget> {
    source: S,
    session: SessionState,
    round: RoundState,
}

impl RoundEngine<RandomTarget> {
    /// Engine drawing targets from OS entropy, or from `seed` when given.
    pub fn with_seed(difficulty: Difficulty, seed: Option<u64>) -> Self {
        let source = match seed {
            Some(seed) => RandomTarget::seeded(seed),
            None => RandomTarget::from_entropy(),
        };
        Self::new(difficulty, source)
    }
}

impl<S: TargetSource> RoundEngine<S> {
    /// Creates the session and starts its first round.
    pub fn new(difficulty: Difficulty, mut source: S) -> Self {
        let round = Self::fresh_round(&mut source, difficulty.preset());
        let session = SessionState { difficulty, ..SessionState::default() };
        Self { source, session, round }
    }

    fn fresh_round(source: &mut S, preset: DifficultyPreset) -> RoundState {
        let target = source.pick(preset.max_value);
        // Never above trace: in plain mode logs share the player's terminal.
        trace!(difficulty = %preset.difficulty, target, "target chosen");
        RoundState {
            target,
            attempts_used: 0,
            outcome: Outcome::InProgress,
            last_message: String::new(),
        }
    }

    pub fn preset(&self) -> DifficultyPreset {
        self.session.difficulty.preset()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn is_over(&self) -> bool {
        self.round.is_over()
    }

    /// Starts a new round, switching difficulty first when one is given.
    pub fn start_round(&mut self, difficulty: Option<Difficulty>) -> RoundSnapshot {
        if let Some(difficulty) = difficulty {
            self.session.difficulty = difficulty;
        }
        let preset = self.preset();
        self.round = Self::fresh_round(&mut self.source, preset);
        info!(difficulty = %preset.difficulty, max_value = preset.max_value, "round started");
        self.snapshot()
    }

    /// Like [`start_round`](Self::start_round) but takes an unvalidated name.
    pub fn start_round_named(&mut self, name: Option<&str>) -> Result<RoundSnapshot, GameError> {
        let difficulty = name.map(str::parse::<Difficulty>).transpose()?;
        Ok(self.start_round(difficulty))
    }

    /// Always starts a fresh round at the new difficulty.
    pub fn change_difficulty(&mut self, difficulty: Difficulty) -> RoundSnapshot {
        self.start_round(Some(difficulty))
    }

    pub fn change_difficulty_named(&mut self, name: &str) -> Result<RoundSnapshot, GameError> {
        let difficulty = name.parse::<Difficulty>()?;
        Ok(self.change_difficulty(difficulty))
    }

    pub fn submit_guess(&mut self, value: i64) -> Result<RoundSnapshot, GameError> {
        if self.round.is_over() {
            warn!(value, "guess rejected, round already over");
            return Err(GameError::RoundAlreadyOver);
        }

        let preset = self.preset();
        let round = &mut self.round;
        round.attempts_used += 1;
        let target = i64::from(round.target);

        // A hit on the final attempt is still a win.
        if value == target {
            let award = score_for(preset, round.attempts_used);
            self.session.cumulative_score += u64::from(award);
            self.session.rounds_won += 1;
            round.outcome = Outcome::Won;
            round.last_message = format!(
                "Congratulations! You guessed it in {} attempts.",
                round.attempts_used
            );
            info!(
                attempts = round.attempts_used,
                award,
                score = self.session.cumulative_score,
                "round won"
            );
        } else if round.attempts_used >= preset.max_attempts {
            self.session.rounds_lost += 1;
            round.outcome = Outcome::Lost;
            round.last_message = format!("Game over! The number was {}.", round.target);
            info!(target = round.target, "round lost");
        } else if value < target {
            round.last_message = "Too low! Try again.".to_string();
            debug!(value, attempts = round.attempts_used, "too low");
        } else {
            round.last_message = "Too high! Try again.".to_string();
            debug!(value, attempts = round.attempts_used, "too high");
        }

        Ok(self.snapshot())
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let preset = self.preset();
        let round = &self.round;
        RoundSnapshot {
            difficulty: preset.difficulty,
            max_value: preset.max_value,
            max_attempts: preset.max_attempts,
            attempts_used: round.attempts_used,
            attempts_remaining: preset.max_attempts.saturating_sub(round.attempts_used),
            message: round.last_message.clone(),
            is_over: round.is_over(),
            outcome: round.outcome,
            cumulative_score: self.session.cumulative_score,
            rounds_won: self.session.rounds_won,
            rounds_lost: self.session.rounds_lost,
            revealed_target: round.is_over().then_some(round.target),
        }
    }

    #[cfg(test)]
    fn target(&self) -> u32 {
        self.round.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::guess::target::FixedTarget;

    fn engine(difficulty: Difficulty, target: u32) -> RoundEngine<FixedTarget> {
        RoundEngine::new(difficulty, FixedTarget(target))
    }

    #[test]
    fn scenario_easy_win_on_third_attempt() {
        let mut e = engine(Difficulty::Easy, 50);

        let s = e.submit_guess(25).unwrap();
        assert_eq!(s.message, "Too low! Try again.");
        let s = e.submit_guess(75).unwrap();
        assert_eq!(s.message, "Too high! Try again.");
        let s = e.submit_guess(50).unwrap();
        assert_eq!(s.message, "Congratulations! You guessed it in 3 attempts.");

        assert!(s.is_over);
        assert_eq!(s.outcome, Outcome::Won);
        assert_eq!(s.cumulative_score, 80);
        assert_eq!(s.attempts_remaining, 7);
        assert_eq!(s.revealed_target, Some(50));
    }

    #[test]
    fn scenario_hard_exhaustion_reveals_target() {
        let mut e = engine(Difficulty::Hard, 500);
        let mut last = None;
        for guess in [1, 999, 250, 750, 499, 501] {
            last = Some(e.submit_guess(guess).unwrap());
        }
        let s = last.unwrap();
        assert!(s.is_over);
        assert_eq!(s.outcome, Outcome::Lost);
        assert_eq!(s.attempts_used, 6);
        assert_eq!(s.attempts_remaining, 0);
        assert_eq!(s.message, "Game over! The number was 500.");
        assert_eq!(s.cumulative_score, 0);
        assert_eq!(s.rounds_lost, 1);
    }

    #[test]
    fn scenario_change_difficulty_mid_round() {
        let mut e = engine(Difficulty::Easy, 50);
        e.submit_guess(10).unwrap();
        e.submit_guess(20).unwrap();

        let s = e.change_difficulty(Difficulty::Medium);
        assert_eq!(s.difficulty, Difficulty::Medium);
        assert_eq!(s.attempts_used, 0);
        assert_eq!(s.max_attempts, 8);
        assert_eq!(s.max_value, 500);
        assert!(!s.is_over);
        assert!(s.message.is_empty());
    }

    #[test]
    fn win_on_last_attempt_is_a_win() {
        let mut e = engine(Difficulty::Hard, 777);
        for _ in 0..5 {
            e.submit_guess(1).unwrap();
        }
        let s = e.submit_guess(777).unwrap();
        assert_eq!(s.outcome, Outcome::Won);
        assert_eq!(s.cumulative_score, 950);
    }

    #[test]
    fn extreme_guesses_and_score_floor() {
        let mut e = engine(Difficulty::Easy, 42);
        assert_eq!(e.submit_guess(i64::MIN).unwrap().message, "Too low! Try again.");
        assert_eq!(e.submit_guess(i64::MAX).unwrap().message, "Too high! Try again.");
        for _ in 0..7 {
            e.submit_guess(0).unwrap();
        }
        let s = e.submit_guess(42).unwrap();
        assert_eq!(s.attempts_used, 10);
        assert_eq!(s.outcome, Outcome::Won);
        assert_eq!(s.cumulative_score, 10);

        e.start_round(None);
        e.submit_guess(1).unwrap();
        assert!(e.start_round_named(Some("nope")).is_err());
        assert_eq!(e.snapshot().attempts_used, 1);
    }

    #[test]
    fn target_stays_out_of_debug_logs() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        #[derive(Clone)]
        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl Write for Capture {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buf = Arc::new(Mutex::new(Vec::new()));
        let writer = Capture(buf.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut e = engine(Difficulty::Hard, 777);
            e.start_round(None);
            e.submit_guess(1).unwrap();
        });

        let logs = String::from_utf8(buf.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("round started"));
        assert!(logs.contains("too low"));
        assert!(!logs.contains("777"), "target leaked into logs: {logs}");
    }

    #[test]
    fn guesses_after_round_over_change_nothing() {
        let mut e = engine(Difficulty::Easy, 3);
        let won = e.submit_guess(3).unwrap();

        assert_eq!(e.submit_guess(3), Err(GameError::RoundAlreadyOver));
        assert_eq!(e.submit_guess(99), Err(GameError::RoundAlreadyOver));
        assert_eq!(e.snapshot(), won);
        assert_eq!(e.target(), 3);
    }

    #[test]
    fn attempts_count_each_guess_and_never_exceed_budget() {
        for difficulty in Difficulty::ALL {
            let preset = difficulty.preset();
            let mut e = engine(difficulty, preset.max_value);
            let mut n = 0;
            while !e.is_over() {
                let s = e.submit_guess(0).unwrap();
                n += 1;
                assert_eq!(s.attempts_used, n);
                assert!(s.attempts_used <= preset.max_attempts);
            }
            assert_eq!(n, preset.max_attempts);
        }
    }

    #[test]
    fn change_difficulty_resets_after_finished_round() {
        let mut e = engine(Difficulty::Medium, 1);
        e.submit_guess(1).unwrap();
        assert!(e.is_over());

        let s = e.change_difficulty(Difficulty::Hard);
        assert_eq!(s.attempts_used, 0);
        assert!(!s.is_over);
        assert_eq!(s.revealed_target, None);
        assert_eq!(s.cumulative_score, 500);
    }

    #[test]
    fn new_round_keeps_score_and_difficulty() {
        let mut e = engine(Difficulty::Medium, 42);
        e.submit_guess(42).unwrap();
        let s = e.start_round(None);
        assert_eq!(s.difficulty, Difficulty::Medium);
        assert_eq!(s.cumulative_score, 500);
        assert_eq!(s.rounds_won, 1);
        assert!(!s.is_over);
    }

    #[test]
    fn score_is_cumulative_across_rounds() {
        let mut e = engine(Difficulty::Easy, 60);
        e.submit_guess(60).unwrap();
        e.start_round(None);
        e.submit_guess(1).unwrap();
        let s = e.submit_guess(60).unwrap();
        assert_eq!(s.cumulative_score, 100 + 90);
    }

    #[test]
    fn invalid_names_leave_state_untouched() {
        let mut e = engine(Difficulty::Easy, 50);
        e.submit_guess(10).unwrap();
        let before = e.snapshot();

        assert_eq!(
            e.change_difficulty_named("extreme"),
            Err(GameError::InvalidPresetName("extreme".into()))
        );
        assert!(e.start_round_named(Some("")).is_err());
        assert_eq!(e.snapshot(), before);

        let s = e.change_difficulty_named("Hard").unwrap();
        assert_eq!(s.difficulty, Difficulty::Hard);
        let s = e.start_round_named(None).unwrap();
        assert_eq!(s.difficulty, Difficulty::Hard);
    }

    #[test]
    fn target_hidden_until_over() {
        let mut e = engine(Difficulty::Easy, 50);
        assert_eq!(e.snapshot().revealed_target, None);
        assert_eq!(e.submit_guess(1).unwrap().revealed_target, None);
        let json = serde_json::to_string(&e.snapshot()).unwrap();
        assert!(!json.contains("revealed_target"));
    }

    #[test]
    fn score_rule_has_floor() {
        let easy = Difficulty::Easy.preset();
        assert_eq!(score_for(easy, 1), 100);
        assert_eq!(score_for(easy, 3), 80);
        assert_eq!(score_for(easy, 10), 10);
        assert_eq!(score_for(easy, 50), 10);
        assert_eq!(score_for(Difficulty::Hard.preset(), 6), 950);
    }

    #[test]
    fn seeded_targets_stay_in_range_for_every_preset() {
        for seed in 0..20 {
            let mut e = RoundEngine::with_seed(Difficulty::Easy, Some(seed));
            for difficulty in Difficulty::ALL {
                for _ in 0..50 {
                    e.start_round(Some(difficulty));
                    let t = e.target();
                    assert!((1..=difficulty.preset().max_value).contains(&t));
                }
            }
        }
    }

    #[test]
    fn snapshot_serializes_outcome() {
        let mut e = engine(Difficulty::Easy, 5);
        e.submit_guess(5).unwrap();
        let value: serde_json::Value = serde_json::to_value(e.snapshot()).unwrap();
        assert_eq!(value["outcome"], "won");
        assert_eq!(value["difficulty"], "easy");
        assert_eq!(value["revealed_target"], 5);
    }
}
