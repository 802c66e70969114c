//! Player host: the engine plus everything the report screen needs around it.
//!
//! Owns the tick source and keeps it in lockstep with the engine state after
//! every transition. Saving is guarded so a report is filed at most once.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::definition::RoutineDefinition;
use super::engine::{Command, PlayerState, RoutineEngine};
use super::report::RoutineVariant;
use super::ticker::Ticker;
use crate::config::Theme;
use crate::error::{PlayerError, Result};
use crate::events::Event;
use crate::integrations::RoutineStore;

/// Cosmetic pause between picking a mood and showing the report.
pub const MOOD_REVEAL_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// This report was already filed; nothing was sent.
    AlreadySaved,
}

#[derive(Debug)]
pub struct RoutinePlayer {
    engine: RoutineEngine,
    ticker: Ticker,
    theme: Theme,
    variant: RoutineVariant,
    saved: bool,
}

impl RoutinePlayer {
    pub fn new(routines: Vec<RoutineDefinition>, theme: Theme) -> Self {
        Self::with_ticker(routines, theme, Ticker::new())
    }

    pub fn with_ticker(routines: Vec<RoutineDefinition>, theme: Theme, ticker: Ticker) -> Self {
        Self {
            engine: RoutineEngine::new(routines),
            ticker,
            theme,
            variant: RoutineVariant::default(),
            saved: false,
        }
    }

    pub fn engine(&self) -> &RoutineEngine {
        &self.engine
    }

    pub fn state(&self) -> PlayerState {
        self.engine.state()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.next();
        self.theme
    }

    pub fn variant(&self) -> RoutineVariant {
        self.variant
    }

    pub fn set_variant(&mut self, variant: RoutineVariant) {
        self.variant = variant;
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    /// Apply a command and resynchronise the ticker.
    pub fn apply(&mut self, command: Command) -> Option<Event> {
        let event = self.engine.apply(command);
        if let Some(Event::ReportShown { .. }) = event {
            self.saved = false;
        }
        self.ticker.sync(self.engine.state());
        event
    }

    /// Wait for the ticker. Never resolves unless the state is `Playing`.
    pub async fn wait_tick(&mut self) {
        self.ticker.next().await;
    }

    pub fn tick(&mut self) -> Option<Event> {
        self.apply(Command::Tick)
    }

    /// Record the mood, wait `reveal_delay`, then show the report.
    pub async fn rate(&mut self, rating: u8, reveal_delay: Duration) -> Vec<Event> {
        let Some(selected) = self.engine.select_mood(rating) else {
            return Vec::new();
        };
        if !reveal_delay.is_zero() {
            tokio::time::sleep(reveal_delay).await;
        }
        let mut events = vec![selected];
        events.extend(self.apply(Command::ShowReport));
        events
    }

    /// File the report with `store`.
    ///
    /// A failed save leaves the report unsaved so it can be retried.
    pub async fn save<S: RoutineStore>(&mut self, store: &S, at: DateTime<Utc>) -> Result<SaveOutcome> {
        if self.engine.state() != PlayerState::Report {
            return Err(PlayerError::SaveUnavailable.into());
        }
        if self.saved {
            tracing::debug!("report already saved; skipping");
            return Ok(SaveOutcome::AlreadySaved);
        }
        let summary = self
            .engine
            .summary(self.variant, at)
            .ok_or(PlayerError::SaveUnavailable)?;

        match store.save(&summary).await {
            Ok(()) => {
                self.saved = true;
                tracing::info!(
                    store = store.name(),
                    completed = summary.completed_count,
                    total = summary.total_count,
                    variant = ?summary.variant,
                    "routine report saved"
                );
                Ok(SaveOutcome::Saved)
            }
            Err(e) => {
                tracing::warn!(store = store.name(), error = %e, "routine report save failed");
                Err(e)
            }
        }
    }

    /// Release the ticker. Call before dropping a session mid-play.
    pub fn shutdown(&mut self) {
        self.ticker.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, NotionError};
    use crate::routine::SessionSummary;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStore {
        fail: AtomicBool,
        calls: AtomicUsize,
        last: Mutex<Option<SessionSummary>>,
    }

    impl RoutineStore for FakeStore {
        fn name(&self) -> &str {
            "fake"
        }

        async fn save(&self, summary: &SessionSummary) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(NotionError::UnexpectedResponse("boom".into()).into());
            }
            *self.last.lock().unwrap() = Some(summary.clone());
            Ok(())
        }
    }

    fn player() -> RoutinePlayer {
        RoutinePlayer::new(
            vec![
                RoutineDefinition::new("Stretch", 1, "🧘"),
                RoutineDefinition::new("Water", 1, "💧"),
            ],
            Theme::Pink,
        )
    }

    async fn finish(player: &mut RoutinePlayer) {
        player.apply(Command::Start);
        player.apply(Command::CompleteCurrent);
        player.apply(Command::Skip);
        player.rate(4, Duration::ZERO).await;
        assert_eq!(player.state(), PlayerState::Report);
    }

    #[tokio::test]
    async fn ticker_follows_state() {
        let mut player = player();
        assert!(!player.is_ticking());
        player.apply(Command::Start);
        assert!(player.is_ticking());
        player.apply(Command::Pause);
        assert!(!player.is_ticking());
        player.apply(Command::Resume);
        assert!(player.is_ticking());
        player.apply(Command::Skip);
        player.apply(Command::Skip);
        assert_eq!(player.state(), PlayerState::Mood);
        assert!(!player.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_drive_the_countdown() {
        let mut player = player();
        player.apply(Command::Start);
        for _ in 0..60 {
            player.wait_tick().await;
            player.tick();
        }
        assert_eq!(player.engine().current_index(), 1);
        assert_eq!(player.engine().completed_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_waits_before_report() {
        let mut player = player();
        player.apply(Command::Start);
        player.apply(Command::Skip);
        player.apply(Command::Skip);
        let start = tokio::time::Instant::now();
        let events = player.rate(3, MOOD_REVEAL_DELAY).await;
        assert_eq!(start.elapsed(), MOOD_REVEAL_DELAY);
        assert_eq!(events.len(), 2);
        assert_eq!(player.state(), PlayerState::Report);
    }

    #[tokio::test]
    async fn save_is_guarded() {
        let store = FakeStore::default();
        let mut player = player();

        let err = player.save(&store, Utc::now()).await.unwrap_err();
        assert!(matches!(err, CoreError::Player(PlayerError::SaveUnavailable)));

        finish(&mut player).await;
        player.set_variant(RoutineVariant::Secondary);
        assert_eq!(player.save(&store, Utc::now()).await.unwrap(), SaveOutcome::Saved);
        assert!(player.is_saved());
        assert_eq!(player.save(&store, Utc::now()).await.unwrap(), SaveOutcome::AlreadySaved);
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);

        let saved = store.last.lock().unwrap().clone().unwrap();
        assert_eq!(saved.completed_count, 1);
        assert_eq!(saved.total_count, 2);
        assert_eq!(saved.completed_emojis, "🧘");
        assert_eq!(saved.variant, RoutineVariant::Secondary);
    }

    #[tokio::test]
    async fn failed_save_can_be_retried() {
        let store = FakeStore::default();
        store.fail.store(true, Ordering::SeqCst);
        let mut player = player();
        finish(&mut player).await;

        assert!(player.save(&store, Utc::now()).await.is_err());
        assert!(!player.is_saved());
        assert_eq!(player.state(), PlayerState::Report);

        store.fail.store(false, Ordering::SeqCst);
        assert_eq!(player.save(&store, Utc::now()).await.unwrap(), SaveOutcome::Saved);
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn new_session_can_be_saved_again() {
        let store = FakeStore::default();
        let mut player = player();
        finish(&mut player).await;
        player.save(&store, Utc::now()).await.unwrap();

        player.apply(Command::Restart);
        assert_eq!(player.state(), PlayerState::Idle);
        finish(&mut player).await;
        assert!(!player.is_saved());
        assert_eq!(player.save(&store, Utc::now()).await.unwrap(), SaveOutcome::Saved);
    }

    #[test]
    fn theme_cycles() {
        let mut player = player();
        assert_eq!(player.toggle_theme(), Theme::Blue);
        assert_eq!(player.toggle_theme(), Theme::Purple);
        assert_eq!(player.toggle_theme(), Theme::Mono);
        assert_eq!(player.toggle_theme(), Theme::Pink);
    }
}
