use glib::ControlFlow;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::celebration::Celebration;
use super::leaderboard::Leaderboard;
use super::scheduler::{Scheduler, Tick, TimerHandle};
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{
    Difficulty, GameEngineCommand, GameEngineEvent, GameResult, LeaderboardEntry, SessionPhase,
    TargetPosition, GAME_DURATION_SECS,
};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One game session at a time: score, countdown, the moving target and the
/// win/lose outcome. While playing, two timers run: the countdown (which
/// also checks for a win) and the target relocation.
pub struct GameEngine {
    difficulty: Difficulty,
    phase: SessionPhase,
    score: u32,
    time_remaining: u32,
    target: TargetPosition,
    /// Bumped at every start; ticks from an older run are discarded.
    run_id: u64,
    countdown_timer: Option<TimerHandle>,
    relocation_timer: Option<TimerHandle>,
    seed: u64,
    rng: StdRng,
    scheduler: Rc<dyn Scheduler>,
    celebration: Rc<dyn Celebration>,
    leaderboard: Leaderboard,
    self_ref: Weak<RefCell<Self>>,
    subscription: Option<Unsubscriber<GameEngineCommand>>,
    game_engine_event_emitter: EventEmitter<GameEngineEvent>,
}

impl Destroyable for GameEngine {
    fn destroy(&mut self) {
        self.stop_timers();
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl GameEngine {
    pub fn new(
        game_engine_command_observer: EventObserver<GameEngineCommand>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
        difficulty: Difficulty,
        seed: Option<u64>,
        scheduler: Rc<dyn Scheduler>,
        celebration: Rc<dyn Celebration>,
        leaderboard: Leaderboard,
    ) -> Rc<RefCell<Self>> {
        let seed = seed.unwrap_or_else(|| rand::rng().next_u64());
        let engine = Rc::new_cyclic(|self_ref| {
            RefCell::new(Self {
                difficulty,
                phase: SessionPhase::NotStarted,
                score: 0,
                time_remaining: GAME_DURATION_SECS,
                target: TargetPosition::centered(),
                run_id: 0,
                countdown_timer: None,
                relocation_timer: None,
                seed,
                rng: StdRng::seed_from_u64(seed),
                scheduler,
                celebration,
                leaderboard,
                self_ref: self_ref.clone(),
                subscription: None,
                game_engine_event_emitter,
            })
        });
        GameEngine::wire_subscription(engine.clone(), game_engine_command_observer);
        engine
    }

    fn wire_subscription(
        engine: Rc<RefCell<Self>>,
        game_engine_command_observer: EventObserver<GameEngineCommand>,
    ) {
        let engine_handler = Rc::downgrade(&engine);
        let subscription = game_engine_command_observer.subscribe(move |command| {
            if let Some(engine) = engine_handler.upgrade() {
                engine.borrow_mut().handle_command(command.clone());
            }
        });
        engine.borrow_mut().subscription = Some(subscription);
    }

    fn handle_command(&mut self, command: GameEngineCommand) {
        trace!(target: "game_engine", "Handling command: {:?}", command);
        match command {
            GameEngineCommand::InitDisplay => self.init_display(),
            GameEngineCommand::SelectDifficulty(difficulty) => self.select_difficulty(difficulty),
            GameEngineCommand::StartGame => self.start_game(),
            GameEngineCommand::RegisterHit => self.register_hit(),
            GameEngineCommand::ResetSession => self.reset_session(),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn target_score(&self) -> u32 {
        self.difficulty.target_score()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn target(&self) -> TargetPosition {
        self.target
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn leaderboard_entries(&self) -> Vec<LeaderboardEntry> {
        self.leaderboard.entries()
    }

    /// Publish the whole state so new widgets can catch up.
    pub fn init_display(&mut self) {
        self.emit_difficulty();
        self.emit(GameEngineEvent::PhaseChanged(self.phase));
        self.emit(GameEngineEvent::ScoreChanged(self.score));
        self.emit(GameEngineEvent::TimeRemainingChanged(self.time_remaining));
        self.emit(GameEngineEvent::TargetMoved(self.target));
        self.emit(GameEngineEvent::LeaderboardChanged(self.leaderboard.entries()));
    }

    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        if !self.phase.accepts_difficulty_change() {
            debug!(
                target: "game_engine",
                "Ignoring difficulty change to {} while {:?}",
                difficulty,
                self.phase
            );
            return;
        }
        self.difficulty = difficulty;
        self.emit_difficulty();
    }

    /// Begin a fresh session. Any session in progress is abandoned and its
    /// timers are gone before the new ones are created.
    pub fn start_game(&mut self) {
        self.stop_timers();
        self.run_id += 1;
        self.score = 0;
        self.time_remaining = GAME_DURATION_SECS;
        self.target = TargetPosition::random(&mut self.rng);
        self.phase = SessionPhase::Playing;
        info!(
            target: "game_engine",
            "Starting game; difficulty: {}; target score: {}; run: {}",
            self.difficulty,
            self.target_score(),
            self.run_id
        );

        self.emit(GameEngineEvent::PhaseChanged(self.phase));
        self.emit(GameEngineEvent::ScoreChanged(self.score));
        self.emit(GameEngineEvent::TimeRemainingChanged(self.time_remaining));
        self.emit(GameEngineEvent::TargetMoved(self.target));

        let run_id = self.run_id;
        self.countdown_timer = Some(self.scheduler.schedule_repeating(
            TICK_PERIOD,
            self.tick_callback(run_id, GameEngine::handle_countdown_tick),
        ));
        self.relocation_timer = Some(self.scheduler.schedule_repeating(
            TICK_PERIOD,
            self.tick_callback(run_id, GameEngine::handle_relocation_tick),
        ));
    }

    /// A click on the target. Winning is only noticed by the next countdown tick.
    pub fn register_hit(&mut self) {
        if !self.phase.is_playing() {
            debug!(target: "game_engine", "Ignoring hit while {:?}", self.phase);
            return;
        }
        self.score += 1;
        trace!(target: "game_engine", "Hit; score: {}", self.score);
        self.emit(GameEngineEvent::ScoreChanged(self.score));
        self.relocate_target();
    }

    /// Leave a finished session, unlocking the difficulty again.
    pub fn reset_session(&mut self) {
        if self.phase.result().is_none() {
            debug!(target: "game_engine", "Ignoring reset while {:?}", self.phase);
            return;
        }
        self.phase = SessionPhase::NotStarted;
        self.score = 0;
        self.time_remaining = GAME_DURATION_SECS;
        self.target = TargetPosition::centered();
        self.emit(GameEngineEvent::PhaseChanged(self.phase));
        self.emit(GameEngineEvent::ScoreChanged(self.score));
        self.emit(GameEngineEvent::TimeRemainingChanged(self.time_remaining));
        self.emit(GameEngineEvent::TargetMoved(self.target));
    }

    fn tick_callback(&self, run_id: u64, on_tick: fn(&mut GameEngine, u64) -> ControlFlow) -> Tick {
        let engine = self.self_ref.clone();
        Box::new(move || match engine.upgrade() {
            Some(engine) => on_tick(&mut engine.borrow_mut(), run_id),
            None => ControlFlow::Break,
        })
    }

    fn is_current_run(&self, run_id: u64) -> bool {
        run_id == self.run_id && self.phase.is_playing()
    }

    fn handle_countdown_tick(&mut self, run_id: u64) -> ControlFlow {
        if !self.is_current_run(run_id) {
            trace!(target: "game_engine", "Dropping countdown tick from run {}", run_id);
            return ControlFlow::Break;
        }

        // the win check comes first, so the final tick can still be a win
        if self.score >= self.target_score() {
            self.finish(GameResult::Win);
            return ControlFlow::Break;
        }

        if self.time_remaining <= 1 {
            self.time_remaining = 0;
            self.emit(GameEngineEvent::TimeRemainingChanged(self.time_remaining));
            self.finish(GameResult::Lose);
            return ControlFlow::Break;
        }

        self.time_remaining -= 1;
        self.emit(GameEngineEvent::TimeRemainingChanged(self.time_remaining));
        ControlFlow::Continue
    }

    fn handle_relocation_tick(&mut self, run_id: u64) -> ControlFlow {
        if !self.is_current_run(run_id) {
            trace!(target: "game_engine", "Dropping relocation tick from run {}", run_id);
            return ControlFlow::Break;
        }
        self.relocate_target();
        ControlFlow::Continue
    }

    fn relocate_target(&mut self) {
        self.target = TargetPosition::random(&mut self.rng);
        self.emit(GameEngineEvent::TargetMoved(self.target));
    }

    fn stop_timers(&mut self) {
        if let Some(timer) = self.countdown_timer.take() {
            timer.cancel();
        }
        if let Some(timer) = self.relocation_timer.take() {
            timer.cancel();
        }
    }

    fn finish(&mut self, result: GameResult) {
        self.stop_timers();
        if result == GameResult::Win {
            self.celebration.play();
        }
        self.phase = SessionPhase::Finished(result);

        let elapsed_seconds = GAME_DURATION_SECS - self.time_remaining;
        info!(
            target: "game_engine",
            "Game over: {:?}; score: {}/{}; elapsed: {}s",
            result,
            self.score,
            self.target_score(),
            elapsed_seconds
        );
        self.emit(GameEngineEvent::PhaseChanged(self.phase));
        self.emit(GameEngineEvent::GameFinished {
            result,
            score: self.score,
            elapsed_seconds,
        });

        if self.score > 0 {
            let entries = self.leaderboard.record(LeaderboardEntry::new(
                self.score,
                elapsed_seconds,
                self.difficulty,
            ));
            self.emit(GameEngineEvent::LeaderboardChanged(entries));
        }
    }

    fn emit_difficulty(&self) {
        self.emit(GameEngineEvent::DifficultyChanged {
            difficulty: self.difficulty,
            target_score: self.target_score(),
        });
    }

    fn emit(&self, event: GameEngineEvent) {
        self.game_engine_event_emitter.emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Channel;
    use crate::game::celebration::CountingCelebration;
    use crate::game::leaderboard::LEADERBOARD_KEY;
    use crate::game::scheduler::ManualScheduler;
    use crate::game::storage::{KeyValueStore, MemoryStore};
    use crate::model::TARGET_POSITION_MAX;
    use crate::tests::UsingLogger;
    use test_context::test_context;

    struct Harness {
        engine: Rc<RefCell<GameEngine>>,
        commands: EventEmitter<GameEngineCommand>,
        scheduler: Rc<ManualScheduler>,
        celebration: Rc<CountingCelebration>,
        store: Rc<MemoryStore>,
        events: Rc<RefCell<Vec<GameEngineEvent>>>,
        _events_subscription: Unsubscriber<GameEngineEvent>,
    }

    impl Harness {
        fn new(difficulty: Difficulty) -> Self {
            let (commands, command_observer) = Channel::<GameEngineCommand>::new();
            let (event_emitter, event_observer) = Channel::<GameEngineEvent>::new();
            let scheduler = ManualScheduler::new();
            let celebration = Rc::new(CountingCelebration::default());
            let store = Rc::new(MemoryStore::new());

            let events = Rc::new(RefCell::new(Vec::new()));
            let events_clone = events.clone();
            let _events_subscription =
                event_observer.subscribe(move |event| events_clone.borrow_mut().push(event.clone()));

            let engine = GameEngine::new(
                command_observer,
                event_emitter,
                difficulty,
                Some(1234),
                scheduler.clone(),
                celebration.clone(),
                Leaderboard::new(store.clone()),
            );
            Self {
                engine,
                commands,
                scheduler,
                celebration,
                store,
                events,
                _events_subscription,
            }
        }

        fn start(&self) {
            self.engine.borrow_mut().start_game();
        }

        fn hit(&self, times: u32) {
            for _ in 0..times {
                self.engine.borrow_mut().register_hit();
            }
        }

        fn phase(&self) -> SessionPhase {
            self.engine.borrow().phase()
        }

        fn entries(&self) -> Vec<LeaderboardEntry> {
            self.engine.borrow().leaderboard_entries()
        }

        fn count_events(&self, matches: impl Fn(&GameEngineEvent) -> bool) -> usize {
            self.events.borrow().iter().filter(|e| matches(e)).count()
        }
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_easy_win_records_entry_and_celebrates(_: &mut UsingLogger) {
        let harness = Harness::new(Difficulty::Easy);
        harness.start();
        harness.scheduler.advance_secs(3);
        assert_eq!(harness.engine.borrow().time_remaining(), 27);

        harness.hit(10);
        // not detected until the next countdown tick
        assert_eq!(harness.phase(), SessionPhase::Playing);

        harness.scheduler.advance_secs(1);
        assert_eq!(harness.phase(), SessionPhase::Finished(GameResult::Win));
        assert_eq!(harness.engine.borrow().time_remaining(), 27);
        assert_eq!(harness.celebration.plays(), 1);

        let entries = harness.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].score, 10);
        assert_eq!(entries[0].elapsed_seconds, 3);
        assert_eq!(entries[0].level, Difficulty::Easy);

        harness.scheduler.advance_secs(10);
        assert_eq!(harness.celebration.plays(), 1);
        assert_eq!(
            harness.count_events(|e| matches!(e, GameEngineEvent::GameFinished { .. })),
            1
        );
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_hard_loss_still_records_entry(_: &mut UsingLogger) {
        let harness = Harness::new(Difficulty::Hard);
        harness.start();
        harness.hit(5);
        harness.scheduler.advance_secs(29);
        assert_eq!(harness.phase(), SessionPhase::Playing);
        assert_eq!(harness.engine.borrow().time_remaining(), 1);

        harness.scheduler.advance_secs(1);
        assert_eq!(harness.phase(), SessionPhase::Finished(GameResult::Lose));
        assert_eq!(harness.engine.borrow().time_remaining(), 0);
        assert_eq!(harness.celebration.plays(), 0);

        let entries = harness.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].score, 5);
        assert_eq!(entries[0].elapsed_seconds, 30);
        assert_eq!(entries[0].level, Difficulty::Hard);
    }

    #[test]
    fn test_no_hits_loses_without_entry() {
        let harness = Harness::new(Difficulty::Medium);
        harness.start();
        harness.scheduler.advance_secs(30);

        assert_eq!(harness.phase(), SessionPhase::Finished(GameResult::Lose));
        assert!(harness.entries().is_empty());
        assert!(harness.store.get(LEADERBOARD_KEY).is_none());
        assert_eq!(
            harness.count_events(|e| matches!(e, GameEngineEvent::LeaderboardChanged(_))),
            0
        );
    }

    #[test]
    fn test_win_check_beats_final_tick() {
        let harness = Harness::new(Difficulty::Easy);
        harness.start();
        harness.scheduler.advance_secs(29);
        harness.hit(10);

        harness.scheduler.advance_secs(1);
        assert_eq!(harness.phase(), SessionPhase::Finished(GameResult::Win));
        assert_eq!(harness.engine.borrow().time_remaining(), 1);
        assert_eq!(harness.entries()[0].elapsed_seconds, 29);
    }

    #[test]
    fn test_score_above_target_still_wins() {
        let harness = Harness::new(Difficulty::Easy);
        harness.start();
        harness.hit(14);
        harness.scheduler.advance_secs(1);
        assert_eq!(harness.phase(), SessionPhase::Finished(GameResult::Win));
        assert_eq!(harness.entries()[0].score, 14);
        assert_eq!(harness.entries()[0].elapsed_seconds, 0);
    }

    #[test]
    fn test_timers_stop_when_session_ends() {
        let harness = Harness::new(Difficulty::Medium);
        harness.start();
        assert_eq!(harness.scheduler.active_timers(), 2);

        harness.scheduler.advance_secs(30);
        assert_eq!(harness.scheduler.active_timers(), 0);

        let events_at_end = harness.events.borrow().len();
        let target_at_end = harness.engine.borrow().target();
        harness.scheduler.advance_secs(30);
        assert_eq!(harness.events.borrow().len(), events_at_end);
        assert_eq!(harness.engine.borrow().target(), target_at_end);
    }

    #[test]
    fn test_restart_mid_session_keeps_single_countdown() {
        let harness = Harness::new(Difficulty::Medium);
        harness.start();
        harness.hit(3);
        harness.scheduler.advance_secs(10);

        harness.start();
        assert_eq!(harness.engine.borrow().score(), 0);
        assert_eq!(harness.engine.borrow().time_remaining(), 30);
        assert_eq!(harness.scheduler.active_timers(), 2);

        harness.scheduler.advance_secs(1);
        assert_eq!(harness.engine.borrow().time_remaining(), 29);
        harness.scheduler.advance_secs(5);
        assert_eq!(harness.engine.borrow().time_remaining(), 24);
    }

    #[test]
    fn test_start_after_finish_resets_state() {
        let harness = Harness::new(Difficulty::Easy);
        harness.start();
        harness.hit(10);
        harness.scheduler.advance_secs(1);
        assert_eq!(harness.phase(), SessionPhase::Finished(GameResult::Win));

        harness.start();
        assert_eq!(harness.phase(), SessionPhase::Playing);
        assert_eq!(harness.engine.borrow().score(), 0);
        assert_eq!(harness.engine.borrow().time_remaining(), 30);
        assert_eq!(harness.engine.borrow().phase().result(), None);
    }

    #[test]
    fn test_score_counts_hits_since_start() {
        let harness = Harness::new(Difficulty::Hard);
        harness.start();
        harness.hit(2);
        harness.scheduler.advance_secs(4);
        harness.hit(3);
        harness.scheduler.advance_secs(1);
        harness.hit(1);
        assert_eq!(harness.engine.borrow().score(), 6);

        harness.start();
        harness.hit(4);
        assert_eq!(harness.engine.borrow().score(), 4);
    }

    #[test]
    fn test_hits_ignored_when_not_playing() {
        let harness = Harness::new(Difficulty::Easy);
        harness.hit(3);
        assert_eq!(harness.engine.borrow().score(), 0);
        assert_eq!(harness.phase(), SessionPhase::NotStarted);

        harness.start();
        harness.scheduler.advance_secs(30);
        harness.hit(2);
        assert_eq!(harness.engine.borrow().score(), 0);
    }

    #[test]
    fn test_difficulty_locked_after_first_start() {
        let harness = Harness::new(Difficulty::Medium);
        harness.engine.borrow_mut().select_difficulty(Difficulty::Easy);
        assert_eq!(harness.engine.borrow().target_score(), 10);

        harness.start();
        harness.engine.borrow_mut().select_difficulty(Difficulty::Hard);
        assert_eq!(harness.engine.borrow().difficulty(), Difficulty::Easy);

        harness.scheduler.advance_secs(30);
        harness.engine.borrow_mut().select_difficulty(Difficulty::Hard);
        assert_eq!(harness.engine.borrow().difficulty(), Difficulty::Easy);

        harness.engine.borrow_mut().reset_session();
        assert_eq!(harness.phase(), SessionPhase::NotStarted);
        harness.engine.borrow_mut().select_difficulty(Difficulty::Hard);
        assert_eq!(harness.engine.borrow().target_score(), 30);
    }

    #[test]
    fn test_reset_ignored_while_playing() {
        let harness = Harness::new(Difficulty::Medium);
        harness.engine.borrow_mut().reset_session();
        assert_eq!(harness.phase(), SessionPhase::NotStarted);

        harness.start();
        harness.hit(2);
        harness.engine.borrow_mut().reset_session();
        assert_eq!(harness.phase(), SessionPhase::Playing);
        assert_eq!(harness.engine.borrow().score(), 2);
    }

    #[test]
    fn test_target_moves_on_hits_and_ticks() {
        let harness = Harness::new(Difficulty::Hard);
        harness.start();
        let moves = || harness.count_events(|e| matches!(e, GameEngineEvent::TargetMoved(_)));
        let after_start = moves();

        harness.hit(2);
        assert_eq!(moves(), after_start + 2);
        harness.scheduler.advance_secs(3);
        assert_eq!(moves(), after_start + 5);

        for event in harness.events.borrow().iter() {
            if let GameEngineEvent::TargetMoved(position) = event {
                assert!(position.x() <= TARGET_POSITION_MAX);
                assert!(position.y() <= TARGET_POSITION_MAX);
            }
        }
    }

    #[test]
    fn test_leaderboard_keeps_five_newest() {
        let harness = Harness::new(Difficulty::Hard);
        for hits in 1..=7 {
            harness.start();
            harness.hit(hits);
            harness.scheduler.advance_secs(30);
        }
        let scores: Vec<u32> = harness.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_commands_drive_engine() {
        let harness = Harness::new(Difficulty::Medium);
        harness
            .commands
            .emit(GameEngineCommand::SelectDifficulty(Difficulty::Easy));
        harness.commands.emit(GameEngineCommand::StartGame);
        for _ in 0..10 {
            harness.commands.emit(GameEngineCommand::RegisterHit);
        }
        harness.scheduler.advance_secs(1);
        assert_eq!(harness.phase(), SessionPhase::Finished(GameResult::Win));

        harness.commands.emit(GameEngineCommand::ResetSession);
        assert_eq!(harness.phase(), SessionPhase::NotStarted);
    }

    #[test]
    fn test_init_display_publishes_state() {
        let harness = Harness::new(Difficulty::Hard);
        harness.commands.emit(GameEngineCommand::InitDisplay);

        let events = harness.events.borrow();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEngineEvent::DifficultyChanged {
                difficulty: Difficulty::Hard,
                target_score: 30
            }
        )));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEngineEvent::PhaseChanged(SessionPhase::NotStarted))));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEngineEvent::TimeRemainingChanged(30))));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEngineEvent::LeaderboardChanged(entries) if entries.is_empty())));
    }

    #[test]
    fn test_destroy_stops_everything() {
        let harness = Harness::new(Difficulty::Medium);
        harness.start();
        harness.engine.borrow_mut().destroy();
        assert_eq!(harness.scheduler.active_timers(), 0);

        harness.commands.emit(GameEngineCommand::RegisterHit);
        assert_eq!(harness.engine.borrow().score(), 0);
    }
}
