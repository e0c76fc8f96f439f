// instructions, remaining time and score

use std::{cell::RefCell, rc::Rc};

use fluent_i18n::t;
use gtk4::{prelude::*, Label};

use crate::{
    destroyable::Destroyable,
    events::{EventObserver, Unsubscriber},
    model::{GameEngineEvent, GAME_DURATION_SECS},
};

pub struct GameInfoUI {
    pub instructions_label: Label,
    pub timer_label: Label,
    pub score_label: Label,
    game_engine_subscription: Option<Unsubscriber<GameEngineEvent>>,
}

impl Destroyable for GameInfoUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.game_engine_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl GameInfoUI {
    pub fn new(game_engine_observer: EventObserver<GameEngineEvent>) -> Rc<RefCell<Self>> {
        let instructions_label = Label::builder().css_classes(["instructions"]).build();
        let timer_label = Label::builder().css_classes(["timer"]).build();
        let score_label = Label::builder().css_classes(["score"]).build();

        GameInfoUI::update_timer_label(&timer_label, GAME_DURATION_SECS);
        GameInfoUI::update_score_label(&score_label, 0);

        let game_info = Rc::new(RefCell::new(Self {
            instructions_label,
            timer_label,
            score_label,
            game_engine_subscription: None,
        }));
        GameInfoUI::bind_observer(Rc::clone(&game_info), game_engine_observer);
        game_info
    }

    fn bind_observer(
        game_info: Rc<RefCell<Self>>,
        game_engine_observer: EventObserver<GameEngineEvent>,
    ) {
        let subscription = {
            let game_info = game_info.clone();
            game_engine_observer.subscribe(move |event| {
                game_info.borrow().handle_game_engine_event(event);
            })
        };
        game_info.borrow_mut().game_engine_subscription = Some(subscription);
    }

    fn handle_game_engine_event(&self, event: &GameEngineEvent) {
        match event {
            GameEngineEvent::DifficultyChanged { target_score, .. } => {
                self.instructions_label.set_markup(&format!(
                    "{} <b>{}</b> · {} <b>{}s</b>",
                    t!("instructions-clicks-to-win"),
                    target_score,
                    t!("instructions-time-limit"),
                    GAME_DURATION_SECS
                ));
            }
            GameEngineEvent::TimeRemainingChanged(seconds) => {
                GameInfoUI::update_timer_label(&self.timer_label, *seconds);
            }
            GameEngineEvent::ScoreChanged(score) => {
                GameInfoUI::update_score_label(&self.score_label, *score);
            }
            _ => {}
        }
    }

    fn update_timer_label(timer_label: &Label, seconds: u32) {
        timer_label.set_text(&format!("⏱️ {} {}s", t!("time-left"), seconds));
    }

    fn update_score_label(score_label: &Label, score: u32) {
        score_label.set_text(&format!("🏆 {} {}", t!("score"), score));
    }
}
