use fluent_i18n::t;
use gtk4::{prelude::*, Label, Orientation};
use std::cell::RefCell;
use std::rc::Rc;

use crate::destroyable::Destroyable;
use crate::events::{EventObserver, Unsubscriber};
use crate::model::{GameEngineEvent, GameResult};

pub struct ResultUI {
    pub container: gtk4::Box,
    win_label: Label,
    win_detail_label: Label,
    lose_label: Label,
    game_engine_subscription: Option<Unsubscriber<GameEngineEvent>>,
}

impl Destroyable for ResultUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.game_engine_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl ResultUI {
    pub fn new(game_engine_observer: EventObserver<GameEngineEvent>) -> Rc<RefCell<Self>> {
        let container = gtk4::Box::builder()
            .name("result-box")
            .orientation(Orientation::Vertical)
            .spacing(4)
            .visible(false)
            .build();
        let win_label = Label::builder()
            .label(&t!("result-win"))
            .css_classes(["result-win"])
            .build();
        let win_detail_label = Label::builder().css_classes(["result-detail"]).build();
        let lose_label = Label::builder()
            .label(&t!("result-lose"))
            .css_classes(["result-lose"])
            .build();
        container.append(&win_label);
        container.append(&win_detail_label);
        container.append(&lose_label);

        let result_ui = Rc::new(RefCell::new(Self {
            container,
            win_label,
            win_detail_label,
            lose_label,
            game_engine_subscription: None,
        }));

        let subscription = {
            let result_ui = result_ui.clone();
            game_engine_observer.subscribe(move |event| match event {
                GameEngineEvent::GameFinished {
                    result,
                    elapsed_seconds,
                    ..
                } => result_ui.borrow().show_result(*result, *elapsed_seconds),
                GameEngineEvent::PhaseChanged(phase) if phase.result().is_none() => {
                    result_ui.borrow().container.set_visible(false);
                }
                _ => {}
            })
        };
        result_ui.borrow_mut().game_engine_subscription = Some(subscription);
        result_ui
    }

    fn show_result(&self, result: GameResult, elapsed_seconds: u32) {
        let won = result == GameResult::Win;
        self.win_label.set_visible(won);
        self.win_detail_label.set_visible(won);
        self.lose_label.set_visible(!won);
        if won {
            self.win_detail_label.set_markup(&format!(
                "{} <b>{}s</b>",
                t!("result-completed-in"),
                elapsed_seconds
            ));
        }
        self.container.set_visible(true);
    }
}
