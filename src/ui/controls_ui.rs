use fluent_i18n::t;
use gtk4::{prelude::*, Button, Orientation};
use std::cell::RefCell;
use std::rc::Rc;

use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{GameEngineCommand, GameEngineEvent, SessionPhase};

/// "Start Game" / "Play Again", plus "Change Difficulty" once a game is over.
pub struct ControlsUI {
    pub container: gtk4::Box,
    start_button: Button,
    reset_button: Button,
    game_engine_subscription: Option<Unsubscriber<GameEngineEvent>>,
}

impl Destroyable for ControlsUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.game_engine_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl ControlsUI {
    pub fn new(
        game_engine_command_emitter: EventEmitter<GameEngineCommand>,
        game_engine_observer: EventObserver<GameEngineEvent>,
    ) -> Rc<RefCell<Self>> {
        let container = gtk4::Box::builder()
            .name("controls-box")
            .orientation(Orientation::Horizontal)
            .spacing(10)
            .halign(gtk4::Align::Center)
            .build();

        let start_button = Button::builder()
            .label(&t!("start-game"))
            .css_classes(["start-button"])
            .tooltip_text(&t!("start-game-tooltip"))
            .build();
        start_button.connect_clicked({
            let emitter = game_engine_command_emitter.clone();
            move |_| emitter.emit(GameEngineCommand::StartGame)
        });

        let reset_button = Button::builder()
            .label(&t!("change-difficulty"))
            .visible(false)
            .build();
        reset_button.connect_clicked({
            let emitter = game_engine_command_emitter.clone();
            move |_| emitter.emit(GameEngineCommand::ResetSession)
        });

        container.append(&start_button);
        container.append(&reset_button);

        let controls = Rc::new(RefCell::new(Self {
            container,
            start_button,
            reset_button,
            game_engine_subscription: None,
        }));

        let subscription = {
            let controls = controls.clone();
            game_engine_observer.subscribe(move |event| {
                if let GameEngineEvent::PhaseChanged(phase) = event {
                    controls.borrow().update_phase(*phase);
                }
            })
        };
        controls.borrow_mut().game_engine_subscription = Some(subscription);
        controls
    }

    fn update_phase(&self, phase: SessionPhase) {
        match phase {
            SessionPhase::NotStarted => {
                self.start_button.set_label(&t!("start-game"));
                self.start_button.set_visible(true);
                self.reset_button.set_visible(false);
            }
            SessionPhase::Playing => {
                self.start_button.set_visible(false);
                self.reset_button.set_visible(false);
            }
            SessionPhase::Finished(_) => {
                self.start_button.set_label(&t!("play-again"));
                self.start_button.set_visible(true);
                self.reset_button.set_visible(true);
            }
        }
    }
}
