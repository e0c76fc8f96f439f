use fluent_i18n::t;
use gtk4::{prelude::*, Button, Label, Orientation};
use std::cell::RefCell;
use std::rc::Rc;

use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{Difficulty, GameEngineCommand, GameEngineEvent};

/// One button per difficulty; only shown before a session starts.
pub struct DifficultyPickerUI {
    pub container: gtk4::Box,
    buttons: Vec<(Difficulty, Button)>,
    game_engine_subscription: Option<Unsubscriber<GameEngineEvent>>,
}

impl Destroyable for DifficultyPickerUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.game_engine_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl DifficultyPickerUI {
    pub fn new(
        game_engine_command_emitter: EventEmitter<GameEngineCommand>,
        game_engine_observer: EventObserver<GameEngineEvent>,
    ) -> Rc<RefCell<Self>> {
        let container = gtk4::Box::builder()
            .name("difficulty-box")
            .orientation(Orientation::Horizontal)
            .spacing(5)
            .halign(gtk4::Align::Center)
            .build();
        container.append(&Label::new(Some(&t!("difficulty-label"))));

        let buttons = Difficulty::all()
            .into_iter()
            .map(|difficulty| {
                let button = Button::builder()
                    .label(&difficulty.display_name())
                    .css_classes(["difficulty-button"])
                    .build();
                let emitter = game_engine_command_emitter.clone();
                button.connect_clicked(move |_| {
                    emitter.emit(GameEngineCommand::SelectDifficulty(difficulty));
                });
                container.append(&button);
                (difficulty, button)
            })
            .collect();

        let picker = Rc::new(RefCell::new(Self {
            container,
            buttons,
            game_engine_subscription: None,
        }));

        let subscription = {
            let picker = picker.clone();
            game_engine_observer.subscribe(move |event| {
                picker.borrow().handle_game_engine_event(event);
            })
        };
        picker.borrow_mut().game_engine_subscription = Some(subscription);
        picker
    }

    fn handle_game_engine_event(&self, event: &GameEngineEvent) {
        match event {
            GameEngineEvent::DifficultyChanged { difficulty, .. } => {
                for (candidate, button) in &self.buttons {
                    if candidate == difficulty {
                        button.add_css_class("selected");
                    } else {
                        button.remove_css_class("selected");
                    }
                }
            }
            GameEngineEvent::PhaseChanged(phase) => {
                self.container.set_visible(phase.accepts_difficulty_change());
            }
            _ => {}
        }
    }
}
