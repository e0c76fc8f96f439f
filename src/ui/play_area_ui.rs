use gtk4::{prelude::*, Button, Fixed, Frame};
use std::cell::RefCell;
use std::rc::Rc;

use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{GameEngineCommand, GameEngineEvent, TargetPosition};

const PLAY_AREA_WIDTH: i32 = 480;
const PLAY_AREA_HEIGHT: i32 = 360;
const TARGET_SIZE: i32 = 64;

/// The area the target jumps around in. Target coordinates are percentages
/// of the area and mark the target's centre.
pub struct PlayAreaUI {
    pub frame: Frame,
    fixed: Fixed,
    target_button: Button,
    game_engine_subscription: Option<Unsubscriber<GameEngineEvent>>,
}

impl Destroyable for PlayAreaUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.game_engine_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl PlayAreaUI {
    pub fn new(
        game_engine_command_emitter: EventEmitter<GameEngineCommand>,
        game_engine_observer: EventObserver<GameEngineEvent>,
    ) -> Rc<RefCell<Self>> {
        let fixed = Fixed::new();
        fixed.set_size_request(PLAY_AREA_WIDTH, PLAY_AREA_HEIGHT);

        let target_button = Button::builder()
            .css_classes(["target"])
            .width_request(TARGET_SIZE)
            .height_request(TARGET_SIZE)
            .visible(false)
            .build();
        target_button.connect_clicked(move |_| {
            game_engine_command_emitter.emit(GameEngineCommand::RegisterHit);
        });
        fixed.put(&target_button, 0.0, 0.0);

        let frame = Frame::builder()
            .name("play-area")
            .css_classes(["play-area"])
            .halign(gtk4::Align::Center)
            .child(&fixed)
            .build();

        let play_area = Rc::new(RefCell::new(Self {
            frame,
            fixed,
            target_button,
            game_engine_subscription: None,
        }));

        let subscription = {
            let play_area = play_area.clone();
            game_engine_observer.subscribe(move |event| {
                play_area.borrow().handle_game_engine_event(event);
            })
        };
        play_area.borrow_mut().game_engine_subscription = Some(subscription);
        play_area
    }

    fn handle_game_engine_event(&self, event: &GameEngineEvent) {
        match event {
            GameEngineEvent::TargetMoved(position) => self.place_target(*position),
            GameEngineEvent::PhaseChanged(phase) => {
                self.target_button.set_visible(phase.is_playing());
            }
            _ => {}
        }
    }

    fn place_target(&self, position: TargetPosition) {
        let width = match self.fixed.width() {
            0 => PLAY_AREA_WIDTH,
            width => width,
        };
        let height = match self.fixed.height() {
            0 => PLAY_AREA_HEIGHT,
            height => height,
        };
        let x = offset_for(position.x(), width);
        let y = offset_for(position.y(), height);
        log::trace!(target: "play_area", "Moving target to {:?} ({}, {})", position, x, y);
        self.fixed.move_(&self.target_button, x, y);
    }
}

/// Top-left offset, in pixels, that centres the target at `percent` of `extent`.
fn offset_for(percent: u8, extent: i32) -> f64 {
    let centre = extent as f64 * percent as f64 / 100.0;
    (centre - TARGET_SIZE as f64 / 2.0).max(0.0)
}
