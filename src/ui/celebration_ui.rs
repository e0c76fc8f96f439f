use glib::ControlFlow;
use gtk4::{prelude::*, DrawingArea, TickCallbackId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::game::Celebration;
use crate::model::{rgb_channels, ConfettiField, ParticleBurst, CELEBRATION_DURATION};

const PARTICLE_SIZE: f64 = 6.0;

struct AnimationState {
    tick_callback: Option<TickCallbackId>,
    bursting: bool,
    /// Frame-clock time (µs) at which bursts stop; set on the first frame.
    burst_deadline: Option<i64>,
    last_frame: Option<i64>,
    rng: StdRng,
}

/// Confetti drawn over the whole window. Pointer input passes through.
pub struct CelebrationUI {
    pub drawing_area: DrawingArea,
    field: Rc<RefCell<ConfettiField>>,
    state: Rc<RefCell<AnimationState>>,
}

impl CelebrationUI {
    pub fn new() -> Rc<Self> {
        let drawing_area = DrawingArea::builder()
            .hexpand(true)
            .vexpand(true)
            .can_target(false)
            .build();
        let field = Rc::new(RefCell::new(ConfettiField::new()));

        drawing_area.set_draw_func({
            let field = Rc::clone(&field);
            move |_, cr, width, height| {
                for particle in field.borrow().particles() {
                    let (red, green, blue) = rgb_channels(particle.color);
                    cr.set_source_rgba(red, green, blue, particle.opacity());
                    cr.rectangle(
                        particle.x * width as f64 - PARTICLE_SIZE / 2.0,
                        particle.y * height as f64 - PARTICLE_SIZE / 2.0,
                        PARTICLE_SIZE,
                        PARTICLE_SIZE,
                    );
                    if let Err(err) = cr.fill() {
                        log::warn!(target: "celebration", "Failed to draw confetti: {}", err);
                        return;
                    }
                }
            }
        });

        Rc::new(Self {
            drawing_area,
            field,
            state: Rc::new(RefCell::new(AnimationState {
                tick_callback: None,
                bursting: false,
                burst_deadline: None,
                last_frame: None,
                rng: StdRng::from_rng(&mut rand::rng()),
            })),
        })
    }

    pub fn stop(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(tick_callback) = state.tick_callback.take() {
            tick_callback.remove();
        }
        state.bursting = false;
        state.burst_deadline = None;
        state.last_frame = None;
        self.field.borrow_mut().clear();
        self.drawing_area.queue_draw();
    }

    fn animate(
        area: &DrawingArea,
        frame_time: i64,
        state: &mut AnimationState,
        field: &mut ConfettiField,
    ) -> ControlFlow {
        let elapsed = state
            .last_frame
            .map(|last| Duration::from_micros((frame_time - last).max(0) as u64))
            .unwrap_or_default();
        state.last_frame = Some(frame_time);

        if state.bursting {
            let deadline = *state
                .burst_deadline
                .get_or_insert(frame_time + CELEBRATION_DURATION.as_micros() as i64);
            if frame_time < deadline {
                for burst in ParticleBurst::celebration_pair() {
                    field.spawn(&burst, &mut state.rng);
                }
            } else {
                state.bursting = false;
                state.burst_deadline = None;
            }
        }

        field.step(elapsed);
        area.queue_draw();

        if !state.bursting && field.is_empty() {
            log::trace!(target: "celebration", "Confetti settled");
            state.tick_callback = None;
            state.last_frame = None;
            ControlFlow::Break
        } else {
            ControlFlow::Continue
        }
    }
}

impl Celebration for CelebrationUI {
    fn play(&self) {
        let mut state = self.state.borrow_mut();
        state.bursting = true;
        state.burst_deadline = None;
        if state.tick_callback.is_some() {
            return;
        }

        let field = Rc::clone(&self.field);
        let animation_state = Rc::clone(&self.state);
        let tick_callback = self.drawing_area.add_tick_callback(move |area, clock| {
            CelebrationUI::animate(
                area,
                clock.frame_time(),
                &mut animation_state.borrow_mut(),
                &mut field.borrow_mut(),
            )
        });
        state.tick_callback = Some(tick_callback);
    }
}
