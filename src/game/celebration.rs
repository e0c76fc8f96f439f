/// Plays the win animation. Must return immediately; the animation runs on
/// its own for [`crate::model::CELEBRATION_DURATION`].
pub trait Celebration {
    fn play(&self);
}

#[cfg(test)]
pub use counting::CountingCelebration;

#[cfg(test)]
mod counting {
    use super::Celebration;
    use std::cell::Cell;

    #[derive(Debug, Default)]
    pub struct CountingCelebration {
        plays: Cell<u32>,
    }

    impl CountingCelebration {
        pub fn plays(&self) -> u32 {
            self.plays.get()
        }
    }

    impl Celebration for CountingCelebration {
        fn play(&self) {
            self.plays.set(self.plays.get() + 1);
        }
    }
}
