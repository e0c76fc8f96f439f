use rand::Rng;

/// Largest coordinate, in percent of the play area, the target may be placed
/// at. Keeps the marker from overflowing the right and bottom edges.
pub const TARGET_POSITION_MAX: u8 = 80;

/// Target location as percentages of the play area's width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetPosition {
    x: u8,
    y: u8,
}

impl TargetPosition {
    pub fn new(x: u8, y: u8) -> Self {
        Self {
            x: x.min(TARGET_POSITION_MAX),
            y: y.min(TARGET_POSITION_MAX),
        }
    }

    pub fn centered() -> Self {
        Self::new(TARGET_POSITION_MAX / 2, TARGET_POSITION_MAX / 2)
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::new(
            rng.random_range(0..=TARGET_POSITION_MAX),
            rng.random_range(0..=TARGET_POSITION_MAX),
        )
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }
}
