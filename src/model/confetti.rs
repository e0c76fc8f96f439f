use rand::Rng;
use std::time::Duration;

/// How long a celebration keeps emitting new bursts.
pub const CELEBRATION_DURATION: Duration = Duration::from_secs(3);

const GRAVITY: f64 = 0.9;
const DRAG: f64 = 0.9;
const PARTICLE_LIFETIME_SECS: f64 = 2.5;
const LAUNCH_SPEED_MIN: f64 = 0.6;
const LAUNCH_SPEED_MAX: f64 = 1.2;
const ORIGIN_HEIGHT: f64 = 0.6;

/// 0xRRGGBB
pub type HexColor = u32;

pub const CONFETTI_COLORS: [HexColor; 4] = [0xbb0000, 0xffffff, 0xffd700, 0x00ff00];

/// Split a hex color into cairo-style channels in 0.0..=1.0.
pub fn rgb_channels(color: HexColor) -> (f64, f64, f64) {
    let channel = |shift: u32| ((color >> shift) & 0xff) as f64 / 255.0;
    (channel(16), channel(8), channel(0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstOrigin {
    LeftEdge,
    RightEdge,
}

impl BurstOrigin {
    fn x(&self) -> f64 {
        match self {
            BurstOrigin::LeftEdge => 0.0,
            BurstOrigin::RightEdge => 1.0,
        }
    }
}

/// Parameters of one spray of particles. Angles are in degrees, counter
/// clockwise from pointing right, so 90 is straight up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleBurst {
    pub particle_count: usize,
    pub angle: f64,
    pub spread: f64,
    pub origin: BurstOrigin,
    pub colors: &'static [HexColor],
}

impl ParticleBurst {
    /// The pair of bursts fired every animation frame of a celebration.
    pub fn celebration_pair() -> [ParticleBurst; 2] {
        [
            ParticleBurst {
                particle_count: 5,
                angle: 60.0,
                spread: 55.0,
                origin: BurstOrigin::LeftEdge,
                colors: &CONFETTI_COLORS,
            },
            ParticleBurst {
                particle_count: 5,
                angle: 120.0,
                spread: 55.0,
                origin: BurstOrigin::RightEdge,
                colors: &CONFETTI_COLORS,
            },
        ]
    }
}

/// A single piece of confetti, in coordinates relative to the canvas
/// (0.0..=1.0 on both axes, y growing downwards).
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    velocity_x: f64,
    velocity_y: f64,
    pub color: HexColor,
    age_secs: f64,
}

impl Particle {
    /// Remaining life in 0.0..=1.0, used as opacity when drawing.
    pub fn opacity(&self) -> f64 {
        (1.0 - self.age_secs / PARTICLE_LIFETIME_SECS).clamp(0.0, 1.0)
    }

    fn is_expired(&self) -> bool {
        self.age_secs >= PARTICLE_LIFETIME_SECS || self.y > 1.2
    }
}

#[derive(Debug, Default)]
pub struct ConfettiField {
    particles: Vec<Particle>,
}

impl ConfettiField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn spawn<R: Rng>(&mut self, burst: &ParticleBurst, rng: &mut R) {
        if burst.colors.is_empty() {
            return;
        }
        let half_spread = burst.spread / 2.0;
        for _ in 0..burst.particle_count {
            let angle = (burst.angle + rng.random_range(-half_spread..=half_spread)).to_radians();
            let speed = rng.random_range(LAUNCH_SPEED_MIN..=LAUNCH_SPEED_MAX);
            let color = burst.colors[rng.random_range(0..burst.colors.len())];
            self.particles.push(Particle {
                x: burst.origin.x(),
                y: ORIGIN_HEIGHT,
                velocity_x: speed * angle.cos(),
                // canvas y grows downwards
                velocity_y: -speed * angle.sin(),
                color,
                age_secs: 0.0,
            });
        }
    }

    /// Advance the simulation and drop expired particles.
    pub fn step(&mut self, elapsed: Duration) {
        let dt = elapsed.as_secs_f64();
        let damping = DRAG.powf(dt);
        for particle in &mut self.particles {
            particle.velocity_x *= damping;
            particle.velocity_y = particle.velocity_y * damping + GRAVITY * dt;
            particle.x += particle.velocity_x * dt;
            particle.y += particle.velocity_y * dt;
            particle.age_secs += dt;
        }
        self.particles.retain(|particle| !particle.is_expired());
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
