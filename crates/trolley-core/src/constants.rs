use glam::Vec2;

// Shared tuning constants for the trolley session.

// Progress scale
pub const PROGRESS_MIN: f32 = 0.0;
pub const PROGRESS_MAX: f32 = 100.0;
pub const PROGRESS_MIDPOINT: f32 = 50.0; // overlay behavior flips above this
pub const GAME_OVER_AT: f32 = 85.0; // latched terminal threshold

// Expression
pub const SMILE_THRESHOLD: f32 = 0.5; // happy score at or above this counts as smiling

// Per-tick advance
pub const FACE_STEP: f32 = 0.125; // face visible, not smiling
pub const NO_FACE_STEP: f32 = 0.5; // nobody in frame

// Track layout
pub const DIRECTION: Vec2 = Vec2::new(1.0, 0.65); // +x right, +y down
pub const START_OFFSET: Vec2 = Vec2::new(0.0, 50.0); // px

// Sampling
pub const POLL_INTERVAL_MS: u32 = 100;

// Overlay scheduling above the midpoint
pub const FRANTIC_DELAY_MS: (u32, u32) = (250, 1150);
pub const FRANTIC_FIRE_PROBABILITY: f32 = 0.85;
pub const DISTRESS_WEIGHT: u32 = 3;
pub const OCCASIONAL_WEIGHT: u32 = 1;

// Overlay scheduling at or below the midpoint
pub const SPARSE_DELAY_MS: (u32, u32) = (1000, 4000);
pub const SPARSE_FIRE_PROBABILITY: f32 = 0.35;

// Overlay voice randomization
pub const PLAYBACK_RATE_RANGE: (f32, f32) = (1.0, 1.8);
pub const PAN_SPREAD: f32 = 0.9; // pan drawn from [-PAN_SPREAD, PAN_SPREAD]
pub const GAIN_RANGE: (f32, f32) = (0.7, 1.3); // capped at GAIN_CAP after drawing
pub const GAIN_CAP: f32 = 1.0;

// Loop levels
pub const BACKGROUND_GAIN: f32 = 0.6;
pub const HAPPY_GAIN: f32 = 0.8;
pub const TERMINAL_GAIN: f32 = 1.0;
