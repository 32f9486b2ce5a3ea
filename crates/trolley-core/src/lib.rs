pub mod audio;
pub mod config;
pub mod constants;
pub mod controller;
pub mod expression;
pub mod position;
pub mod progress;
pub mod session;

pub use audio::*;
pub use config::*;
pub use controller::*;
pub use expression::*;
pub use position::*;
pub use progress::*;
pub use session::*;
