pub mod draw_engine;
pub mod opening_attempt;

pub use draw_engine::*;
pub use opening_attempt::*;
