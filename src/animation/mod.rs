mod animatable;
mod spring;
mod transform;

pub use animatable::Animatable;
pub use spring::{SpringConfig, SpringState, FRAME_RATE};
pub use transform::TransformFunction;
