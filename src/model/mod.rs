pub mod geometry;
pub mod mode;
pub mod motion;
pub mod sprite;
pub mod state;
