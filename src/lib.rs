// Library exports for deskpet

pub mod app;
pub mod components;
pub mod config;
pub mod event;
pub mod loader_worker;
pub mod model;
pub mod pipeline;

pub use app::PetApp;
pub use config::PetConfig;
pub use model::state::PetState;
