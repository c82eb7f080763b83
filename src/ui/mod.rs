mod controller;
pub mod render;
pub mod state;

pub use controller::UiController;
pub use render::{ElementId, Page, Renderer};
pub use state::{HiddenReason, UiState};
