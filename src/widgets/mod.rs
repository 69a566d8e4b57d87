// Reusable UI widgets

pub mod button;
pub mod text_input;

pub use button::Button;
pub use text_input::{TextInputWidget, TextInputWidgetExt};
