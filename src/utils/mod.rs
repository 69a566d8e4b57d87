pub mod layout;
pub mod path;
pub mod text_input;

pub use layout::center_popup;
pub use path::{default_config_path, default_log_path, expand_path, get_home_dir};
pub use text_input::TextInput;
