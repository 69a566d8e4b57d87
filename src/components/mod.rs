// Building blocks shared by the screens

pub mod file_picker;
pub mod footer;
pub mod header;
pub mod status;

pub use file_picker::{FilePicker, PickerResult};
pub use footer::Footer;
pub use header::Header;
pub use status::{StatusKind, StatusMessage};
