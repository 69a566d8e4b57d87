//! Screen controllers.
//!
//! Each screen owns its form state and implements [`Screen`]. The `App`
//! routes events to whichever screen matches the current `ViewState` and
//! carries out the [`ScreenAction`] it returns.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                    App                        │
//! │  match view {                                 │
//! │    LoggedOut => login.handle_event(...)       │
//! │    LoggedIn  => homework.handle_event(...)    │
//! │  }                                            │
//! │        │ ScreenAction                         │
//! │        ▼                                      │
//! │  TaskRunner / Session / ViewState::transition │
//! └──────────────────────────────────────────────┘
//! ```

pub mod homework;
pub mod login;
pub mod screen_trait;

pub use homework::HomeworkScreen;
pub use login::LoginScreen;
pub use screen_trait::{RenderContext, Screen, ScreenAction, ScreenContext};

use crate::keymap::{Action, Keymap};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Look a key up in the keymap, except that plain characters typed into a
/// focused text field are never treated as shortcuts.
pub(crate) fn mapped_action(key: KeyEvent, keymap: &Keymap, input_focused: bool) -> Option<Action> {
    let plain_char = matches!(key.code, KeyCode::Char(_))
        && !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    if input_focused && plain_char {
        return None;
    }
    keymap.get_action(key.code, key.modifiers)
}
