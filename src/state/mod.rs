//! Application state.
//!
//! The `App` owns exactly one [`Session`] and one [`ViewState`]. Screens see
//! the session read-only through their contexts and ask for changes by
//! returning actions; nothing else mutates it.
//!
//! ```text
//!              LoginSucceeded
//!   LoggedOut ────────────────▶ LoggedIn
//!       ▲                          │
//!       └──────────── Back ────────┘
//! ```

pub mod session;
pub mod view;

pub use session::Session;
pub use view::{NavEvent, ViewState};
