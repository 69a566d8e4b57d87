//! Screen trait and associated types.
//!
//! Screens own their form state, read shared state through a context and
//! report what should happen next as a [`ScreenAction`]. Network calls and
//! session changes are carried out by the `App`, never by a screen.

use crate::config::Config;
use crate::portal::SubmissionRequest;
use crate::state::{NavEvent, Session};
use anyhow::Result;
use crossterm::event::Event;
use ratatui::layout::Rect;
use ratatui::Frame;
use std::fmt;
use std::time::Instant;

/// Read-only state available while drawing.
pub struct RenderContext<'a> {
    pub config: &'a Config,
    pub session: &'a Session,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a Config, session: &'a Session) -> Self {
        Self { config, session }
    }
}

/// Read-only state available while handling events.
pub struct ScreenContext<'a> {
    pub config: &'a Config,
    pub session: &'a Session,
}

impl<'a> ScreenContext<'a> {
    pub fn new(config: &'a Config, session: &'a Session) -> Self {
        Self { config, session }
    }
}

/// What a screen asks the `App` to do.
#[derive(Clone, Default)]
pub enum ScreenAction {
    #[default]
    None,
    Navigate(NavEvent),
    /// Start a login call in the background
    StartLogin { screen_id: String, password: String },
    /// Replace the session with a freshly authenticated one
    Authenticated(Session),
    FetchHomeworks { token: String },
    SubmitHomework {
        token: String,
        request: SubmissionRequest,
    },
    Quit,
}

impl fmt::Debug for ScreenAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Navigate(event) => f.debug_tuple("Navigate").field(event).finish(),
            Self::StartLogin { screen_id, .. } => f
                .debug_struct("StartLogin")
                .field("screen_id", screen_id)
                .finish_non_exhaustive(),
            Self::Authenticated(session) => f
                .debug_struct("Authenticated")
                .field("screen_id", &session.screen_id)
                .finish_non_exhaustive(),
            Self::FetchHomeworks { .. } => f.debug_struct("FetchHomeworks").finish_non_exhaustive(),
            Self::SubmitHomework { request, .. } => f
                .debug_struct("SubmitHomework")
                .field("request", request)
                .finish_non_exhaustive(),
            Self::Quit => write!(f, "Quit"),
        }
    }
}

pub trait Screen {
    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext) -> Result<()>;

    fn handle_event(&mut self, event: Event, ctx: &ScreenContext) -> Result<ScreenAction>;

    /// True while a text field has focus, so plain keys are typed rather than mapped.
    fn is_input_focused(&self) -> bool {
        false
    }

    /// Called when the screen becomes visible. May start work, e.g. a fetch.
    fn on_enter(&mut self, _ctx: &ScreenContext) -> Result<ScreenAction> {
        Ok(ScreenAction::None)
    }

    fn on_exit(&mut self, _ctx: &ScreenContext) -> Result<()> {
        Ok(())
    }

    /// Called once per loop iteration for time-based transitions.
    fn tick(&mut self, _now: Instant) -> ScreenAction {
        ScreenAction::None
    }
}
