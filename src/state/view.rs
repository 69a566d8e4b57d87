/// Which view is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    /// Login form
    #[default]
    LoggedOut,
    /// Homework list and submission form
    LoggedIn,
}

/// Navigation requests raised by screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    LoginSucceeded,
    Back,
}

impl ViewState {
    /// Next view for `event`. Events that don't apply leave the view unchanged.
    pub fn transition(self, event: NavEvent) -> ViewState {
        match (self, event) {
            (ViewState::LoggedOut, NavEvent::LoginSucceeded) => ViewState::LoggedIn,
            (ViewState::LoggedIn, NavEvent::Back) => ViewState::LoggedOut,
            (state, _) => state,
        }
    }
}
