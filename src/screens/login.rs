//! Login view: screen id + password, exchanged for a session token.

use super::{mapped_action, RenderContext, Screen, ScreenAction, ScreenContext};
use crate::components::{Footer, Header, StatusMessage};
use crate::keymap::Action;
use crate::portal::{LoginOutcome, PortalError};
use crate::state::{NavEvent, Session};
use crate::styles::theme;
use crate::utils::{center_popup, TextInput};
use crate::widgets::{Button, TextInputWidget, TextInputWidgetExt};
use anyhow::Result;
use crossterm::event::{Event, KeyEventKind};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;
use std::time::{Duration, Instant};
use tracing::info;

/// Pause between "Login successful!" and switching to the homework view.
pub const NAVIGATE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    ScreenId,
    Password,
    LoginButton,
}

impl LoginField {
    fn next(self) -> Self {
        match self {
            LoginField::ScreenId => LoginField::Password,
            LoginField::Password => LoginField::LoginButton,
            LoginField::LoginButton => LoginField::ScreenId,
        }
    }

    fn prev(self) -> Self {
        match self {
            LoginField::ScreenId => LoginField::LoginButton,
            LoginField::Password => LoginField::ScreenId,
            LoginField::LoginButton => LoginField::Password,
        }
    }
}

pub struct LoginScreen {
    screen_id: TextInput,
    password: TextInput,
    focus: LoginField,
    /// A login call is running; the button is disabled
    in_flight: bool,
    status: Option<StatusMessage>,
    /// Set after a successful login; the view switches once it has passed
    navigate_at: Option<Instant>,
}

impl LoginScreen {
    /// `prefill` is the screen id from config or `--screen-id`.
    pub fn new(prefill: &str) -> Self {
        let prefill = prefill.trim();
        Self {
            screen_id: TextInput::with_text(prefill),
            password: TextInput::new(),
            focus: if prefill.is_empty() {
                LoginField::ScreenId
            } else {
                LoginField::Password
            },
            in_flight: false,
            status: None,
            navigate_at: None,
        }
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn focus(&self) -> LoginField {
        self.focus
    }

    /// Validate the form and, if complete, ask for a login call.
    pub fn submit(&mut self) -> ScreenAction {
        if self.in_flight || self.navigate_at.is_some() {
            return ScreenAction::None;
        }
        let screen_id = self.screen_id.text_trimmed().to_string();
        let password = self.password.text_trimmed().to_string();
        if screen_id.is_empty() || password.is_empty() {
            self.status = Some(StatusMessage::error(
                "Please enter the screen ID and password.",
            ));
            return ScreenAction::None;
        }

        self.in_flight = true;
        self.status = Some(StatusMessage::info("Verifying..."));
        ScreenAction::StartLogin {
            screen_id,
            password,
        }
    }

    /// Apply the answer to a login started by [`LoginScreen::submit`].
    pub fn apply_login_result(
        &mut self,
        screen_id: String,
        result: Result<LoginOutcome, PortalError>,
        now: Instant,
    ) -> ScreenAction {
        self.in_flight = false;
        match result {
            Ok(outcome) => {
                info!("Screen {} logged in", screen_id);
                self.status = Some(StatusMessage::success(format!(
                    "Login successful! ID: {}",
                    screen_id
                )));
                self.navigate_at = Some(now + NAVIGATE_DELAY);
                ScreenAction::Authenticated(Session::new(screen_id, outcome.token))
            }
            Err(err) => {
                info!("Login for screen {} failed: {}", screen_id, err);
                self.status = Some(StatusMessage::error(err.user_message("Login failed")));
                ScreenAction::None
            }
        }
    }

    /// The login task died without answering.
    pub fn apply_crash(&mut self, message: &str) {
        self.in_flight = false;
        self.status = Some(StatusMessage::error(format!("Unexpected error: {}", message)));
    }

    fn is_text_field(&self) -> bool {
        matches!(self.focus, LoginField::ScreenId | LoginField::Password)
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            LoginField::ScreenId => Some(&mut self.screen_id),
            LoginField::Password => Some(&mut self.password),
            LoginField::LoginButton => None,
        }
    }
}

impl Screen for LoginScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext) -> Result<()> {
        let t = theme();
        let [header_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .areas(area);

        Header::render(
            frame,
            header_area,
            "hwsubmit - Screen login",
            "Log this classroom screen in to the grading portal.",
            None,
        );

        let form_area = center_popup(body_area, 60, 16);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style())
            .title(" Login ")
            .title_style(t.title_style());
        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let [id_area, pw_area, button_area, status_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .areas(inner);

        let busy = self.in_flight;
        frame.render_text_input_widget(
            TextInputWidget::new(&self.screen_id)
                .title("Screen ID")
                .placeholder("e.g. 12")
                .focused(self.focus == LoginField::ScreenId)
                .disabled(busy),
            id_area,
        );
        frame.render_text_input_widget(
            TextInputWidget::new(&self.password)
                .title("Password")
                .masked(true)
                .focused(self.focus == LoginField::Password)
                .disabled(busy),
            pw_area,
        );

        let [button_area] = Layout::horizontal([Constraint::Length(20)])
            .flex(ratatui::layout::Flex::Center)
            .areas(button_area);
        frame.render_widget(
            Button::new("Log in")
                .focused(self.focus == LoginField::LoginButton)
                .busy(busy, "Verifying..."),
            button_area,
        );

        if let Some(status) = &self.status {
            status.render(frame, status_area);
        }

        let keymap = &ctx.config.ui.keymap;
        Footer::render(
            frame,
            footer_area,
            &keymap.hints(&[Action::NextField, Action::Confirm, Action::Quit]),
        );
        Ok(())
    }

    fn handle_event(&mut self, event: Event, ctx: &ScreenContext) -> Result<ScreenAction> {
        let Event::Key(key) = event else {
            return Ok(ScreenAction::None);
        };
        if key.kind != KeyEventKind::Press {
            return Ok(ScreenAction::None);
        }

        let action = mapped_action(key, &ctx.config.ui.keymap, self.is_input_focused());
        if action == Some(Action::Quit) {
            return Ok(ScreenAction::Quit);
        }
        if self.in_flight || self.navigate_at.is_some() {
            return Ok(ScreenAction::None);
        }

        match action {
            Some(Action::NextField | Action::MoveDown) => self.focus = self.focus.next(),
            Some(Action::PrevField | Action::MoveUp) => self.focus = self.focus.prev(),
            Some(Action::Confirm) if self.focus == LoginField::ScreenId => {
                self.focus = LoginField::Password;
            }
            Some(Action::Confirm | Action::Submit) => return Ok(self.submit()),
            _ => {
                if let Some(input) = self.focused_input() {
                    input.handle_key(key.code, key.modifiers, action);
                }
            }
        }
        Ok(ScreenAction::None)
    }

    fn is_input_focused(&self) -> bool {
        self.is_text_field() && !self.in_flight
    }

    /// Coming back from the homework view starts with a clean form.
    fn on_enter(&mut self, _ctx: &ScreenContext) -> Result<ScreenAction> {
        self.password.clear();
        self.status = None;
        self.navigate_at = None;
        self.focus = if self.screen_id.is_blank() {
            LoginField::ScreenId
        } else {
            LoginField::Password
        };
        Ok(ScreenAction::None)
    }

    fn tick(&mut self, now: Instant) -> ScreenAction {
        match self.navigate_at {
            Some(at) if now >= at => {
                self.navigate_at = None;
                ScreenAction::Navigate(NavEvent::LoginSucceeded)
            }
            _ => ScreenAction::None,
        }
    }
}
