use crate::config::Config;
use crate::portal::PortalClient;
use crate::screens::{
    HomeworkScreen, LoginScreen, RenderContext, Screen, ScreenAction, ScreenContext,
};
use crate::state::{NavEvent, Session, ViewState};
use crate::tasks::{TaskKind, TaskOutcome, TaskRunner};
use crate::tui::Tui;
use anyhow::{Context, Result};
use crossterm::event::Event;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How long to wait for a key before checking background results again
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Main application state
pub struct App {
    config: Config,
    session: Session,
    view: ViewState,
    tasks: TaskRunner,
    login: LoginScreen,
    homework: HomeworkScreen,
    should_quit: bool,
}

impl App {
    /// Fails when the HTTP client or the async runtime can't be built.
    pub fn new(config: Config) -> Result<Self> {
        let client = PortalClient::new(&config.portal, &config.timeouts)
            .context("Failed to set up the portal client")?;
        let tasks = TaskRunner::new(client)?;
        let login = LoginScreen::new(&config.ui.screen_id);
        info!("Portal base URL: {}", config.portal.base_url);

        Ok(Self {
            config,
            session: Session::default(),
            view: ViewState::default(),
            tasks,
            login,
            homework: HomeworkScreen::new(),
            should_quit: false,
        })
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let result = self.event_loop(&mut tui);
        tui.exit()?;
        result
    }

    fn event_loop(&mut self, tui: &mut Tui) -> Result<()> {
        let ctx = ScreenContext::new(&self.config, &self.session);
        let action = self.login.on_enter(&ctx)?;
        self.apply_action(action)?;

        loop {
            self.draw(tui)?;

            self.process_outcomes()?;
            self.tick(Instant::now())?;
            if self.should_quit {
                break;
            }

            if let Some(event) = tui.poll_event(POLL_INTERVAL)? {
                self.handle_event(event)?;
            }
        }
        Ok(())
    }

    fn draw(&mut self, tui: &mut Tui) -> Result<()> {
        let ctx = RenderContext::new(&self.config, &self.session);
        let view = self.view;
        let login = &mut self.login;
        let homework = &mut self.homework;

        let mut result = Ok(());
        tui.terminal_mut().draw(|frame| {
            let area = frame.area();
            result = match view {
                ViewState::LoggedOut => login.render(frame, area, &ctx),
                ViewState::LoggedIn => homework.render(frame, area, &ctx),
            };
        })?;
        result
    }

    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        let ctx = ScreenContext::new(&self.config, &self.session);
        let action = match self.view {
            ViewState::LoggedOut => self.login.handle_event(event, &ctx)?,
            ViewState::LoggedIn => self.homework.handle_event(event, &ctx)?,
        };
        self.apply_action(action)
    }

    /// Hand every finished background call to the screen that asked for it.
    pub fn process_outcomes(&mut self) -> Result<()> {
        for outcome in self.tasks.drain() {
            self.apply_outcome(outcome)?;
        }
        Ok(())
    }

    pub fn apply_outcome(&mut self, outcome: TaskOutcome) -> Result<()> {
        match outcome {
            TaskOutcome::Login { screen_id, result } => {
                let action = self
                    .login
                    .apply_login_result(screen_id, result, Instant::now());
                return self.apply_action(action);
            }
            TaskOutcome::HomeworkList(result) => self.homework.apply_list_result(result),
            TaskOutcome::Submission(result) => self.homework.apply_submit_result(result),
            TaskOutcome::Crashed { kind, message } => match kind {
                TaskKind::Login => self.login.apply_crash(&message),
                TaskKind::HomeworkList => self.homework.apply_list_crash(&message),
                TaskKind::Submission => self.homework.apply_submit_crash(&message),
            },
        }
        Ok(())
    }

    pub fn tick(&mut self, now: Instant) -> Result<()> {
        let action = match self.view {
            ViewState::LoggedOut => self.login.tick(now),
            ViewState::LoggedIn => self.homework.tick(now),
        };
        self.apply_action(action)
    }

    fn apply_action(&mut self, action: ScreenAction) -> Result<()> {
        let mut next = action;
        loop {
            debug!("Applying {:?}", next);
            next = match next {
                ScreenAction::None => return Ok(()),
                ScreenAction::Quit => {
                    self.should_quit = true;
                    return Ok(());
                }
                ScreenAction::StartLogin {
                    screen_id,
                    password,
                } => {
                    self.tasks.login(screen_id, password);
                    return Ok(());
                }
                ScreenAction::Authenticated(session) => {
                    self.session = session;
                    return Ok(());
                }
                ScreenAction::FetchHomeworks { token } => {
                    self.tasks.fetch_homeworks(token);
                    return Ok(());
                }
                ScreenAction::SubmitHomework { token, request } => {
                    self.tasks.submit(token, request);
                    return Ok(());
                }
                ScreenAction::Navigate(event) => self.navigate(event)?,
            };
        }
    }

    /// Switch views, running the exit and enter hooks. Returns whatever the
    /// new screen asks for on entry.
    fn navigate(&mut self, event: NavEvent) -> Result<ScreenAction> {
        let target = self.view.transition(event);
        if target == self.view {
            return Ok(ScreenAction::None);
        }
        info!("View {:?} -> {:?}", self.view, target);

        let ctx = ScreenContext::new(&self.config, &self.session);
        match self.view {
            ViewState::LoggedOut => self.login.on_exit(&ctx)?,
            ViewState::LoggedIn => self.homework.on_exit(&ctx)?,
        }
        self.view = target;
        match target {
            ViewState::LoggedOut => self.login.on_enter(&ctx),
            ViewState::LoggedIn => self.homework.on_enter(&ctx),
        }
    }
}
