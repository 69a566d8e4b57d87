//! Homework view: pick an assignment, enter the student id, choose an image
//! and upload it.
//!
//! The homework list is fetched once per process and then cached. Only a
//! failed or empty fetch leaves the cache empty, so the next entry to the
//! view tries again.

use super::{mapped_action, RenderContext, Screen, ScreenAction, ScreenContext};
use crate::components::{FilePicker, Footer, Header, PickerResult, StatusMessage};
use crate::keymap::Action;
use crate::portal::{HomeworkSummary, PortalError, SubmissionRequest, SubmitReceipt};
use crate::state::{NavEvent, Session};
use crate::styles::{theme, LIST_HIGHLIGHT_SYMBOL};
use crate::utils::{get_home_dir, TextInput};
use crate::widgets::{Button, TextInputWidget, TextInputWidgetExt};
use anyhow::Result;
use crossterm::event::{Event, KeyEventKind};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const NOT_LOGGED_IN: &str = "Not logged in, please log in first.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomeworkFocus {
    #[default]
    List,
    StudentId,
    File,
    SubmitButton,
}

impl HomeworkFocus {
    fn next(self) -> Self {
        match self {
            HomeworkFocus::List => HomeworkFocus::StudentId,
            HomeworkFocus::StudentId => HomeworkFocus::File,
            HomeworkFocus::File => HomeworkFocus::SubmitButton,
            HomeworkFocus::SubmitButton => HomeworkFocus::List,
        }
    }

    fn prev(self) -> Self {
        match self {
            HomeworkFocus::List => HomeworkFocus::SubmitButton,
            HomeworkFocus::StudentId => HomeworkFocus::List,
            HomeworkFocus::File => HomeworkFocus::StudentId,
            HomeworkFocus::SubmitButton => HomeworkFocus::File,
        }
    }
}

#[derive(Default)]
pub struct HomeworkScreen {
    /// Cached list; empty means "fetch on next entry"
    homeworks: Vec<HomeworkSummary>,
    list_state: ListState,
    selected_id: Option<String>,
    submit_enabled: bool,
    fetch_in_flight: bool,
    submit_in_flight: bool,
    student_id: TextInput,
    selected_file: Option<PathBuf>,
    picker: FilePicker,
    focus: HomeworkFocus,
    status: Option<StatusMessage>,
}

impl HomeworkScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn homeworks(&self) -> &[HomeworkSummary] {
        &self.homeworks
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn is_fetch_in_flight(&self) -> bool {
        self.fetch_in_flight
    }

    pub fn is_submit_in_flight(&self) -> bool {
        self.submit_in_flight
    }

    pub fn student_id(&self) -> &str {
        self.student_id.text()
    }

    pub fn set_student_id(&mut self, student_id: &str) {
        self.student_id.set_text(student_id);
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Ask for the homework list unless it is cached or already on its way.
    pub fn request_list(&mut self, session: &Session) -> ScreenAction {
        let Some(token) = session.token() else {
            self.status = Some(StatusMessage::error(NOT_LOGGED_IN));
            return ScreenAction::None;
        };
        if !self.homeworks.is_empty() {
            debug!("Homework list cached, not fetching");
            return ScreenAction::None;
        }
        if self.fetch_in_flight {
            return ScreenAction::None;
        }

        self.fetch_in_flight = true;
        self.status = Some(StatusMessage::info("Loading homework list..."));
        ScreenAction::FetchHomeworks {
            token: token.to_string(),
        }
    }

    pub fn apply_list_result(&mut self, result: Result<Vec<HomeworkSummary>, PortalError>) {
        self.fetch_in_flight = false;
        match result {
            Ok(homeworks) if !homeworks.is_empty() => {
                info!("Loaded {} homework entries", homeworks.len());
                self.selected_id = homeworks.first().map(|h| h.id.clone());
                self.homeworks = homeworks;
                self.list_state.select(Some(0));
                self.submit_enabled = true;
                self.status = Some(StatusMessage::success("Homework list loaded."));
            }
            Ok(_) => self.list_failed("No homework available.".to_string()),
            Err(err) => {
                warn!("Homework list failed: {}", err);
                self.list_failed(err.user_message("Load failed"));
            }
        }
    }

    pub fn apply_list_crash(&mut self, message: &str) {
        self.fetch_in_flight = false;
        self.list_failed(format!("Unexpected error: {}", message));
    }

    fn list_failed(&mut self, message: String) {
        self.homeworks.clear();
        self.list_state.select(None);
        self.selected_id = None;
        self.submit_enabled = false;
        self.status = Some(StatusMessage::error(message));
    }

    /// Resolve a displayed name back to its id. Names may repeat; the first wins.
    pub fn select_by_name(&mut self, name: &str) {
        match self.homeworks.iter().find(|h| h.name == name) {
            Some(homework) => {
                self.status = Some(StatusMessage::info(format!(
                    "Selected homework ID: {}",
                    homework.id
                )));
                self.selected_id = Some(homework.id.clone());
                self.submit_enabled = true;
            }
            None => {
                self.selected_id = None;
                self.submit_enabled = false;
                self.status = Some(StatusMessage::error("Please select a valid homework."));
            }
        }
    }

    fn select_highlighted(&mut self) {
        let name = self
            .list_state
            .selected()
            .and_then(|i| self.homeworks.get(i))
            .map(|h| h.name.clone());
        if let Some(name) = name {
            self.select_by_name(&name);
        }
    }

    fn move_selection(&mut self, action: Action) {
        if self.homeworks.is_empty() {
            return;
        }
        let last = self.homeworks.len() - 1;
        let current = self.list_state.selected().unwrap_or(0);
        let next = match action {
            Action::MoveUp => current.saturating_sub(1),
            Action::MoveDown => (current + 1).min(last),
            Action::Home => 0,
            Action::End => last,
            _ => current,
        };
        self.list_state.select(Some(next));
        self.select_highlighted();
    }

    pub fn set_selected_file(&mut self, file: PathBuf) {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        self.status = Some(StatusMessage::info(format!("Selected file: {}", name)));
        self.selected_file = Some(file);
    }

    pub fn clear_selected_file(&mut self) {
        self.selected_file = None;
        self.status = Some(StatusMessage::info("No file selected"));
    }

    /// Validate the form and, if complete, ask for an upload.
    pub fn submit(&mut self, session: &Session) -> ScreenAction {
        if self.submit_in_flight {
            return ScreenAction::None;
        }
        let Some(token) = session.token() else {
            self.status = Some(StatusMessage::error(NOT_LOGGED_IN));
            return ScreenAction::None;
        };
        let Some(homework_id) = self.selected_id.clone().filter(|id| !id.is_empty()) else {
            self.status = Some(StatusMessage::error("Please select a homework."));
            return ScreenAction::None;
        };
        let student_id = self.student_id.text_trimmed().to_string();
        if student_id.is_empty() {
            self.status = Some(StatusMessage::error("Please enter the student ID."));
            return ScreenAction::None;
        }
        let Some(file) = self.selected_file.clone().filter(|f| f.is_file()) else {
            self.status = Some(StatusMessage::error("Please choose a valid image file."));
            return ScreenAction::None;
        };

        self.submit_in_flight = true;
        self.status = Some(StatusMessage::info("Uploading..."));
        ScreenAction::SubmitHomework {
            token: token.to_string(),
            request: SubmissionRequest {
                student_id,
                homework_id,
                screen_id: session.screen_id.clone(),
                file,
            },
        }
    }

    pub fn apply_submit_result(&mut self, result: Result<SubmitReceipt, PortalError>) {
        self.submit_in_flight = false;
        match result {
            Ok(receipt) => {
                info!("Submission accepted at {}", receipt.submitted_at.format("%H:%M:%S"));
                let message = receipt
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Homework submitted!".to_string());
                self.status = Some(StatusMessage::success(message));
                self.student_id.clear();
                self.selected_file = None;
            }
            Err(err) => {
                warn!("Submission failed: {}", err);
                self.status = Some(StatusMessage::error(err.user_message("Submission failed")));
            }
        }
    }

    pub fn apply_submit_crash(&mut self, message: &str) {
        self.submit_in_flight = false;
        self.status = Some(StatusMessage::error(format!("Unexpected error: {}", message)));
    }

    fn open_picker(&mut self) {
        let start = self
            .selected_file
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(get_home_dir);
        self.picker.open(start);
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let border = if self.focus == HomeworkFocus::List {
            t.border_focused_style()
        } else {
            t.border_style()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(" Homework ");

        if self.homeworks.is_empty() {
            let text = if self.fetch_in_flight {
                "Loading..."
            } else {
                "No homework loaded"
            };
            frame.render_widget(Paragraph::new(text).style(t.muted_style()).block(block), area);
            return;
        }

        let items: Vec<ListItem> = self
            .homeworks
            .iter()
            .map(|h| ListItem::new(h.name.as_str()).style(t.text_style()))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(t.highlight_style())
            .highlight_symbol(LIST_HIGHLIGHT_SYMBOL);
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_file_field(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let border = if self.focus == HomeworkFocus::File {
            t.border_focused_style()
        } else {
            t.border_style()
        };
        let (text, style) = match &self.selected_file {
            Some(file) => (file.display().to_string(), t.text_style()),
            None => ("No file selected".to_string(), t.muted_style()),
        };
        frame.render_widget(
            Paragraph::new(text).style(style).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(" Image file "),
            ),
            area,
        );
    }
}

impl Screen for HomeworkScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext) -> Result<()> {
        let [header_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .areas(area);

        let badge = format!("Screen {}", ctx.session.screen_id);
        Header::render(
            frame,
            header_area,
            "hwsubmit - Submit homework",
            "Choose the homework, enter the student ID and pick a photo of the work.",
            Some(&badge),
        );

        let [list_area, form_area] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                .areas(body_area);
        self.render_list(frame, list_area);

        let [student_area, file_area, button_area, status_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .areas(form_area);

        frame.render_text_input_widget(
            TextInputWidget::new(&self.student_id)
                .title("Student ID")
                .placeholder("e.g. 2024001")
                .focused(self.focus == HomeworkFocus::StudentId && !self.picker.is_open())
                .disabled(self.submit_in_flight),
            student_area,
        );
        self.render_file_field(frame, file_area);
        frame.render_widget(
            Button::new("Submit")
                .focused(self.focus == HomeworkFocus::SubmitButton)
                .enabled(self.submit_enabled)
                .busy(self.submit_in_flight, "Uploading..."),
            button_area,
        );
        if let Some(status) = &self.status {
            status.render(frame, status_area);
        }

        let keymap = &ctx.config.ui.keymap;
        Footer::render(
            frame,
            footer_area,
            &keymap.hints(&[
                Action::NextField,
                Action::Browse,
                Action::Submit,
                Action::Cancel,
                Action::Quit,
            ]),
        );

        self.picker.render(frame, area, keymap);
        Ok(())
    }

    fn handle_event(&mut self, event: Event, ctx: &ScreenContext) -> Result<ScreenAction> {
        let Event::Key(key) = event else {
            return Ok(ScreenAction::None);
        };
        if key.kind != KeyEventKind::Press {
            return Ok(ScreenAction::None);
        }

        let keymap = &ctx.config.ui.keymap;
        let action = mapped_action(key, keymap, self.is_input_focused());
        if action == Some(Action::Quit) {
            return Ok(ScreenAction::Quit);
        }

        if self.picker.is_open() {
            match self.picker.handle_key(key, keymap) {
                PickerResult::Selected(file) => self.set_selected_file(file),
                PickerResult::Cancelled => self.clear_selected_file(),
                PickerResult::None => {}
            }
            return Ok(ScreenAction::None);
        }

        match action {
            Some(Action::Cancel) => return Ok(ScreenAction::Navigate(NavEvent::Back)),
            Some(Action::Submit) => return Ok(self.submit(ctx.session)),
            Some(Action::Browse) => self.open_picker(),
            Some(Action::NextField) => self.focus = self.focus.next(),
            Some(Action::PrevField) => self.focus = self.focus.prev(),
            _ => match self.focus {
                HomeworkFocus::List => match action {
                    Some(a @ (Action::MoveUp | Action::MoveDown | Action::Home | Action::End)) => {
                        self.move_selection(a)
                    }
                    Some(Action::Confirm) => self.select_highlighted(),
                    _ => {}
                },
                HomeworkFocus::StudentId => match action {
                    Some(Action::Confirm) => self.focus = HomeworkFocus::File,
                    _ => {
                        if !self.submit_in_flight {
                            self.student_id.handle_key(key.code, key.modifiers, action);
                        }
                    }
                },
                HomeworkFocus::File => {
                    if action == Some(Action::Confirm) {
                        self.open_picker();
                    }
                }
                HomeworkFocus::SubmitButton => {
                    if action == Some(Action::Confirm) {
                        return Ok(self.submit(ctx.session));
                    }
                }
            },
        }
        Ok(ScreenAction::None)
    }

    fn is_input_focused(&self) -> bool {
        if self.picker.is_open() {
            self.picker.is_input_focused()
        } else {
            self.focus == HomeworkFocus::StudentId
        }
    }

    fn on_enter(&mut self, ctx: &ScreenContext) -> Result<ScreenAction> {
        Ok(self.request_list(ctx.session))
    }

    fn on_exit(&mut self, _ctx: &ScreenContext) -> Result<()> {
        if self.picker.is_open() {
            self.picker.close();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use reqwest::StatusCode;
    use std::fs;
    use tempfile::TempDir;

    fn session() -> Session {
        Session::new("12", Some("T".to_string()))
    }

    fn two_homeworks() -> Vec<HomeworkSummary> {
        vec![HomeworkSummary::new("1", "A"), HomeworkSummary::new("2", "B")]
    }

    fn loaded() -> HomeworkScreen {
        let mut screen = HomeworkScreen::new();
        assert!(matches!(
            screen.request_list(&session()),
            ScreenAction::FetchHomeworks { .. }
        ));
        screen.apply_list_result(Ok(two_homeworks()));
        screen
    }

    fn image_in(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("work.jpg");
        fs::write(&path, b"\xff\xd8\xff").unwrap();
        path
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_no_token_sends_nothing() {
        let mut screen = HomeworkScreen::new();
        let action = screen.request_list(&Session::default());
        assert!(matches!(action, ScreenAction::None));
        assert_eq!(screen.status().unwrap().text, NOT_LOGGED_IN);
        assert!(!screen.is_fetch_in_flight());
    }

    #[test]
    fn test_list_loaded_selects_first() {
        let screen = loaded();
        assert_eq!(screen.selected_id(), Some("1"));
        assert!(screen.is_submit_enabled());
        assert_eq!(screen.status().unwrap().text, "Homework list loaded.");
    }

    #[test]
    fn test_cached_list_is_not_refetched() {
        let mut screen = loaded();
        assert!(matches!(screen.request_list(&session()), ScreenAction::None));
    }

    #[test]
    fn test_fetch_in_flight_is_not_duplicated() {
        let mut screen = HomeworkScreen::new();
        screen.request_list(&session());
        assert!(matches!(screen.request_list(&session()), ScreenAction::None));
    }

    #[test]
    fn test_empty_list_disables_submit_and_refetches() {
        let mut screen = HomeworkScreen::new();
        screen.request_list(&session());
        screen.apply_list_result(Ok(Vec::new()));
        assert!(!screen.is_submit_enabled());
        assert_eq!(screen.selected_id(), None);
        assert_eq!(screen.status().unwrap().text, "No homework available.");
        assert!(matches!(
            screen.request_list(&session()),
            ScreenAction::FetchHomeworks { .. }
        ));
    }

    #[test]
    fn test_rejected_list_message() {
        let mut screen = HomeworkScreen::new();
        screen.request_list(&session());
        screen.apply_list_result(Err(PortalError::Rejected {
            status: StatusCode::OK,
            message: Some("token expired".to_string()),
        }));
        assert_eq!(screen.status().unwrap().text, "Load failed: token expired");
        assert!(screen.homeworks().is_empty());
    }

    #[test]
    fn test_select_by_name() {
        let mut screen = loaded();
        screen.select_by_name("B");
        assert_eq!(screen.selected_id(), Some("2"));
        assert_eq!(screen.status().unwrap().text, "Selected homework ID: 2");

        screen.select_by_name("Z");
        assert_eq!(screen.selected_id(), None);
        assert!(!screen.is_submit_enabled());
        assert_eq!(screen.status().unwrap().text, "Please select a valid homework.");
    }

    #[test]
    fn test_duplicate_names_resolve_to_first() {
        let mut screen = HomeworkScreen::new();
        screen.request_list(&session());
        screen.apply_list_result(Ok(vec![
            HomeworkSummary::new("7", "Essay"),
            HomeworkSummary::new("8", "Essay"),
        ]));
        screen.move_selection(Action::MoveDown);
        assert_eq!(screen.selected_id(), Some("7"));
    }

    #[test]
    fn test_validation_order() {
        let dir = TempDir::new().unwrap();

        let mut screen = HomeworkScreen::new();
        screen.submit(&Session::default());
        assert_eq!(screen.status().unwrap().text, NOT_LOGGED_IN);

        screen.submit(&session());
        assert_eq!(screen.status().unwrap().text, "Please select a homework.");

        let mut screen = loaded();
        screen.set_student_id("   ");
        screen.submit(&session());
        assert_eq!(screen.status().unwrap().text, "Please enter the student ID.");

        screen.set_student_id("S1");
        screen.submit(&session());
        assert_eq!(screen.status().unwrap().text, "Please choose a valid image file.");

        screen.set_selected_file(dir.path().join("missing.jpg"));
        let action = screen.submit(&session());
        assert!(matches!(action, ScreenAction::None));
        assert_eq!(screen.status().unwrap().text, "Please choose a valid image file.");

        // a directory is not a file
        screen.set_selected_file(dir.path().to_path_buf());
        screen.submit(&session());
        assert_eq!(screen.status().unwrap().text, "Please choose a valid image file.");
        assert!(!screen.is_submit_in_flight());
    }

    #[test]
    fn test_submit_builds_request() {
        let dir = TempDir::new().unwrap();
        let file = image_in(&dir);
        let mut screen = loaded();
        screen.set_student_id(" S1 ");
        screen.set_selected_file(file.clone());

        match screen.submit(&session()) {
            ScreenAction::SubmitHomework { token, request } => {
                assert_eq!(token, "T");
                assert_eq!(
                    request,
                    SubmissionRequest {
                        student_id: "S1".to_string(),
                        homework_id: "1".to_string(),
                        screen_id: "12".to_string(),
                        file,
                    }
                );
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(screen.is_submit_in_flight());
        assert_eq!(screen.status().unwrap().text, "Uploading...");
        assert!(matches!(screen.submit(&session()), ScreenAction::None));
    }

    #[test]
    fn test_success_clears_student_and_file_only() {
        let dir = TempDir::new().unwrap();
        let mut screen = loaded();
        screen.select_by_name("B");
        screen.set_student_id("S1");
        screen.set_selected_file(image_in(&dir));
        screen.submit(&session());

        screen.apply_submit_result(Ok(SubmitReceipt {
            message: None,
            submitted_at: chrono::Local::now(),
        }));
        assert_eq!(screen.status().unwrap().text, "Homework submitted!");
        assert_eq!(screen.student_id(), "");
        assert_eq!(screen.selected_file(), None);
        assert_eq!(screen.selected_id(), Some("2"));
        assert!(!screen.is_submit_in_flight());
    }

    #[test]
    fn test_server_message_shown_on_success() {
        let mut screen = loaded();
        screen.apply_submit_result(Ok(SubmitReceipt {
            message: Some("Saved".to_string()),
            submitted_at: chrono::Local::now(),
        }));
        assert_eq!(screen.status().unwrap().text, "Saved");
    }

    #[test]
    fn test_failure_keeps_form() {
        let dir = TempDir::new().unwrap();
        let mut screen = loaded();
        screen.set_student_id("S1");
        screen.set_selected_file(image_in(&dir));
        screen.submit(&session());
        screen.apply_submit_result(Err(PortalError::Rejected {
            status: StatusCode::OK,
            message: None,
        }));
        assert_eq!(screen.status().unwrap().text, "Submission failed: unknown error");
        assert_eq!(screen.student_id(), "S1");
        assert!(screen.selected_file().is_some());
        assert!(!screen.is_submit_in_flight());
    }

    #[test]
    fn test_picker_cancel_clears_file() {
        let dir = TempDir::new().unwrap();
        let mut screen = loaded();
        screen.set_selected_file(image_in(&dir));
        assert_eq!(screen.status().unwrap().text, "Selected file: work.jpg");
        screen.clear_selected_file();
        assert_eq!(screen.selected_file(), None);
        assert_eq!(screen.status().unwrap().text, "No file selected");
    }

    #[test]
    fn test_keys_navigate_list_and_go_back() {
        let config = Config::default();
        let session = session();
        let ctx = ScreenContext::new(&config, &session);
        let mut screen = loaded();

        screen
            .handle_event(key(KeyCode::Down, KeyModifiers::NONE), &ctx)
            .unwrap();
        assert_eq!(screen.selected_id(), Some("2"));

        let action = screen
            .handle_event(key(KeyCode::Esc, KeyModifiers::NONE), &ctx)
            .unwrap();
        assert!(matches!(action, ScreenAction::Navigate(NavEvent::Back)));
    }

    #[test]
    fn test_typing_student_id() {
        let config = Config::default();
        let session = session();
        let ctx = ScreenContext::new(&config, &session);
        let mut screen = loaded();

        screen
            .handle_event(key(KeyCode::Tab, KeyModifiers::NONE), &ctx)
            .unwrap();
        assert!(screen.is_input_focused());
        for c in "S9".chars() {
            screen
                .handle_event(key(KeyCode::Char(c), KeyModifiers::NONE), &ctx)
                .unwrap();
        }
        assert_eq!(screen.student_id(), "S9");

        // ctrl+s submits from the text field instead of typing
        let action = screen
            .handle_event(key(KeyCode::Char('s'), KeyModifiers::CONTROL), &ctx)
            .unwrap();
        assert!(matches!(action, ScreenAction::None));
        assert_eq!(screen.student_id(), "S9");
        assert_eq!(screen.status().unwrap().text, "Please choose a valid image file.");
    }
}
