//! Modal picker for the image to upload.
//!
//! Shows directories and `jpg`/`jpeg`/`png` files only, with a `..` entry
//! and a path field for jumping straight to a location or file.

use crate::keymap::{Action, Keymap};
use crate::styles::{theme, LIST_HIGHLIGHT_SYMBOL};
use crate::utils::{center_popup, expand_path, TextInput};
use crate::widgets::{TextInputWidget, TextInputWidgetExt};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions the portal accepts, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerFocus {
    PathInput,
    #[default]
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEntry {
    Parent,
    Dir(PathBuf),
    File(PathBuf),
}

impl PickerEntry {
    fn label(&self) -> String {
        match self {
            PickerEntry::Parent => ".. (parent)".to_string(),
            PickerEntry::Dir(path) => format!("{}/", file_name(path)),
            PickerEntry::File(path) => file_name(path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerResult {
    None,
    Cancelled,
    Selected(PathBuf),
}

#[derive(Debug, Default)]
pub struct FilePicker {
    is_open: bool,
    current_dir: PathBuf,
    entries: Vec<PickerEntry>,
    list_state: ListState,
    path_input: TextInput,
    focus: PickerFocus,
    /// Shown under the list, e.g. when a typed path doesn't exist
    note: Option<String>,
}

impl FilePicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, dir: PathBuf) {
        self.is_open = true;
        self.focus = PickerFocus::List;
        self.note = None;
        self.change_dir(dir);
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.entries.clear();
        self.path_input.clear();
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_input_focused(&self) -> bool {
        self.is_open && self.focus == PickerFocus::PathInput
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn entries(&self) -> &[PickerEntry] {
        &self.entries
    }

    fn change_dir(&mut self, dir: PathBuf) {
        self.path_input.set_text(dir.to_string_lossy());
        self.current_dir = dir;
        self.refresh_entries();
        self.list_state.select(Some(0));
    }

    /// Re-read the current directory. Unreadable directories list as empty.
    pub fn refresh_entries(&mut self) {
        self.entries.clear();
        if self.current_dir.parent().is_some() {
            self.entries.push(PickerEntry::Parent);
        }

        let mut dirs = Vec::new();
        let mut files = Vec::new();
        match std::fs::read_dir(&self.current_dir) {
            Ok(read_dir) => {
                for entry in read_dir.flatten() {
                    let path = entry.path();
                    if path.is_dir() {
                        dirs.push(path);
                    } else if is_supported_image(&path) {
                        files.push(path);
                    }
                }
            }
            Err(e) => {
                debug!("Cannot list {:?}: {}", self.current_dir, e);
                self.note = Some(format!("Cannot open directory: {}", e));
            }
        }
        dirs.sort();
        files.sort();
        self.entries.extend(dirs.into_iter().map(PickerEntry::Dir));
        self.entries.extend(files.into_iter().map(PickerEntry::File));
    }

    pub fn handle_key(&mut self, key: KeyEvent, keymap: &Keymap) -> PickerResult {
        if !self.is_open || key.kind != KeyEventKind::Press {
            return PickerResult::None;
        }
        let action = keymap.get_action(key.code, key.modifiers);
        let result = self.dispatch(key, action);
        self.clamp_selection();
        result
    }

    /// `ListState` lets the index run past the end; keep it on a real entry.
    fn clamp_selection(&mut self) {
        if let Some(selected) = self.list_state.selected() {
            let last = self.entries.len().saturating_sub(1);
            if selected > last {
                self.list_state.select(Some(last));
            }
        }
    }

    fn dispatch(&mut self, key: KeyEvent, action: Option<Action>) -> PickerResult {
        match (action, self.focus) {
            (Some(Action::Cancel | Action::Quit), _) => {
                self.close();
                PickerResult::Cancelled
            }
            (Some(Action::NextField | Action::PrevField), focus) => {
                self.focus = match focus {
                    PickerFocus::List => PickerFocus::PathInput,
                    PickerFocus::PathInput => PickerFocus::List,
                };
                PickerResult::None
            }
            (Some(Action::Confirm), PickerFocus::PathInput) => self.confirm_typed_path(),
            (Some(Action::Confirm), PickerFocus::List) => self.confirm_selection(),
            (_, PickerFocus::PathInput) => {
                self.path_input.handle_key(key.code, key.modifiers, action);
                PickerResult::None
            }
            (Some(Action::MoveUp), PickerFocus::List) => {
                self.list_state.select_previous();
                PickerResult::None
            }
            (Some(Action::MoveDown), PickerFocus::List) => {
                self.list_state.select_next();
                PickerResult::None
            }
            (Some(Action::Home), PickerFocus::List) => {
                self.list_state.select_first();
                PickerResult::None
            }
            (Some(Action::End), PickerFocus::List) => {
                self.list_state.select_last();
                PickerResult::None
            }
            (Some(Action::Backspace | Action::MoveLeft), PickerFocus::List) => {
                self.go_up();
                PickerResult::None
            }
            _ if key.code == KeyCode::Char('/') => {
                self.focus = PickerFocus::PathInput;
                PickerResult::None
            }
            _ => PickerResult::None,
        }
    }

    fn go_up(&mut self) {
        if let Some(parent) = self.current_dir.parent().map(Path::to_path_buf) {
            self.note = None;
            self.change_dir(parent);
        }
    }

    fn confirm_selection(&mut self) -> PickerResult {
        let Some(entry) = self
            .list_state
            .selected()
            .and_then(|i| self.entries.get(i))
            .cloned()
        else {
            return PickerResult::None;
        };
        self.note = None;
        match entry {
            PickerEntry::Parent => {
                self.go_up();
                PickerResult::None
            }
            PickerEntry::Dir(dir) => {
                self.change_dir(dir);
                PickerResult::None
            }
            PickerEntry::File(file) => {
                self.close();
                PickerResult::Selected(file)
            }
        }
    }

    fn confirm_typed_path(&mut self) -> PickerResult {
        let typed = self.path_input.text_trimmed();
        if typed.is_empty() {
            return PickerResult::None;
        }
        let path = expand_path(typed);
        if path.is_dir() {
            self.note = None;
            self.focus = PickerFocus::List;
            self.change_dir(path);
            PickerResult::None
        } else if path.is_file() && is_supported_image(&path) {
            self.close();
            PickerResult::Selected(path)
        } else if path.is_file() {
            self.note = Some("Only .jpg, .jpeg and .png files can be submitted".to_string());
            PickerResult::None
        } else {
            self.note = Some(format!("No such file or directory: {}", path.display()));
            PickerResult::None
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, keymap: &Keymap) {
        if !self.is_open {
            return;
        }
        let t = theme();
        let popup = center_popup(area, 80, area.height.saturating_mul(7) / 10);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(t.border_focused_style())
            .title(" Choose an image (.jpg .jpeg .png) ")
            .title_style(t.title_style());
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let [dir_area, input_area, list_area, note_area, hint_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(self.current_dir.to_string_lossy().into_owned()).style(t.muted_style()),
            dir_area,
        );

        frame.render_text_input_widget(
            TextInputWidget::new(&self.path_input)
                .title("Path")
                .focused(self.focus == PickerFocus::PathInput),
            input_area,
        );

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                let style = match entry {
                    PickerEntry::File(_) => t.text_style(),
                    _ => t.emphasis_style(),
                };
                ListItem::new(entry.label()).style(style)
            })
            .collect();
        let list_border = if self.focus == PickerFocus::List {
            t.border_focused_style()
        } else {
            t.border_style()
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(list_border)
                    .title(" Files "),
            )
            .highlight_style(t.highlight_style())
            .highlight_symbol(LIST_HIGHLIGHT_SYMBOL);
        frame.render_stateful_widget(list, list_area, &mut self.list_state);

        if let Some(note) = &self.note {
            frame.render_widget(Paragraph::new(note.as_str()).style(t.error_style()), note_area);
        }

        let hints = keymap.hints(&[Action::NextField, Action::Confirm, Action::Cancel]);
        frame.render_widget(
            Paragraph::new(Line::from(hints)).style(t.muted_style()),
            hint_area,
        );
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
