//! Application state and logic.

use std::path::PathBuf;

use crate::clipboard;
use crate::config::ViewerConfig;
use crate::cube::{CubeOpener, CubeStore};
use crate::export::{export_layers, ExportRequest, ExportSummary};
use crate::render::ValueRange;
use crate::session::SelectionState;

/// Application theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Gruvbox dark theme.
    GruvboxDark,
    /// Gruvbox light theme.
    GruvboxLight,
}

impl Theme {
    /// Get the next theme in the cycle.
    pub fn next(self) -> Self {
        match self {
            Theme::GruvboxDark => Theme::GruvboxLight,
            Theme::GruvboxLight => Theme::GruvboxDark,
        }
    }

    /// Get the theme name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::GruvboxDark => "Gruvbox Dark",
            Theme::GruvboxLight => "Gruvbox Light",
        }
    }
}

/// Which text field a prompt fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Path of the cube to open.
    OpenFile,
    /// Display range as `min max`.
    ValueRange,
    /// Export destination; submitting runs the export.
    ExportPath,
}

impl PromptKind {
    /// Label shown in front of the input.
    pub fn label(self) -> &'static str {
        match self {
            PromptKind::OpenFile => "Open file",
            PromptKind::ValueRange => "Value range (min max)",
            PromptKind::ExportPath => "Output file (.nc or .tif)",
        }
    }
}

/// An open text prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Field being edited.
    pub kind: PromptKind,
    /// Current input.
    pub buffer: String,
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Startup configuration.
    pub config: ViewerConfig,
    /// Cached reads and renders.
    pub store: CubeStore,
    /// Selection state of this session.
    pub session: SelectionState,
    /// Open prompt, if any.
    pub prompt: Option<Prompt>,
    /// Focused layer.
    pub focus: usize,
    /// Replace existing export targets.
    pub overwrite: bool,
    /// Last export destination.
    pub output_path: Option<PathBuf>,
    /// Files written by the last successful export.
    pub last_export: Option<ExportSummary>,
    /// Status message.
    pub status: String,
    /// Current theme.
    pub theme: Theme,
    /// Summary panel visible.
    pub show_summary: bool,
    /// Summary panel scroll offset.
    pub summary_scroll: u16,
    /// Selected-layers panel visible.
    pub show_selected: bool,
}

impl App {
    /// Create a new application instance, optionally loading a file.
    pub fn new(config: ViewerConfig, file: Option<PathBuf>) -> Self {
        let store = CubeStore::new(&config.cache);
        Self::with_store(config, store, file)
    }

    /// Create an application reading cubes through `opener`.
    pub fn with_opener(config: ViewerConfig, opener: Box<dyn CubeOpener>, file: Option<PathBuf>) -> Self {
        let store = CubeStore::with_opener(&config.cache, opener);
        Self::with_store(config, store, file)
    }

    fn with_store(config: ViewerConfig, store: CubeStore, file: Option<PathBuf>) -> Self {
        let mut app = Self {
            config,
            store,
            session: SelectionState::new(),
            prompt: None,
            focus: 0,
            overwrite: false,
            output_path: None,
            last_export: None,
            status: "Ready".to_string(),
            theme: Theme::GruvboxDark,
            show_summary: false,
            summary_scroll: 0,
            show_selected: false,
        };

        match file {
            Some(path) => app.load_file(&path.to_string_lossy()),
            None => app.open_prompt(PromptKind::OpenFile),
        }

        app
    }

    /// Load a cube into the session.
    pub fn load_file(&mut self, file_id: &str) {
        let file_id = file_id.trim();
        if file_id.is_empty() {
            self.status = "No file given".to_string();
            return;
        }

        let same_file = self.session.active_file() == Some(file_id);
        match self.session.load_file(self.store.reader(), file_id) {
            Ok(()) => {
                if !same_file {
                    self.focus = 0;
                    self.summary_scroll = 0;
                }
                self.status = format!("{} loaded ({} layers)", file_id, self.session.times().len());
            },
            Err(e) => {
                self.focus = 0;
                self.status = format!("Error loading file: {}", e);
            },
        }
    }

    /// Active file, if any.
    pub fn active_file(&self) -> Option<&str> {
        self.session.active_file()
    }

    /// Number of layers of the loaded cube.
    pub fn layer_count(&self) -> usize {
        self.session.layer_count().unwrap_or(0)
    }

    /// Switch to the next (`forward`) or previous band.
    pub fn cycle_band(&mut self, forward: bool) {
        let bands = self.session.bands();
        if bands.is_empty() {
            self.status = "No file loaded".to_string();
            return;
        }
        let current = self
            .session
            .band()
            .and_then(|b| bands.iter().position(|name| name == b))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % bands.len()
        } else {
            (current + bands.len() - 1) % bands.len()
        };
        let band = bands[next].clone();

        match self.session.set_display_options(
            &band,
            self.session.value_range(),
            self.session.display_mode(),
        ) {
            Ok(()) => self.status = format!("Band: {}", band),
            Err(e) => self.status = e.to_string(),
        }
    }

    /// Parse and apply a `min max` display range.
    pub fn set_value_range(&mut self, text: &str) {
        let Some(range) = ValueRange::parse(text) else {
            self.status = format!("Invalid range '{}': expected 'min max' with min <= max", text.trim());
            return;
        };
        let Some(band) = self.session.band().map(str::to_string) else {
            self.status = "No file loaded".to_string();
            return;
        };
        match self
            .session
            .set_display_options(&band, range, self.session.display_mode())
        {
            Ok(()) => self.status = format!("Range: {}", range),
            Err(e) => self.status = e.to_string(),
        }
    }

    /// Switch between grid and slider layouts.
    pub fn toggle_display_mode(&mut self) {
        let Some(band) = self.session.band().map(str::to_string) else {
            self.status = "No file loaded".to_string();
            return;
        };
        let mode = self.session.display_mode().toggle();
        match self
            .session
            .set_display_options(&band, self.session.value_range(), mode)
        {
            Ok(()) => self.status = format!("View: {}", mode.name()),
            Err(e) => self.status = e.to_string(),
        }
    }

    /// Move the layer focus by `delta`, staying in range.
    pub fn move_focus(&mut self, delta: isize) {
        let count = self.layer_count();
        if count == 0 {
            return;
        }
        self.focus = self.focus.saturating_add_signed(delta).min(count - 1);
    }

    /// Check or uncheck the focused layer.
    pub fn toggle_focused(&mut self) {
        let index = self.focus;
        let value = !self.session.is_selected(index);
        match self.session.toggle_select(index, value) {
            Ok(()) => {
                let label = self.session.times().get(index).cloned().unwrap_or_default();
                self.status = format!(
                    "{} {}",
                    if value { "Selected" } else { "Unselected" },
                    label
                );
            },
            Err(e) => self.status = e.to_string(),
        }
    }

    /// Toggle replacing existing export targets.
    pub fn toggle_overwrite(&mut self) {
        self.overwrite = !self.overwrite;
        self.status = format!("Overwrite: {}", if self.overwrite { "ON" } else { "OFF" });
    }

    /// Export the effective selection of the active band to `dest`.
    pub fn export(&mut self, dest: &str) {
        let dest = dest.trim();
        let (Some(file_id), Some(band)) = (self.session.active_file(), self.session.band()) else {
            self.status = "No file loaded".to_string();
            return;
        };
        if dest.is_empty() {
            self.status = "No output file given".to_string();
            return;
        }

        let request = ExportRequest {
            file_id: file_id.to_string(),
            band: band.to_string(),
            time_indices: self.session.effective_selection(),
            dest: PathBuf::from(dest),
            overwrite: self.overwrite,
        };
        self.output_path = Some(request.dest.clone());

        match export_layers(self.store.reader(), &request) {
            Ok(summary) => {
                self.status = format!("Success! {}", summary);
                self.last_export = Some(summary);
            },
            Err(e) => {
                tracing::warn!("Export to {} failed: {}", dest, e);
                self.status = e.to_string();
            },
        }
    }

    /// Summary of the active cube, or the reason it could not be read.
    pub fn summary_text(&mut self) -> String {
        let Some(file_id) = self.session.active_file().map(str::to_string) else {
            return "No file loaded".to_string();
        };
        match self.store.reader().summary(&file_id) {
            Ok(summary) => summary,
            Err(e) => e.to_string(),
        }
    }

    /// Copy the cube summary to the clipboard.
    pub fn copy_summary(&mut self) {
        if self.session.active_file().is_none() {
            self.status = "No file loaded".to_string();
            return;
        }
        let text = self.summary_text();
        match clipboard::copy_text(&text) {
            Ok(()) => self.status = "Summary copied!".to_string(),
            Err(e) => self.status = format!("Copy failed: {}", e),
        }
    }

    /// Copy the paths of the last export to the clipboard.
    pub fn copy_export_paths(&mut self) {
        let Some(summary) = &self.last_export else {
            self.status = "Nothing exported yet".to_string();
            return;
        };
        match clipboard::copy_export_paths(summary) {
            Ok(()) => self.status = "Export paths copied!".to_string(),
            Err(e) => self.status = format!("Copy failed: {}", e),
        }
    }

    /// Toggle the summary panel.
    pub fn toggle_summary(&mut self) {
        self.show_summary = !self.show_summary;
        self.summary_scroll = 0;
        if self.show_summary {
            self.show_selected = false;
        }
    }

    /// Toggle the selected-layers panel.
    pub fn toggle_selected_panel(&mut self) {
        self.show_selected = !self.show_selected;
        if self.show_selected {
            self.show_summary = false;
        }
    }

    /// Scroll the summary panel down.
    pub fn scroll_summary_down(&mut self) {
        self.summary_scroll = self.summary_scroll.saturating_add(1);
    }

    /// Scroll the summary panel up.
    pub fn scroll_summary_up(&mut self) {
        self.summary_scroll = self.summary_scroll.saturating_sub(1);
    }

    /// Cycle to the next theme.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.status = format!("Theme: {}", self.theme.name());
    }

    /// Open a prompt, pre-filled with the field's current value.
    pub fn open_prompt(&mut self, kind: PromptKind) {
        let buffer = match kind {
            PromptKind::OpenFile => self.session.active_file().unwrap_or_default().to_string(),
            PromptKind::ValueRange => {
                let range = self.session.value_range();
                format!("{} {}", range.min(), range.max())
            },
            PromptKind::ExportPath => self
                .output_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        };
        self.prompt = Some(Prompt { kind, buffer });
    }

    /// Type a character into the open prompt.
    pub fn prompt_input(&mut self, c: char) {
        if let Some(prompt) = &mut self.prompt {
            prompt.buffer.push(c);
        }
    }

    /// Delete the last character of the open prompt.
    pub fn prompt_backspace(&mut self) {
        if let Some(prompt) = &mut self.prompt {
            prompt.buffer.pop();
        }
    }

    /// Close the open prompt without applying it.
    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    /// Close the open prompt and apply its value.
    pub fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        match prompt.kind {
            PromptKind::OpenFile => self.load_file(&prompt.buffer),
            PromptKind::ValueRange => self.set_value_range(&prompt.buffer),
            PromptKind::ExportPath => self.export(&prompt.buffer),
        }
    }

    /// Close any open panels and prompts.
    pub fn close_overlay(&mut self) {
        self.prompt = None;
        self.show_summary = false;
        self.show_selected = false;
    }
}
