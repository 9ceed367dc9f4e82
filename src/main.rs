//! Cubeview - a terminal viewer and exporter for NetCDF raster cubes.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use cubeview::app::{App, PromptKind};
use cubeview::config::{CacheConfig, ViewerConfig};
use cubeview::cube::{ReaderCache, DEFAULT_CAPACITY};
use cubeview::export::{export_layers, ExportRequest};
use cubeview::render::ColorPalette;
use cubeview::session::DisplayMode;
use cubeview::ui;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "cubeview", version)]
#[command(about = "A terminal viewer and exporter for NetCDF raster cubes", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to the NetCDF cube to open
    file: Option<PathBuf>,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,

    /// Maximum number of cached reads and rendered layers
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    cache_capacity: usize,

    /// Palette used to draw layers
    #[arg(long, value_enum, default_value_t = ColorPalette::Viridis)]
    palette: ColorPalette,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the summary of a cube
    Info {
        /// Path to the NetCDF cube
        file: PathBuf,
    },
    /// Export time layers of a cube to NetCDF (.nc) or GeoTIFF (.tif)
    Export {
        /// Path to the NetCDF cube
        file: PathBuf,

        /// Band to export
        #[arg(long)]
        band: String,

        /// Destination file
        #[arg(long)]
        out: PathBuf,

        /// Comma separated time indices (default: every layer)
        #[arg(long, value_delimiter = ',')]
        layers: Vec<usize>,

        /// Replace existing files
        #[arg(long)]
        overwrite: bool,
    },
}

impl Args {
    fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            cache: CacheConfig {
                capacity: self.cache_capacity,
                palette: self.palette,
            },
            ..ViewerConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let mut args = Args::parse();

    match args.command.take() {
        Some(Command::Info { file }) => run_info(&file),
        Some(Command::Export {
            file,
            band,
            out,
            layers,
            overwrite,
        }) => run_export(file, band, out, layers, overwrite),
        None => run_viewer(&args),
    }
}

fn init_logging(log_path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run_info(file: &Path) -> Result<()> {
    let mut reader = ReaderCache::new(1);
    let summary = reader.summary(&file.to_string_lossy())?;
    println!("{}", summary);
    Ok(())
}

fn run_export(file: PathBuf, band: String, out: PathBuf, layers: Vec<usize>, overwrite: bool) -> Result<()> {
    let mut reader = ReaderCache::new(1);
    let file_id = file.to_string_lossy().to_string();

    let time_indices = if layers.is_empty() {
        let count = reader.times(&file_id).map(|t| t.len()).unwrap_or(0);
        (0..count).collect()
    } else {
        layers
    };

    let request = ExportRequest {
        file_id,
        band,
        time_indices,
        dest: out,
        overwrite,
    };
    let summary = export_layers(&mut reader, &request)?;
    for path in summary.paths() {
        println!("{}", path.display());
    }
    Ok(())
}

fn run_viewer(args: &Args) -> Result<()> {
    // Set up logging if --log option is provided
    if let Some(log_path) = &args.log {
        init_logging(log_path)?;
        tracing::info!("Starting Cubeview");
    }

    let app = App::new(args.viewer_config(), args.file.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    if args.log.is_some() {
        tracing::info!("Cubeview exited");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Prompt mode - handle separately
        if app.prompt.is_some() {
            match key.code {
                KeyCode::Enter => app.submit_prompt(),
                KeyCode::Esc => app.cancel_prompt(),
                KeyCode::Backspace => app.prompt_backspace(),
                KeyCode::Char(c) => app.prompt_input(c),
                _ => {},
            }
            continue;
        }

        // Summary panel
        if app.show_summary {
            match (key.modifiers, key.code) {
                (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(()),
                (KeyModifiers::NONE, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
                    app.scroll_summary_down();
                },
                (KeyModifiers::NONE, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
                    app.scroll_summary_up();
                },
                (KeyModifiers::NONE, KeyCode::Char('y')) => app.copy_summary(),
                (KeyModifiers::NONE, KeyCode::Char('i')) | (KeyModifiers::NONE, KeyCode::Esc) => {
                    app.toggle_summary();
                },
                _ => {},
            }
            continue;
        }

        let step = match app.session.display_mode() {
            DisplayMode::Grid => app.config.layout.grid.columns.max(1) as isize,
            DisplayMode::Slider => 1,
        };

        // Normal mode
        match (key.modifiers, key.code) {
            // Quit
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(()),

            // Layer focus
            (KeyModifiers::NONE, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) => {
                app.move_focus(-1);
            },
            (KeyModifiers::NONE, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('l')) => {
                app.move_focus(1);
            },
            (KeyModifiers::NONE, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
                app.move_focus(-step);
            },
            (KeyModifiers::NONE, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
                app.move_focus(step);
            },

            // Selection
            (KeyModifiers::NONE, KeyCode::Char(' ')) | (KeyModifiers::NONE, KeyCode::Enter) => {
                app.toggle_focused();
            },

            // Display options
            (KeyModifiers::NONE, KeyCode::Char('b')) => app.cycle_band(true),
            (KeyModifiers::SHIFT, KeyCode::Char('B')) => app.cycle_band(false),
            (KeyModifiers::NONE, KeyCode::Char('r')) => app.open_prompt(PromptKind::ValueRange),
            (KeyModifiers::NONE, KeyCode::Char('v')) | (KeyModifiers::NONE, KeyCode::Tab) => {
                app.toggle_display_mode();
            },

            // Files
            (KeyModifiers::NONE, KeyCode::Char('o')) => app.open_prompt(PromptKind::OpenFile),
            (KeyModifiers::NONE, KeyCode::Char('e')) => app.open_prompt(PromptKind::ExportPath),
            (KeyModifiers::NONE, KeyCode::Char('w')) => app.toggle_overwrite(),

            // Panels
            (KeyModifiers::NONE, KeyCode::Char('i')) => app.toggle_summary(),
            (KeyModifiers::NONE, KeyCode::Char('s')) => app.toggle_selected_panel(),
            (KeyModifiers::NONE, KeyCode::Char('y')) => app.copy_summary(),
            (KeyModifiers::NONE, KeyCode::Char('c')) => app.copy_export_paths(),
            (KeyModifiers::SHIFT, KeyCode::Char('T')) => app.cycle_theme(),
            (KeyModifiers::SHIFT, KeyCode::Char('?')) => {
                app.status = "Help: q=quit, o=open, space=select, b=band, r=range, v=view, e=export, w=overwrite, i=info".to_string();
            },

            // Escape - close overlays
            (KeyModifiers::NONE, KeyCode::Esc) => app.close_overlay(),

            _ => {},
        }
    }
}
