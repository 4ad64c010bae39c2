//! trailmark entrypoint.
//!
//! Opens the given files, turns the trailing newline indicator on (per document
//! or globally), applies an optional command script and prints the active
//! document with its margin.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::execute_line;
use core_config::{Config, ConfigOverrides, load_from};
use core_events::TracingEventHooks;
use core_model::EditorModel;
use core_render::{StatusContext, compose, compose_status, format_status, to_plain, write_styled};
use core_trailing::{GlyphOptions, ToggleArg};
use crossterm::tty::IsTty;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "trailmark.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "trailmark", version, about = "Trailing newline margin indicator")]
struct Args {
    /// Files to open; the last one opened becomes the active document.
    pub files: Vec<PathBuf>,
    /// Configuration file path (overrides discovery of `trailmark.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Marker text drawn in the margin.
    #[arg(long = "glyph")]
    pub glyph: Option<String>,
    /// Never append the next line number to the marker.
    #[arg(long = "no-line-number")]
    pub no_line_number: bool,
    /// Enable global mode instead of per-document mode.
    #[arg(long = "global")]
    pub global: bool,
    /// Command script, one `:command` per line.
    #[arg(long = "script")]
    pub script: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            glyph: self.glyph.clone(),
            show_line_number: self.no_line_number.then_some(false),
            global: self.global.then_some(true),
            line_numbers: None,
        }
    }
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

/// Build the model from configuration and open the requested files.
fn bootstrap(config: &Config, files: &[PathBuf]) -> EditorModel {
    let options = GlyphOptions {
        marker: config.effective_glyph(),
        show_line_number: config.show_line_number(),
    };
    let mut model = EditorModel::new(options).with_hooks(Box::new(TracingEventHooks));
    model.workspace_mut().default_line_numbers = config.line_numbers();

    let mut opened = Vec::with_capacity(files.len());
    for path in files {
        match model.open_file(path) {
            Ok(doc) => opened.push(doc),
            Err(e) => error!(target: "io", path = %path.display(), error = %e, "file_open_error"),
        }
    }

    if config.global() {
        model.toggle_global(ToggleArg::Enable);
    } else {
        for doc in &opened {
            model.toggle_trailing(*doc, ToggleArg::Enable);
        }
    }
    info!(
        target: "runtime.startup",
        opened = opened.len(),
        requested = files.len(),
        global = config.global(),
        "bootstrap_complete"
    );
    model
}

/// Apply script lines in order. Blank lines and `#` comments are skipped.
/// Returns the last status message and whether a quit was requested.
fn run_script(model: &mut EditorModel, script: &str) -> (Option<String>, bool) {
    let mut last_message = None;
    for line in script.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let res = execute_line(line, model);
        if let Some(msg) = res.message {
            last_message = Some(msg);
        }
        if res.quit {
            return (last_message, true);
        }
    }
    (last_message, false)
}

fn status_line(model: &EditorModel, message: Option<&str>) -> Option<String> {
    let doc = model.active()?;
    let document = model.workspace().document(doc)?;
    let ctx = StatusContext {
        mode: &document.mode,
        name: document.name(),
        file_name: document.path.as_deref(),
        dirty: document.dirty,
        line: document.cursor_line,
        line_count: document.buffer.line_count(),
        trailing_enabled: model.decorator().is_enabled(doc),
        global_enabled: model.decorator().global_enabled(),
        message,
    };
    Some(format_status(&compose_status(&ctx)))
}

fn print_active<W: Write>(out: &mut W, model: &EditorModel, message: Option<&str>, styled: bool) -> Result<()> {
    let Some(view) = model.active().and_then(|doc| compose(model.workspace(), doc)) else {
        if let Some(msg) = message {
            writeln!(out, "{msg}")?;
        }
        return Ok(());
    };
    if styled {
        write_styled(out, &view)?;
    } else {
        for row in to_plain(&view) {
            writeln!(out, "{row}")?;
        }
    }
    if let Some(status) = status_line(model, message) {
        writeln!(out, "{status}")?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let mut config = load_from(args.config.clone())?;
    config.apply_overrides(&args.overrides());

    let mut model = bootstrap(&config, &args.files);

    let (message, quit) = match args.script.as_ref() {
        Some(path) => {
            let script = std::fs::read_to_string(path)
                .with_context(|| format!("reading script {}", path.display()))?;
            run_script(&mut model, &script)
        }
        None => (None, false),
    };
    if quit {
        warn!(target: "runtime", "script_quit_before_render");
    }

    let stdout = std::io::stdout();
    let styled = stdout.is_tty();
    let mut lock = stdout.lock();
    print_active(&mut lock, &model, message.as_deref(), styled)?;

    let stats = model.stats();
    info!(
        target: "runtime",
        recomputes = stats.recomputes,
        reattachments = stats.reattachments,
        "shutdown"
    );
    drop(startup.log_guard.take());
    Ok(())
}
