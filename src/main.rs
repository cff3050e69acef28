use std::cell::RefCell;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use cfo_theme::app::{
    FontFamily, JsonFileStorage, PlatformSchemeSource, PreferenceStore, Preferences, StoreConfig,
    ThemeMode,
};
use cfo_theme::ui::root::{ACTIVE_FONT_PROPERTY, DocumentRoot, THEME_COLOR_META};

#[derive(Parser)]
#[command(name = "cfo-theme", version, about = "Inspect and change dashboard appearance preferences")]
struct Cli {
    /// Store config (TOML). Defaults to the user config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Preference file (JSON). Defaults to the user config dir.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current preferences and the attributes they produce
    Show,
    /// Set the theme mode: light, dark or system
    SetTheme { mode: ThemeMode },
    /// Set the font family
    SetFont { font: FontFamily },
    /// Advance to the next theme mode
    CycleTheme,
    /// Advance to the next font family
    CycleFont,
    /// List the available font families
    Fonts,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(StoreConfig::get_config_path);
    let config = StoreConfig::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let storage = match cli.store {
        Some(path) => JsonFileStorage::open(path),
        None => JsonFileStorage::open_default(),
    };
    tracing::debug!(path = %storage.path().display(), "using preference file");

    let root = DocumentRoot::shared(config.attribute.clone());
    let store = PreferenceStore::mount(
        config,
        storage,
        root.clone(),
        Rc::new(PlatformSchemeSource::new()),
    );

    let stdout = std::io::stdout();
    run(
        cli.command.unwrap_or(Command::Show),
        &store,
        &root,
        &mut stdout.lock(),
    )
}

/// Apply one command to a mounted store and print the outcome.
fn run(
    command: Command,
    store: &PreferenceStore,
    root: &RefCell<DocumentRoot>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Show => {}
        Command::SetTheme { mode } => store.set_theme(mode),
        Command::SetFont { font } => store.set_font_family(font),
        Command::CycleTheme => {
            store.cycle_theme();
        }
        Command::CycleFont => {
            store.cycle_font();
        }
        Command::Fonts => {
            for font in FontFamily::all() {
                let marker = if *font == store.font() { "*" } else { " " };
                writeln!(
                    out,
                    "{marker} {:<12} {:<12} {}",
                    font.as_str(),
                    font.display_name(),
                    font.description()
                )?;
            }
            return Ok(());
        }
    }

    let state = store.state();
    let follow = if store.config().enable_system { "on" } else { "off" };
    writeln!(out, "theme:    {}", state.mode)?;
    writeln!(out, "resolved: {}", state.resolved_theme())?;
    writeln!(out, "system:   {} (following {follow})", state.system_scheme)?;
    writeln!(out, "font:     {} ({})", state.font, state.font.display_name())?;

    // The store writes to the root while handling the command; read it afterwards.
    let root = root.borrow();
    let classes: Vec<&str> = root.classes().collect();
    writeln!(out, "classes:  {}", classes.join(" "))?;
    if let Some(color) = root.meta_content(THEME_COLOR_META) {
        writeln!(out, "meta:     {THEME_COLOR_META}={color}")?;
    }
    if let Some(value) = root.style_property(ACTIVE_FONT_PROPERTY) {
        writeln!(out, "style:    {ACTIVE_FONT_PROPERTY}: {value}")?;
    }

    Ok(())
}
