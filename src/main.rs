//! beelabel terminal front end.

mod cli;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;

use beelabel::config::AppConfig;
use beelabel::constants::PREVIEW_FILENAME;
use beelabel::format::{ExportOptions, ExporterRegistry, LabelExporter};
use beelabel::keybindings::{Action, KeyBindings, KeyCode, key_to_string};
use beelabel::model::LabelAction;
use beelabel::render::write_preview;
use beelabel::state::{
    FilePersister, Navigation, Session, SessionError, StatePersister, total_stops,
};
use cli::{Cli, Command, LabelArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::load_from_default_path().unwrap_or_default(),
    };

    let level = config.preferences.log_level.raised_by(cli.verbose);
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.to_level_filter().as_str()),
    )
    .init();

    if let Command::Config { write } = cli.command {
        return show_config(&config, write, cli.config.as_deref());
    }

    let state_dir = cli
        .state_dir
        .clone()
        .or_else(|| config.preferences.resolved_state_dir())
        .context("Could not determine a state directory; pass --state-dir")?;
    let session_id = cli
        .session
        .clone()
        .unwrap_or_else(|| config.preferences.session_id.clone());
    let persister = FilePersister::new(&state_dir, &session_id);
    log::debug!("Session '{}' at {:?}", session_id, persister.dir());

    match cli.command {
        Command::Label(args) => label(args, persister, &config),
        Command::Export {
            format,
            output,
            no_images,
        } => {
            let session = Session::restore(persister)?;
            let format = format.unwrap_or_else(|| session.default_export_format().to_string());
            let options = ExportOptions::new().include_images(!no_images);
            export(&session, &format, output, &options, &config)
        }
        Command::Status => status(persister),
        Command::Reset => reset(persister, &session_id),
        Command::Config { .. } => Ok(()),
    }
}

fn open_session(args: &LabelArgs, persister: FilePersister) -> Result<Session<FilePersister>> {
    let source = args.source.image_source(args.recursive);

    let session = match source {
        Some(source) if args.fresh => Session::load(&source, persister),
        Some(source) => Session::open(&source, persister).inspect(|session| {
            if session.is_resumed() {
                println!(
                    "Resuming saved session; use --fresh to start over from {}",
                    source.describe()
                );
            }
        }),
        None if args.fresh => {
            bail!("--fresh needs a source (--zip, --folder, --listing or --files)")
        }
        None => Session::restore(persister),
    };

    match session {
        Err(SessionError::NothingToResume) => {
            bail!("No saved session; choose a source with --zip, --folder, --listing or --files")
        }
        other => Ok(other?),
    }
}

fn label(args: LabelArgs, persister: FilePersister, config: &AppConfig) -> Result<()> {
    let mut session = open_session(&args, persister)?;
    let bindings = &config.keybindings;
    let preview = args
        .preview
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join(PREVIEW_FILENAME));

    if let Some(start) = args.start {
        session.jump_to(start.saturating_sub(1));
    }

    println!("{}", bindings.help_line());
    println!("Label names (garbage, normal, atypical, discard) can be typed too.");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        show(&session, bindings, &preview);
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let action = match KeyCode::from_token(&line) {
            Some(key) => match bindings.action_for_key(key) {
                Some(action) => action,
                None => {
                    println!("'{}' is not bound", key_to_string(key));
                    continue;
                }
            },
            // Label names work regardless of the bindings
            None => match line.parse::<LabelAction>() {
                Ok(action) => Action::Label(action),
                Err(e) => {
                    println!("Unknown key: {}", e);
                    continue;
                }
            },
        };

        match action {
            Action::Label(action) => {
                if let Err(e) = session.apply(action) {
                    println!("Label not saved: {}", e);
                }
            }
            Action::Previous => {
                session.retreat();
            }
            Action::Next => {
                if let Navigation::Complete { labeled, total } = session.advance() {
                    println!("All done! {} of {} labeled.", labeled, total);
                    println!(
                        "Press {} to export or {} to quit.",
                        key_to_string(bindings.export),
                        key_to_string(bindings.quit)
                    );
                }
            }
            Action::Export => {
                let format = session.default_export_format();
                if let Err(e) = export(&session, format, None, &ExportOptions::default(), config) {
                    println!("Export failed: {:#}", e);
                }
            }
            Action::Quit => break,
        }
    }

    println!(
        "Labeled {} of {}. Progress is saved.",
        session.labels().count(),
        session.total()
    );
    Ok(())
}

fn show(session: &Session<FilePersister>, bindings: &KeyBindings, preview: &Path) {
    let view = session.view();

    println!();
    println!("{}  [{}]", view.item.name, view.label_key);
    println!("{}", view.progress());

    let buttons: Vec<String> = LabelAction::ALL
        .into_iter()
        .map(|action| {
            let key = key_to_string(bindings.key_for_label(action));
            if view.is_highlighted(action) {
                format!("[{} {}]", key, action.name().to_uppercase())
            } else {
                format!(" {} {} ", key, action.name())
            }
        })
        .collect();
    println!("{}", buttons.join(" "));

    match write_preview(&view.item.source, view.bbox.as_ref(), preview) {
        Ok(()) => println!("Preview: {}", preview.display()),
        Err(e) => println!("Preview unavailable: {}", e),
    }
}

fn export(
    session: &Session<FilePersister>,
    format: &str,
    output: Option<PathBuf>,
    options: &ExportOptions,
    config: &AppConfig,
) -> Result<()> {
    let registry = ExporterRegistry::new();
    let exporter: &dyn LabelExporter = registry.get(format).with_context(|| {
        format!(
            "Unknown export format '{}' (available: {})",
            format,
            registry.ids().join(", ")
        )
    })?;

    let path = output.unwrap_or_else(|| {
        let name = exporter.default_filename(chrono::Local::now().date_naive());
        match &config.preferences.export_folder {
            Some(folder) => folder.join(name),
            None => PathBuf::from(name),
        }
    });

    let result = session
        .export(exporter, &path, options)
        .with_context(|| {
            format!(
                "{} export to {} failed",
                exporter.display_name(),
                path.display()
            )
        })?;

    for warning in &result.warnings {
        println!("Warning: {}", warning);
    }
    println!(
        "Exported {} labels for {} items to {}",
        result.labels_exported,
        result.items_exported,
        path.display()
    );
    Ok(())
}

fn status(persister: FilePersister) -> Result<()> {
    let Some(state) = persister.load()? else {
        println!("No saved session at {}", persister.dir().display());
        return Ok(());
    };

    let total = total_stops(&state.items);
    println!("Session: {}", persister.dir().display());
    println!("Items: {} ({} to label)", state.items.len(), total);
    println!("Labeled: {}/{}", state.labels.count(), total);
    for (category, count) in state.labels.tally() {
        println!("  {:<9} {}", category.name(), count);
    }
    Ok(())
}

fn reset(persister: FilePersister, session_id: &str) -> Result<()> {
    match Session::restore(persister.clone()) {
        Ok(session) => {
            session.reset()?;
        }
        Err(SessionError::NothingToResume) => {
            println!("Nothing saved for session '{}'", session_id);
            return Ok(());
        }
        Err(e) => {
            log::warn!("Saved state is unreadable ({}); clearing it anyway", e);
            let mut persister = persister;
            persister.clear()?;
        }
    }
    println!("Session '{}' reset", session_id);
    Ok(())
}

fn show_config(config: &AppConfig, write: bool, path: Option<&Path>) -> Result<()> {
    println!("{}", config.to_json()?);
    if !write {
        return Ok(());
    }

    let path = match path {
        Some(path) => path.to_path_buf(),
        None => AppConfig::default_path()
            .context("Could not determine a config path; pass --config")?,
    };
    config
        .save_to_path(&path)
        .with_context(|| format!("Failed to write config {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
