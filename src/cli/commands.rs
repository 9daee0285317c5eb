//! Command dispatch: wires settings, the file-backed store and the chart together.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::{
    ChartEvent, FlavorWheel, FrameDriver, Navigation, Progress, ToggleOutcome,
};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::tree_display::TreeNodeConvert;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::{
    FileDataSource, FileStore, FileSystem, InfraError, KeyValueStore, RealFileSystem, SystemClock,
};

/// Pause between animation frames of `view`.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree) => _tree(cli),
        Some(Commands::Layout) => _layout(cli),
        Some(Commands::Toggle { path }) => _toggle(cli, path),
        Some(Commands::Status) => _status(cli),
        Some(Commands::Reset) => _reset(cli),
        Some(Commands::View { focus }) => _view(cli, focus.as_deref()),
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

fn dataset_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.dataset_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e).into()),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = dataset_dir(cli)?;
    Ok(Settings::load(Some(&dir))?)
}

#[instrument(level = "debug", skip_all)]
fn open_chart(settings: &Settings) -> CliResult<FlavorWheel> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let source = FileDataSource::new(fs.clone(), settings.data_source.clone());
    let store: Arc<dyn KeyValueStore> =
        Arc::new(FileStore::new(fs, settings.store_path.clone()));
    debug!(
        "data_source: {}, store: {}",
        settings.data_source.display(),
        settings.store_path.display()
    );
    Ok(FlavorWheel::load(&settings.chart_options(), &source, store)?)
}

fn resolve(chart: &FlavorWheel, path: &str) -> CliResult<generational_arena::Index> {
    chart
        .find(path)
        .ok_or_else(|| CliError::UnknownPath(path.to_string()))
}

#[instrument(skip(cli))]
fn _tree(cli: &Cli) -> CliResult<()> {
    let chart = open_chart(&load_settings(cli)?)?;
    output::info(&chart.tree().to_tree_string());
    Ok(())
}

#[instrument(skip(cli))]
fn _layout(cli: &Cli) -> CliResult<()> {
    let chart = open_chart(&load_settings(cli)?)?;
    let tree = chart.tree();
    for (idx, node) in tree.iter() {
        let e = node.layout;
        output::info(&format!(
            "{:<48} angle {:>7.4}..{:<7.4} ring {:.0}..{:.0}",
            tree.path_of(idx),
            e.angle_start,
            e.angle_end,
            e.radius_start,
            e.radius_end
        ));
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _toggle(cli: &Cli, path: &str) -> CliResult<()> {
    let mut chart = open_chart(&load_settings(cli)?)?;
    let idx = resolve(&chart, path)?;
    chart.drain_events();

    match chart.toggle_leaf(idx) {
        ToggleOutcome::Added(branch) => output::action("Selected", &format!("{path} ({branch})")),
        ToggleOutcome::Removed(branch) => {
            output::action("Deselected", &format!("{path} ({branch})"))
        }
        ToggleOutcome::Replaced(branch) => {
            output::action("Replaced", &format!("{path} ({branch})"))
        }
        ToggleOutcome::Blocked => {
            output::warning("select an aroma before rating taste");
            return Ok(());
        }
        ToggleOutcome::Unclassified => {
            output::warning(&format!("{path} is outside the aroma, taste and color branches"));
            return Ok(());
        }
        ToggleOutcome::NotALeaf => {
            return Err(CliError::InvalidArgs(format!("{path} is not a leaf")));
        }
    }

    for event in chart.drain_events() {
        match event {
            ChartEvent::TestComplete => output::success("Test complete"),
            ChartEvent::TestIncomplete => output::warning("Test no longer complete"),
            other => debug!("event: {:?}", other),
        }
    }
    print_progress(&chart.progress());
    Ok(())
}

#[instrument(skip(cli))]
fn _status(cli: &Cli) -> CliResult<()> {
    let chart = open_chart(&load_settings(cli)?)?;
    let selection = chart.selection();

    output::header("Aroma");
    for path in selection.aroma() {
        output::detail(path);
    }
    output::header("Taste");
    for (category, path) in selection.flavor() {
        output::detail(&format!("{category}: {}", path.name().unwrap_or_default()));
    }
    output::header("Color");
    if let Some(path) = selection.color() {
        output::detail(path);
    }
    println!();
    print_progress(&chart.progress());
    Ok(())
}

fn print_progress(progress: &Progress) {
    output::header(&format!(
        "Progress: {}/{} categories",
        progress.satisfied, progress.required
    ));
    if progress.aroma {
        output::success_detail("aroma");
    } else {
        output::failure("aroma");
    }
    if !progress.missing.is_empty() {
        output::failure(&format!("taste: {}", progress.missing.iter().join(", ")));
    }
    if progress.color {
        output::success_detail("color");
    } else {
        output::failure("color");
    }
    if progress.complete {
        output::success("Complete");
    }
}

#[instrument(skip(cli))]
fn _reset(cli: &Cli) -> CliResult<()> {
    let mut chart = open_chart(&load_settings(cli)?)?;
    chart.reset();
    output::success("Selections cleared");
    Ok(())
}

#[instrument(skip(cli))]
fn _view(cli: &Cli, focus: Option<&str>) -> CliResult<()> {
    let mut chart = open_chart(&load_settings(cli)?)?;
    let mut driver = FrameDriver::new(Arc::new(SystemClock::default()));

    if let Some(path) = focus {
        let target = resolve(&chart, path)?;
        // root first; the root itself is the initial focus
        let steps: Vec<_> = chart.tree().ancestors(target).into_iter().rev().skip(1).collect();
        for step in steps {
            match chart.drill(step) {
                Navigation::Started => {
                    driver.run_until_idle(&mut chart, || thread::sleep(FRAME_INTERVAL))
                }
                Navigation::Ignored => {
                    return Err(CliError::InvalidArgs(format!(
                        "{} cannot be focused",
                        chart.tree().path_of(step)
                    )));
                }
                Navigation::Busy => debug!("transition still running"),
            }
        }
    }

    output::header(&format!("Focus: {}", chart.tree().path_of(chart.focus())));
    for view in chart.views().into_iter().filter(|v| v.is_visible) {
        let label = if view.label_visible {
            format!("{} @ {}", view.label, view.label_transform)
        } else {
            "-".to_string()
        };
        output::info(&format!(
            "{:<48} opacity {:.1}  {}",
            view.path,
            view.opacity_tier.opacity(),
            label
        ));
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let describe = |path: &std::path::Path| {
                let state = if path.exists() { "exists" } else { "not found" };
                format!("{} ({state})", path.display())
            };
            match global_config_path() {
                Some(path) => output::action("Global", &describe(&path)),
                None => output::action("Global", "unavailable"),
            }
            output::action("Local", &describe(&local_config_path(&dataset_dir(cli)?)));
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
