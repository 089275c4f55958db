//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, LayoutArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{expand_path, global_config_path, local_config_path, Settings};
use crate::domain::{LayoutConfig, Sizing};
use crate::infrastructure::di::ServiceContainer;

/// Run the parsed command; returns the process exit code.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    let local_dir = match &cli.config_dir {
        Some(dir) => expand_path(dir),
        None => std::env::current_dir()
            .map_err(|e| CliError::Usage(format!("cannot determine working directory: {}", e)))?,
    };
    let settings = Settings::load(Some(&local_dir))?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Tree { file }) => cmd_tree(&container, file),
        Some(Commands::Roots { file }) => cmd_roots(&container, file),
        Some(Commands::Layout {
            file,
            opts,
            selected,
        }) => cmd_layout(&container, file, opts, *selected),
        Some(Commands::Select { file, opts, x, y }) => cmd_select(&container, file, opts, *x, *y),
        Some(Commands::Config { command }) => cmd_config(&container, command, &local_dir),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(crate::exitcode::OK)
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

/// Settings-derived layout with command line overrides applied.
pub fn layout_config(settings: &Settings, opts: &LayoutArgs) -> CliResult<LayoutConfig> {
    let mut config = settings.layout_config();
    if let Some(orientation) = opts.orientation {
        config.orientation = orientation;
    }
    if opts.compact {
        config.compact = true;
    }
    if opts.width.is_some() || opts.height.is_some() {
        let (width, height) = match config.sizing {
            Sizing::Fit { width, height } => (width, height),
            Sizing::NodeSize { .. } => (settings.layout.width, settings.layout.height),
        };
        config.sizing = Sizing::Fit {
            width: opts.width.unwrap_or(width),
            height: opts.height.unwrap_or(height),
        };
    }
    config
        .validate()
        .map_err(|e| CliError::InvalidArgs(e.to_string()))?;
    Ok(config)
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, file: &Path) -> CliResult<i32> {
    let instances = container.feed.load_instances(&expand_path(file))?;
    if instances.is_empty() {
        output::warning("no instances, nothing to render");
        return Ok(crate::exitcode::OK);
    }
    let rendered = container.feed.render_tree(&instances)?;
    print!("{}", rendered);
    Ok(crate::exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_roots(container: &ServiceContainer, file: &Path) -> CliResult<i32> {
    let instances = container.feed.load_instances(&expand_path(file))?;
    let roots = container.feed.roots(&instances)?;
    if roots.len() > 1 {
        output::warning(&format!("{} roots, only the first is laid out", roots.len()));
    }
    for root in roots {
        output::data(&format!("{}\t{}", root.id, root.label));
    }
    Ok(crate::exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_layout(
    container: &ServiceContainer,
    file: &Path,
    opts: &LayoutArgs,
    selected: Option<u64>,
) -> CliResult<i32> {
    let config = layout_config(&container.settings, opts)?;
    let instances = container.feed.load_instances(&expand_path(file))?;
    let view = container.feed.layout_view(
        &instances,
        config,
        selected,
        container.settings.render.label_max_chars,
    )?;
    debug!("layout: {} nodes, {} edges", view.nodes.len(), view.edges.len());
    let json = serde_json::to_string_pretty(&view).map_err(|e| {
        CliError::Usage(format!("cannot serialize layout: {}", e))
    })?;
    output::data(&json);
    Ok(crate::exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_select(
    container: &ServiceContainer,
    file: &Path,
    opts: &LayoutArgs,
    x: f64,
    y: f64,
) -> CliResult<i32> {
    let config = layout_config(&container.settings, opts)?;
    let instances = container.feed.load_instances(&expand_path(file))?;
    let radius = container.settings.render.node_radius;
    match container.feed.select_at(&instances, config, x, y, radius)? {
        Some(instance) => {
            output::field("Selected", &instance);
            Ok(crate::exitcode::OK)
        }
        None => {
            output::warning(&format!("no instance at ({}, {})", x, y));
            Ok(crate::exitcode::NOTFOUND)
        }
    }
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    local_dir: &Path,
) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => {
            output::data(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<unavailable>".to_string());
            output::field("global", &global);
            output::field("local", &local_config_path(local_dir).display());
        }
    }
    Ok(crate::exitcode::OK)
}

