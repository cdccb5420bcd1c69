//! Command dispatch

use std::io::{self, BufRead, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{Action, SessionEvent, TreemapSession};
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{HashedPalette, Point, Rect, Rgb, Tile, TreeDisplay, WeightedTree};
use crate::infrastructure::{FileSystemSource, InfraError};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    match &cli.command {
        Some(Commands::Layout {
            path,
            width,
            height,
        }) => cmd_layout(
            &settings,
            path.as_deref(),
            viewport(&settings, *width, *height),
        ),
        Some(Commands::Hit {
            path,
            x,
            y,
            width,
            height,
        }) => cmd_hit(
            &settings,
            path,
            Point::new(*x, *y),
            viewport(&settings, *width, *height),
        ),
        Some(Commands::Tree { path }) => cmd_tree(&settings, path.as_deref()),
        Some(Commands::Session { path }) => cmd_session(&settings, path.as_deref()),
        Some(Commands::Config) => cmd_config(&settings),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

fn dataset<'a>(settings: &'a Settings, path: Option<&'a Path>) -> CliResult<&'a Path> {
    path.or(settings.dataset.as_deref()).ok_or_else(|| {
        CliError::Usage("no dataset given and none configured".to_string())
    })
}

fn load_tree(settings: &Settings, path: &Path) -> CliResult<WeightedTree> {
    let tags = HashedPalette::new(settings.palette_seed);
    Ok(FileSystemSource::new(path).load(tags)?)
}

/// Root rectangle at the origin; missing dimensions come from the settings.
pub fn viewport(settings: &Settings, width: Option<u32>, height: Option<u32>) -> Rect {
    Rect::new(
        0,
        0,
        width.unwrap_or(settings.viewport.width),
        height.unwrap_or(settings.viewport.height),
    )
}

fn write_err(e: io::Error) -> CliError {
    CliError::Infra(InfraError::io("write output", e))
}

/// `x y width height tag weight path`
pub fn format_tile(tree: &WeightedTree, tile: &Tile, separator: &str) -> CliResult<String> {
    let node = tree.node(tile.node)?;
    let Rect {
        x,
        y,
        width,
        height,
    } = tile.rect;
    Ok(format!(
        "{} {} {} {} {} {} {}",
        x,
        y,
        width,
        height,
        node.tag(),
        node.weight(),
        tree.path_string(tile.node, separator)?
    ))
}

#[instrument(skip(settings))]
fn cmd_layout(settings: &Settings, path: Option<&Path>, rect: Rect) -> CliResult<()> {
    let tree = load_tree(settings, dataset(settings, path)?)?;
    let tiles = tree.layout(rect);
    debug!("{} tiles", tiles.len());
    for tile in &tiles {
        output::info(&format_tile(&tree, tile, &settings.separator)?);
    }
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_hit(settings: &Settings, path: &Path, point: Point, rect: Rect) -> CliResult<()> {
    let tree = load_tree(settings, path)?;
    match hit_line(&tree, point, rect, &settings.separator)? {
        Some((tag, line)) => output::swatch(tag, &line),
        None => output::warning(&format!("no leaf at {}", point)),
    }
    Ok(())
}

/// Tag and `path weight` of the leaf under `point` when `tree` is laid out
/// in `rect`.
pub fn hit_line(
    tree: &WeightedTree,
    point: Point,
    rect: Rect,
    separator: &str,
) -> CliResult<Option<(Rgb, String)>> {
    let Some(id) = tree.hit_test(point, rect) else {
        return Ok(None);
    };
    let node = tree.node(id)?;
    let line = format!("{} {}", tree.path_string(id, separator)?, node.weight());
    Ok(Some((node.tag(), line)))
}

#[instrument(skip(settings))]
fn cmd_tree(settings: &Settings, path: Option<&Path>) -> CliResult<()> {
    let tree = load_tree(settings, dataset(settings, path)?)?;
    output::info(&tree.to_tree_string());
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_session(settings: &Settings, path: Option<&Path>) -> CliResult<()> {
    let tree = load_tree(settings, dataset(settings, path)?)?;
    let mut session = TreemapSession::from_settings(tree, settings)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&mut session, stdin.lock(), &mut stdout.lock())
}

fn cmd_config(settings: &Settings) -> CliResult<()> {
    output::header("Effective settings");
    output::info(&settings.to_toml()?);
    Ok(())
}

/// One line of session input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Act(Action),
    Layout,
    Status,
    Quit,
}

/// Parses `select X Y`, `delete X Y`, `grow`, `shrink`, `layout`, `status`
/// and `quit`. Blank lines and `#` comments yield `None`.
pub fn parse_session_command(line: &str) -> CliResult<Option<SessionCommand>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let point = |args: &[&str]| -> CliResult<Point> {
        match args {
            [x, y] => {
                let x = x
                    .parse::<i32>()
                    .map_err(|_| CliError::InvalidArgs(format!("bad x coordinate: {}", x)))?;
                let y = y
                    .parse::<i32>()
                    .map_err(|_| CliError::InvalidArgs(format!("bad y coordinate: {}", y)))?;
                Ok(Point::new(x, y))
            }
            _ => Err(CliError::InvalidArgs(format!("expected X Y in: {}", line))),
        }
    };

    let command = match words.as_slice() {
        [] => return Ok(None),
        [first, ..] if first.starts_with('#') => return Ok(None),
        ["select", rest @ ..] => SessionCommand::Act(Action::Select(point(rest)?)),
        ["delete", rest @ ..] => SessionCommand::Act(Action::Delete(point(rest)?)),
        ["grow"] => SessionCommand::Act(Action::Grow),
        ["shrink"] => SessionCommand::Act(Action::Shrink),
        ["layout"] => SessionCommand::Layout,
        ["status"] => SessionCommand::Status,
        ["quit"] | ["exit"] => SessionCommand::Quit,
        _ => return Err(CliError::InvalidArgs(format!("unknown command: {}", line))),
    };
    Ok(Some(command))
}

/// Drives `session` from a line-oriented command stream.
///
/// After every action the status line is written, mirroring the text a
/// graphical front end shows below the treemap. Bad commands and failed
/// actions are reported and the loop continues.
pub fn run_session<R, W>(session: &mut TreemapSession, input: R, out: &mut W) -> CliResult<()>
where
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line.map_err(|e| CliError::Infra(InfraError::io("read session input", e)))?;
        let command = match parse_session_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                output::warning(&e);
                continue;
            }
        };

        match command {
            SessionCommand::Quit => break,
            SessionCommand::Layout => {
                let separator = session.separator().to_string();
                let tiles = session.tiles().to_vec();
                for tile in &tiles {
                    writeln!(out, "{}", format_tile(session.tree(), tile, &separator)?)
                        .map_err(write_err)?;
                }
            }
            SessionCommand::Status => {
                writeln!(out, "{}", session.status_line()?).map_err(write_err)?;
            }
            SessionCommand::Act(action) => match session.apply(action) {
                Ok(event) => {
                    if event == SessionEvent::Missed {
                        debug!(?action, "missed");
                    }
                    writeln!(out, "{}", session.status_line()?).map_err(write_err)?;
                }
                Err(e) => output::warning(&e),
            },
        }
    }
    out.flush().map_err(write_err)
}
