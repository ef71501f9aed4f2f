use anyhow::Context;
use clap::{Parser, Subcommand};
use mansion_author::{Session, Stores};
use mansion_common::{BlockKind, CellCoord, GridPos, Rotation};
use mansion_input::Action;
use mansion_persist::DirStorage;
use mansion_render::{Renderer, TextRenderer};
use mansion_tools::LayoutInspector;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mansion-cli", about = "CLI tool for mansion layouts")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding the saved scene and grid
    #[arg(long, default_value = "./mansion_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and summaries of the saved scene and grid
    Info,
    /// Save a freshly reset scene (ground only), or a blank grid
    Reset {
        #[arg(long)]
        grid: bool,
    },
    /// Place a block in the saved scene
    Place {
        #[arg(long = "type")]
        kind: BlockKind,
        #[arg(long, default_value = "0")]
        rotation: Rotation,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        #[arg(allow_negative_numbers = true)]
        z: i32,
    },
    /// Remove a block from the saved scene
    Remove {
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        #[arg(allow_negative_numbers = true)]
        z: i32,
    },
    /// Paint a cell of the saved grid
    Paint {
        #[arg(long = "type")]
        kind: BlockKind,
        #[arg(long, default_value = "0")]
        rotation: Rotation,
        col: u8,
        row: u8,
    },
    /// Draw the saved scene as a top-down plan, or the saved grid
    Show {
        #[arg(long)]
        grid: bool,
    },
    /// Describe the block at a scene coordinate
    Inspect {
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        #[arg(allow_negative_numbers = true)]
        z: i32,
    },
}

/// Load the saved scene into `session`. A missing save keeps the fresh
/// ground layout.
fn load_scene(session: &mut Session, stores: &Stores<DirStorage>) -> anyhow::Result<()> {
    session
        .load_scene(&stores.scene)
        .context("load saved scene")?;
    tracing::debug!(blocks = session.layout().len(), "scene loaded");
    Ok(())
}

/// Load the saved grid into `session`. A missing save keeps the blank grid.
fn load_grid(session: &mut Session, stores: &Stores<DirStorage>) -> anyhow::Result<()> {
    session.load_grid(&stores.grid).context("load saved grid")?;
    tracing::debug!(painted = session.grid().painted_count(), "grid loaded");
    Ok(())
}

/// Run one command against the data directory and return what to print.
///
/// Each command reads only the namespace it works on; `reset` reads nothing.
fn run(command: Commands, data_dir: &Path) -> anyhow::Result<String> {
    let mut stores = Stores::open(data_dir)
        .with_context(|| format!("open data directory {}", data_dir.display()))?;
    let mut session = Session::new();
    let mut out = String::new();

    match command {
        Commands::Info => {
            writeln!(out, "mansion-cli v{}", env!("CARGO_PKG_VERSION"))?;
            writeln!(out, "tools: {}", mansion_tools::crate_info())?;
            writeln!(out, "data: {}", data_dir.display())?;
            match load_scene(&mut session, &stores) {
                Ok(()) => writeln!(out, "{}", LayoutInspector::summary(session.layout()))?,
                Err(e) => writeln!(out, "Scene: unreadable ({e:#})")?,
            }
            match load_grid(&mut session, &stores) {
                Ok(()) => writeln!(out, "{}", LayoutInspector::grid_summary(session.grid()))?,
                Err(e) => writeln!(out, "Grid: unreadable ({e:#})")?,
            }
        }
        Commands::Reset { grid } => {
            let (reset, save) = if grid {
                (Action::ResetGrid, Action::SaveGrid)
            } else {
                (Action::ResetScene, Action::SaveScene)
            };
            for action in [reset, save] {
                if let Some(notice) = session.dispatch(action, &mut stores)? {
                    writeln!(out, "{notice}")?;
                }
            }
        }
        Commands::Place {
            kind,
            rotation,
            x,
            y,
            z,
        } => {
            load_scene(&mut session, &stores)?;
            session.select_kind(kind);
            session.set_rotation(rotation);
            let pos = GridPos::new(x, y, z);
            session.dispatch(Action::PlaceAt(pos), &mut stores)?;
            session.dispatch(Action::SaveScene, &mut stores)?;
            writeln!(out, "placed {kind} at {pos} facing {rotation}")?;
        }
        Commands::Remove { x, y, z } => {
            load_scene(&mut session, &stores)?;
            let pos = GridPos::new(x, y, z);
            let removed = session.remove_at(pos)?;
            session.dispatch(Action::SaveScene, &mut stores)?;
            writeln!(out, "removed {} at {pos}", removed.kind)?;
        }
        Commands::Paint {
            kind,
            rotation,
            col,
            row,
        } => {
            load_grid(&mut session, &stores)?;
            session.select_kind(kind);
            session.set_rotation(rotation);
            let coord = CellCoord::new(col, row);
            session.dispatch(Action::PaintCell(coord), &mut stores)?;
            session.dispatch(Action::SaveGrid, &mut stores)?;
            writeln!(out, "painted {coord} with {kind} facing {rotation}")?;
        }
        Commands::Show { grid } => {
            let renderer = TextRenderer::new();
            let text = if grid {
                load_grid(&mut session, &stores)?;
                renderer.render(session.grid())
            } else {
                load_scene(&mut session, &stores)?;
                renderer.render(session.layout())
            };
            out.push_str(&text);
        }
        Commands::Inspect { x, y, z } => {
            load_scene(&mut session, &stores)?;
            let pos = GridPos::new(x, y, z);
            match LayoutInspector::inspect(session.layout(), pos) {
                Some(info) => writeln!(out, "{info}")?,
                None => writeln!(out, "no block at {pos}")?,
            }
        }
    }

    Ok(out)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let out = run(cli.command, &cli.data_dir)?;
    print!("{out}");
    Ok(())
}
