//! Apply DeHackEd and BEX patches to the classic game data and report what
//! changed.

mod settings;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use dehacked_engine::world::ClassRegistry;
use dehacked_engine::{PatchEngine, world_from_descriptor};

use crate::settings::{DEFAULT_SUPPORT, Settings};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Patch files, applied in order
    #[arg(required = true)]
    patches: Vec<PathBuf>,

    /// DEHSUPP descriptor to build the lookup tables from
    #[arg(long)]
    support: Option<PathBuf>,

    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Ignore Text sections in every patch
    #[arg(long)]
    no_text: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).wrap_err("could not read settings")?;

    let level = match cli.verbose {
        0 => settings.log_level.as_deref().unwrap_or("warn"),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let support = cli
        .support
        .or(settings.support)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SUPPORT));
    log::info!("Using support descriptor {}", support.display());
    let descriptor = std::fs::read_to_string(&support)
        .wrap_err_with(|| format!("could not read {}", support.display()))?;
    let mut world = world_from_descriptor(&descriptor)
        .wrap_err_with(|| format!("could not parse {}", support.display()))?;

    let mut engine = PatchEngine::new();
    engine.set_skip_text(cli.no_text || settings.no_text);
    for patch in &cli.patches {
        engine
            .load_file(&mut world, patch)
            .wrap_err_with(|| format!("could not apply {}", patch.display()))?;
    }

    let touched: Vec<String> = engine
        .touched_actors()
        .iter()
        .map(|&class| world.class_name(class).to_string())
        .collect();
    let overrides = engine.string_overrides().len();
    engine.finish(&mut world);

    println!("patches applied: {}", cli.patches.len());
    println!("actors touched: {}", touched.len());
    for name in &touched {
        match world
            .find_class(name)
            .and_then(|class| world.replacement(class))
        {
            Some(sub) => println!("  {name} -> {}", world.class_name(sub)),
            None => println!("  {name}"),
        }
    }
    println!("string overrides: {overrides}");

    let info = engine.deh_info();
    println!(
        "start health {}, max health {}, max armor {}, bfg cells {}",
        info.start_health, info.max_health, info.max_armor, info.bfg_cells
    );
    Ok(())
}
