//! Kreatures - Entry Point
//!
//! Asks for a name, drops the player's kreature into a world of strangers
//! and prints its log as it lives (and probably dies).

use std::path::PathBuf;

use clap::Parser;

use kreatures::core::config::SimulationConfig;
use kreatures::core::error::Result;
use kreatures::entity::NameRegistry;
use kreatures::simulation::Simulation;
use kreatures::ui::{ConsolePresenter, Presenter};

#[derive(Parser, Debug)]
#[command(name = "kreatures")]
#[command(about = "Watch your kreature fight, befriend and breed its way through a tiny world")]
struct Args {
    /// TOML config file. Missing keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Names file for newborns, one name per line
    #[arg(long)]
    names: Option<PathBuf>,

    /// Name of your kreature (prompted for when omitted)
    #[arg(long)]
    name: Option<String>,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Nobody can fight your kreature, and it fights nobody
    #[arg(long)]
    god_mode: bool,

    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Seconds to pause between ticks
    #[arg(long)]
    tick_length: Option<f64>,

    /// Also write the final summary as JSON to this file
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

impl Args {
    fn apply_overrides(&self, config: &mut SimulationConfig) {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if self.god_mode {
            config.god_mode = true;
        }
        if let Some(max_ticks) = self.max_ticks {
            config.max_ticks = max_ticks;
        }
        if let Some(tick_length) = self.tick_length {
            config.tick_length = tick_length;
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kreatures=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = SimulationConfig::load_or_default(args.config.as_deref());
    args.apply_overrides(&mut config);
    config.validate()?;

    let names = NameRegistry::load_or_default(args.names.as_deref());
    let mut console = ConsolePresenter::stdio();

    let name = match args.name.clone() {
        Some(name) => name,
        None => console
            .prompt("What would you like to name your kreature?")?
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Kreature".to_string()),
    };
    console.show_line("");

    let mut sim = Simulation::new(config, names);
    sim.spawn_player(name);
    tracing::info!(
        "Starting run: {} kreatures, cap {}, max {} ticks",
        sim.population.len(),
        sim.cap,
        sim.config.max_ticks
    );

    let outcome = sim.run(&mut console);

    console.pause("[CONTINUE]")?;

    if let Some(summary) = sim.summary(Some(outcome)) {
        console.write_block(&summary.summary())?;

        if let Some(path) = &args.summary_json {
            std::fs::write(path, summary.to_json()?)?;
            tracing::info!("Wrote summary to {}", path.display());
        }
    }

    Ok(())
}
