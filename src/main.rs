use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use rail_sim::simulation::{SimWorld, TickDriver, TrainId};

#[derive(Parser)]
#[command(name = "rail_sim")]
#[command(about = "Train traffic simulation over the reference corridor scenario")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "40")]
    ticks: u64,

    /// Wall-clock milliseconds per tick; 0 fast-forwards synchronously
    #[arg(long, default_value = "0")]
    period_ms: u64,

    /// Inject a breakdown on this train id
    #[arg(long)]
    disrupt: Option<String>,

    /// Tick at which the breakdown is injected
    #[arg(long, default_value = "10")]
    disrupt_at: u64,

    /// Only print the final state, not per-second snapshots
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.period_ms == 0 {
        run_fast_forward(&cli)
    } else {
        run_wall_clock(&cli)
    }
}

/// Run the scenario synchronously, without the wall clock
fn run_fast_forward(cli: &Cli) -> Result<()> {
    let mut world = SimWorld::new()?;
    let disrupt = cli.disrupt.as_deref().map(TrainId::from);

    for tick in 1..=cli.ticks {
        world.tick();

        if let Some(train) = &disrupt {
            // The follow-up only fires when the injection actually landed.
            if tick == cli.disrupt_at && world.inject_disruption(train) {
                world.begin_reoptimization();
            }
        }

        if !cli.quiet && tick % 5 == 0 {
            println!("--- Tick {} ---", tick);
            world.draw_map();
            println!();
        }
    }

    println!("=== Final State ===");
    world.print_summary();
    world.draw_map();
    world.print_recent_events();
    Ok(())
}

/// Run on the repeating timer, the way the dashboard drives the engine
fn run_wall_clock(cli: &Cli) -> Result<()> {
    let world = SimWorld::new()?;
    let mut driver = TickDriver::with_period(world, Duration::from_millis(cli.period_ms));
    let disrupt = cli.disrupt.as_deref().map(TrainId::from);

    driver.start();
    let mut disrupted = false;
    loop {
        std::thread::sleep(Duration::from_millis(cli.period_ms));
        let tick = driver.current_tick();

        if let Some(train) = &disrupt {
            if !disrupted && tick >= cli.disrupt_at {
                driver.inject_disruption(train);
                disrupted = true;
            }
        }

        if !cli.quiet {
            println!("--- Tick {} ---", tick);
            driver.with_world(|w| w.draw_map());
            println!();
        }

        if tick >= cli.ticks {
            break;
        }
    }
    driver.stop();

    println!("=== Final State ===");
    driver.with_world(|w| {
        w.print_summary();
        w.draw_map();
        w.print_recent_events();
    });
    Ok(())
}
