use anyhow::Result;
use clap::Parser;
use log::warn;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use dv_routing_sim::algorithms::dijkstra::shortest_path_costs;
use dv_routing_sim::config::TopologyConfig;
use dv_routing_sim::display::{format_link_costs, format_routing_table};
use dv_routing_sim::{ConvergenceStatus, Network};

#[derive(Parser)]
#[command(name = "dv-routing-sim", about = "Distance Vector Routing simulation")]
struct Cli {
    /// JSON topology file; defaults to the built-in 6-router example
    #[arg(long)]
    topology: Option<PathBuf>,

    /// Round cap before the run is reported as exhausted
    #[arg(long, default_value_t = 100)]
    max_rounds: usize,

    /// Pause between printed rounds, for human-paced output
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Print the final tables as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Cross-check converged tables against Dijkstra
    #[arg(long)]
    verify: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.topology {
        Some(path) => TopologyConfig::load(path)?,
        None => TopologyConfig::example(),
    };
    let mut network = config.build()?;

    println!("Starting Distance Vector Routing simulation");
    println!("{}", "=".repeat(50));
    println!();
    print!("{}", format_link_costs(&network));

    // Drive the simulation one round at a time so intermediate tables can be
    // shown, rather than calling simulate() and only seeing the fixed point.
    let mut status = ConvergenceStatus::Exhausted;
    let mut rounds = 0;
    for round in 1..=cli.max_rounds {
        let changed = network.run_round()?;
        rounds = round;

        println!();
        println!("Round {}", round);
        println!("{}", "-".repeat(20));
        for router in network.routers() {
            println!();
            print!("{}", format_routing_table(router));
        }

        if !changed {
            status = ConvergenceStatus::Converged;
            println!();
            println!("The network has converged after {} rounds.", round);
            break;
        }

        if cli.delay_ms > 0 {
            thread::sleep(Duration::from_millis(cli.delay_ms));
        }
    }

    if status == ConvergenceStatus::Exhausted {
        warn!("no convergence within {} rounds", cli.max_rounds);
        println!();
        println!(
            "Warning: round cap of {} reached without convergence",
            cli.max_rounds
        );
    }

    if cli.verify && status == ConvergenceStatus::Converged {
        verify_against_dijkstra(&network)?;
    }

    if cli.json {
        print_tables_json(&network, status, rounds)?;
    }

    // Exhaustion is a reported outcome, not a failure exit.
    Ok(())
}

fn verify_against_dijkstra(network: &Network) -> Result<()> {
    for router in network.routers() {
        let reference = shortest_path_costs(network, router.id())?;
        for (dest, entry) in router.routing_table().iter() {
            let expected = reference.get(dest).copied();
            if expected != Some(entry.cost) {
                anyhow::bail!(
                    "table mismatch at {} -> {}: distance-vector {} vs dijkstra {:?}",
                    router.id(),
                    dest,
                    entry.cost,
                    expected
                );
            }
        }
    }
    println!();
    println!("Verification: all converged tables match Dijkstra.");
    Ok(())
}

fn print_tables_json(network: &Network, status: ConvergenceStatus, rounds: usize) -> Result<()> {
    let report = serde_json::json!({
        "status": status,
        "rounds": rounds,
        "tables": network
            .routers()
            .map(|r| (r.id().clone(), r.routing_table()))
            .collect::<std::collections::BTreeMap<_, _>>(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
