use clap::{Parser, Subcommand};

use crate::error::{BenchError, Result};
use crate::routines::{dependency_sweep, sink_fanout};

#[derive(Debug, Parser)]
#[command(
    name = "nodal-bench",
    about = "Ad-hoc timing harness for nodal's sink fan-out and dependency-sweep hot paths",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Time how long N writable updates take to fan out to M subscribers.
    SinkFanout {
        #[arg(long, default_value_t = 64)]
        subscribers: usize,

        #[arg(long, default_value_t = 10_000)]
        updates: usize,
    },

    /// Time how long a dependency-set sweep takes over N writable sources.
    DependencySweep {
        #[arg(long, default_value_t = 64)]
        dependencies: usize,

        #[arg(long, default_value_t = 10_000)]
        sweeps: usize,
    },
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::SinkFanout {
            subscribers,
            updates,
        } => {
            if subscribers == 0 || updates == 0 {
                return Err(BenchError::InvalidArgument {
                    message: "subscribers and updates must both be non-zero".to_string(),
                });
            }
            let report = sink_fanout(subscribers, updates);
            tracing::info!(
                subscribers = report.subscribers,
                updates = report.updates,
                elapsed_ms = report.elapsed.as_secs_f64() * 1e3,
                "sink fan-out complete"
            );
            println!(
                "sink-fanout: {} subscribers x {} updates in {:?} ({:.1} ns/update)",
                report.subscribers,
                report.updates,
                report.elapsed,
                report.elapsed.as_nanos() as f64 / report.updates as f64
            );
            Ok(())
        }
        Commands::DependencySweep {
            dependencies,
            sweeps,
        } => {
            if dependencies == 0 || sweeps == 0 {
                return Err(BenchError::InvalidArgument {
                    message: "dependencies and sweeps must both be non-zero".to_string(),
                });
            }
            let report = dependency_sweep(dependencies, sweeps);
            tracing::info!(
                dependencies = report.dependencies,
                sweeps = report.sweeps,
                elapsed_ms = report.elapsed.as_secs_f64() * 1e3,
                "dependency sweep complete"
            );
            println!(
                "dependency-sweep: {} dependencies x {} sweeps in {:?} ({:.1} ns/sweep)",
                report.dependencies,
                report.sweeps,
                report.elapsed,
                report.elapsed.as_nanos() as f64 / report.sweeps as f64
            );
            Ok(())
        }
    }
}
