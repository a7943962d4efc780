use crate::cli::{CliArgs, normalize_args};
use crate::core::config::NormalizeMode;
use crate::core::memory::{estimate_normalizer_memory, estimate_output_size};
use crate::core::stage::{FileExists, StageOutcome};
use clap::Parser;
use log::{info, warn};

pub mod cli;
pub mod core;
pub mod generate;
pub mod pipeline;
pub mod records;

const IN_MEMORY_WARN_BYTES: u64 = 4 << 30;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("adjgen started");

    let (args, ignored) = normalize_args(std::env::args());
    for arg in ignored {
        warn!("Invalid argument = {}, ignoring", arg);
    }
    let cfg = CliArgs::parse_from(args).into_config();
    cfg.validate()?;

    let stats = estimate_normalizer_memory(cfg.num_vertices as usize);
    info!(
        "vertices: {}, skew: {}, avg degree: {}, max rank: {}, edge file approx {} MB",
        cfg.num_vertices,
        cfg.skew,
        cfg.avg_rank,
        cfg.max_rank,
        estimate_output_size(&cfg) / (1024 * 1024)
    );
    if cfg.normalize_mode == NormalizeMode::InMemory && stats.bytes as u64 > IN_MEMORY_WARN_BYTES {
        warn!(
            "normalizing {} vertices in memory needs about {} MB; consider --streaming",
            stats.vertices,
            stats.bytes / (1024 * 1024)
        );
    }

    let summary = pipeline::run(&cfg, &FileExists)?;
    for (file, outcome) in [
        (cfg.vertices_path(), summary.vertices),
        (cfg.ranks_path(), summary.ranks),
        (cfg.edges_path(), summary.edges),
    ] {
        match outcome {
            StageOutcome::Generated(report) => {
                info!("{}: {} records", file.display(), report.records)
            }
            StageOutcome::Skipped => info!("{}: left as found", file.display()),
        }
    }

    info!("adjgen finished");
    Ok(())
}
