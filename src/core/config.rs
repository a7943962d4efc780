use crate::core::stage::Stage;
use anyhow::ensure;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};

pub const VERTICES_FILE: &str = "combined.txt";
pub const RANKS_FILE: &str = "ranks.txt";
pub const EDGES_FILE: &str = "edges.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeMode {
    /// Hold every record in memory between the summing and rescaling passes.
    InMemory,
    /// Read the vertex file twice instead of keeping it resident.
    Streaming,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub num_vertices: u32,
    pub skew: f64,
    pub avg_rank: f64,
    pub max_rank: u32,
    pub seed: Option<u64>,
    pub data_dir: PathBuf,
    pub normalize_mode: NormalizeMode,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_vertices: 25_000_000,
            skew: 1.0,
            avg_rank: 2.0,
            max_rank: 6,
            seed: None,
            data_dir: PathBuf::from("."),
            normalize_mode: NormalizeMode::InMemory,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.num_vertices >= 1, "size must be at least 1");
        ensure!(self.max_rank >= 1, "max rank must be at least 1");
        ensure!(
            self.skew.is_finite() && self.skew >= 0.0,
            "skew must be a non-negative number, got {}",
            self.skew
        );
        ensure!(
            self.avg_rank.is_finite() && self.avg_rank >= 0.0,
            "average degree must be a non-negative number, got {}",
            self.avg_rank
        );
        Ok(())
    }

    pub fn vertices_path(&self) -> PathBuf {
        self.data_dir.join(VERTICES_FILE)
    }

    pub fn ranks_path(&self) -> PathBuf {
        self.data_dir.join(RANKS_FILE)
    }

    pub fn edges_path(&self) -> PathBuf {
        self.data_dir.join(EDGES_FILE)
    }

    /// Total degree mass shared out by the normalizer.
    pub fn target_mass(&self) -> f64 {
        self.avg_rank * self.num_vertices as f64
    }

    pub fn stage_rng(&self, stage: Stage) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ stage.salt()),
            None => StdRng::from_os_rng(),
        }
    }

    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.data_dir = dir.to_path_buf();
        self
    }
}
