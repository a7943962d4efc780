use crate::core::config::GeneratorConfig;
use crate::core::stage::{CompletionCheck, Stage, StageOutcome, run_stage};
use crate::records::degree::{DegreeRecord, DegreeWriter};
use anyhow::anyhow;
use log::info;
use rand::Rng;
use rand_distr::{Distribution, Zipf};

/// Power-law degree source over `1..=max_rank`.
pub struct DegreeSampler {
    zipf: Zipf<f64>,
}

impl DegreeSampler {
    pub fn new(max_rank: u32, skew: f64) -> anyhow::Result<Self> {
        let zipf = Zipf::new(max_rank as f64, skew)
            .map_err(|e| anyhow!("invalid zipf parameters (n={}, s={}): {:?}", max_rank, skew, e))?;
        Ok(Self { zipf })
    }

    /// 0-based rank index, as drawn from `0..max_rank`.
    fn next_rank<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.zipf.sample(rng) as u32 - 1
    }

    /// Rank index shifted by one so no vertex ends up with a zero degree
    /// before normalization.
    pub fn next_degree<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.next_rank(rng) + 1
    }
}

pub fn sample_degrees<R: Rng>(
    cfg: &GeneratorConfig,
    mut rng: R,
) -> anyhow::Result<impl Iterator<Item = DegreeRecord>> {
    let sampler = DegreeSampler::new(cfg.max_rank, cfg.skew)?;

    Ok((0..cfg.num_vertices).map(move |id| {
        let out_degree = sampler.next_degree(&mut rng);
        let in_degree = sampler.next_degree(&mut rng);
        DegreeRecord::new(id, out_degree, in_degree)
    }))
}

pub fn create_vertices<C: CompletionCheck + ?Sized>(
    cfg: &GeneratorConfig,
    check: &C,
) -> anyhow::Result<StageOutcome> {
    let output = cfg.vertices_path();
    run_stage(Stage::Vertices, &output, check, |file| {
        info!("Number of vertices = {}", cfg.num_vertices);
        let mut writer = DegreeWriter::new(file);
        let mut written = 0;
        for record in sample_degrees(cfg, cfg.stage_rng(Stage::Vertices))? {
            writer.write(&record)?;
            written += 1;
        }
        writer.finish()?;
        Ok(written)
    })
}
