use crate::core::config::GeneratorConfig;
use crate::core::stage::{CompletionCheck, StageOutcome};
use crate::generate::edges::create_edges;
use crate::generate::normalizer::normalize_ranks;
use crate::generate::sampler::create_vertices;
use anyhow::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSummary {
    pub vertices: StageOutcome,
    pub ranks: StageOutcome,
    pub edges: StageOutcome,
}

/// Sampler, normalizer and edge generator, strictly in that order. Each stage
/// reads the previous stage's file and is skipped when `check` reports its own
/// output as already present.
pub fn run<C: CompletionCheck + ?Sized>(
    cfg: &GeneratorConfig,
    check: &C,
) -> anyhow::Result<PipelineSummary> {
    std::fs::create_dir_all(&cfg.data_dir)
        .with_context(|| format!("failed to create {}", cfg.data_dir.display()))?;

    let vertices = create_vertices(cfg, check)?;
    let ranks = normalize_ranks(cfg, check)?;
    let edges = create_edges(cfg, check)?;

    Ok(PipelineSummary {
        vertices,
        ranks,
        edges,
    })
}
