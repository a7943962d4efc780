use crate::core::config::GeneratorConfig;
use crate::core::ids::VertexId;
use crate::core::stage::{CompletionCheck, Stage, StageOutcome, run_stage};
use crate::records::degree::DegreeReader;
use crate::records::edge::EdgeWriter;
use anyhow::{Context, ensure};
use log::info;
use rand::Rng;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

const PROGRESS_INTERVAL: u64 = 1_000_000;

/// Draws `out_degree` distinct destinations for `src` uniformly from
/// `0..num_vertices`, rejecting self-loops and repeats.
///
/// Expected draws per accepted destination stay close to one while
/// `out_degree` is small next to `num_vertices`; out-degrees that could never
/// be satisfied are refused up front.
pub fn pick_destinations<R: Rng + ?Sized>(
    src: VertexId,
    out_degree: u32,
    num_vertices: u32,
    rng: &mut R,
) -> anyhow::Result<BTreeSet<VertexId>> {
    let available = num_vertices - u32::from(src < num_vertices);
    ensure!(
        out_degree <= available,
        "vertex {} wants {} distinct destinations but only {} exist",
        src,
        out_degree,
        available
    );

    let mut chosen = BTreeSet::new();
    while chosen.len() < out_degree as usize {
        let dst = rng.random_range(0..num_vertices);
        if dst != src {
            chosen.insert(dst);
        }
    }
    Ok(chosen)
}

/// In-degrees in the rank file are parsed but play no part here; a vertex's
/// realized in-degree is whatever uniform sampling hands it.
pub fn generate_edges<W: Write, R: Rng + ?Sized>(
    cfg: &GeneratorConfig,
    input: &Path,
    output: W,
    rng: &mut R,
) -> anyhow::Result<u64> {
    let file = File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    let mut writer = EdgeWriter::new(output);

    let mut vertices = 0;
    let mut edges = 0;
    for record in DegreeReader::new(BufReader::new(file)) {
        let record = record.with_context(|| format!("failed to parse {}", input.display()))?;
        let dsts = pick_destinations(record.id, record.out_degree, cfg.num_vertices, rng)?;
        edges += writer.write_batch(record.id, dsts)?;

        vertices += 1;
        if vertices % PROGRESS_INTERVAL == 0 {
            info!("{} vertices, {} edges", vertices, edges);
        }
    }
    writer.finish()?;
    info!("generated {} edges from {} vertices", edges, vertices);
    Ok(edges)
}

pub fn create_edges<C: CompletionCheck + ?Sized>(
    cfg: &GeneratorConfig,
    check: &C,
) -> anyhow::Result<StageOutcome> {
    let input = cfg.ranks_path();
    let output = cfg.edges_path();
    run_stage(Stage::Edges, &output, check, |file| {
        let mut rng = cfg.stage_rng(Stage::Edges);
        generate_edges(cfg, &input, file, &mut rng)
    })
}
