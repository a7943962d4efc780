use crate::core::config::{GeneratorConfig, NormalizeMode};
use crate::core::ids::VertexId;
use crate::core::stage::{CompletionCheck, Stage, StageOutcome, run_stage};
use crate::records::degree::{DegreeReader, DegreeRecord, DegreeWriter};
use anyhow::{Context, ensure};
use log::info;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

const PROGRESS_INTERVAL: usize = 1_000_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DegreeTotals {
    pub records: u64,
    pub out_sum: u64,
    pub in_sum: u64,
}

impl DegreeTotals {
    fn add(&mut self, record: &DegreeRecord) {
        self.records += 1;
        self.out_sum += record.out_degree as u64;
        self.in_sum += record.in_degree as u64;
    }

    fn ensure_usable(&self, expected: u32) -> anyhow::Result<()> {
        ensure!(
            self.records == expected as u64,
            "vertex file holds {} records, expected {}",
            self.records,
            expected
        );
        ensure!(
            self.out_sum > 0 && self.in_sum > 0,
            "cannot normalize degrees summing to zero (out={}, in={})",
            self.out_sum,
            self.in_sum
        );
        Ok(())
    }
}

/// Share of `mass` owed to a vertex holding `degree` out of `sum`, rounded
/// half away from zero.
pub fn normalize_degree(degree: u32, sum: u64, mass: f64) -> u32 {
    (degree as f64 / sum as f64 * mass).round() as u32
}

/// Reads at most `limit` records; anything past that is ignored.
fn read_vertices(
    path: &Path,
    limit: u32,
) -> anyhow::Result<impl Iterator<Item = anyhow::Result<DegreeRecord>>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(DegreeReader::new(BufReader::new(file)).take(limit as usize))
}

fn log_progress(verb: &str, done: usize, total: u32) {
    if done % PROGRESS_INTERVAL == 0 {
        info!("{} {} of {} vertices", verb, done, total);
    }
}

pub fn normalize_in_memory<W: Write>(
    cfg: &GeneratorConfig,
    input: &Path,
    output: W,
) -> anyhow::Result<u64> {
    let n = cfg.num_vertices as usize;
    let mut vertices: Vec<VertexId> = Vec::with_capacity(n);
    let mut ranks: Vec<u32> = Vec::with_capacity(n);
    let mut in_ranks: Vec<u32> = Vec::with_capacity(n);

    for record in read_vertices(input, cfg.num_vertices)? {
        let record = record.with_context(|| format!("failed to parse {}", input.display()))?;
        vertices.push(record.id);
        ranks.push(record.out_degree);
        in_ranks.push(record.in_degree);
        log_progress("read", vertices.len(), cfg.num_vertices);
    }
    info!("read file complete");

    let totals = DegreeTotals {
        records: vertices.len() as u64,
        out_sum: ranks.iter().map(|&d| d as u64).sum(),
        in_sum: in_ranks.iter().map(|&d| d as u64).sum(),
    };
    totals.ensure_usable(cfg.num_vertices)?;

    let mass = cfg.target_mass();
    let normalized_ranks: Vec<u32> = ranks
        .iter()
        .map(|&d| normalize_degree(d, totals.out_sum, mass))
        .collect();
    let normalized_in_ranks: Vec<u32> = in_ranks
        .iter()
        .map(|&d| normalize_degree(d, totals.in_sum, mass))
        .collect();

    let mut writer = DegreeWriter::new(output);
    for k in 0..n {
        writer.write(&DegreeRecord::new(
            vertices[k],
            normalized_ranks[k],
            normalized_in_ranks[k],
        ))?;
        log_progress("wrote", k + 1, cfg.num_vertices);
    }
    writer.finish()?;
    Ok(n as u64)
}

pub fn normalize_streaming<W: Write>(
    cfg: &GeneratorConfig,
    input: &Path,
    output: W,
) -> anyhow::Result<u64> {
    let mut totals = DegreeTotals::default();
    for record in read_vertices(input, cfg.num_vertices)? {
        let record = record.with_context(|| format!("failed to parse {}", input.display()))?;
        totals.add(&record);
        log_progress("summed", totals.records as usize, cfg.num_vertices);
    }
    totals.ensure_usable(cfg.num_vertices)?;
    info!(
        "degree sums: out = {}, in = {}",
        totals.out_sum, totals.in_sum
    );

    let mass = cfg.target_mass();
    let mut writer = DegreeWriter::new(output);
    let mut written = 0;
    for record in read_vertices(input, cfg.num_vertices)? {
        let record = record.with_context(|| format!("failed to parse {}", input.display()))?;
        writer.write(&DegreeRecord::new(
            record.id,
            normalize_degree(record.out_degree, totals.out_sum, mass),
            normalize_degree(record.in_degree, totals.in_sum, mass),
        ))?;
        written += 1;
        log_progress("wrote", written, cfg.num_vertices);
    }
    writer.finish()?;
    Ok(written as u64)
}

pub fn normalize_ranks<C: CompletionCheck + ?Sized>(
    cfg: &GeneratorConfig,
    check: &C,
) -> anyhow::Result<StageOutcome> {
    let input = cfg.vertices_path();
    let output = cfg.ranks_path();
    run_stage(Stage::Ranks, &output, check, |file| {
        info!("Average rank (out-degree) = {}", cfg.avg_rank);
        match cfg.normalize_mode {
            NormalizeMode::InMemory => normalize_in_memory(cfg, &input, file),
            NormalizeMode::Streaming => normalize_streaming(cfg, &input, file),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stage::FileExists;
    use crate::generate::sampler::create_vertices;

    fn cfg(dir: &Path, num_vertices: u32, avg_rank: f64) -> GeneratorConfig {
        GeneratorConfig {
            num_vertices,
            avg_rank,
            seed: Some(99),
            ..Default::default()
        }
        .with_data_dir(dir)
    }

    fn read_ranks(cfg: &GeneratorConfig) -> Vec<DegreeRecord> {
        let file = File::open(cfg.ranks_path()).unwrap();
        DegreeReader::new(file)
            .collect::<anyhow::Result<_>>()
            .unwrap()
    }

    #[test]
    fn test_normalize_degree_rounding() {
        assert_eq!(1, normalize_degree(1, 4, 2.0));
        assert_eq!(2, normalize_degree(3, 4, 2.0));
        assert_eq!(1, normalize_degree(1, 3, 2.0));
        assert_eq!(0, normalize_degree(1, 10, 2.0));
    }

    #[test]
    fn test_rescales_to_target_mass() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = cfg(dir.path(), 4, 2.0);
        std::fs::write(
            cfg.vertices_path(),
            "0000000000,1,1\n0000000001,2,1\n0000000002,3,1\n0000000003,2,1\n",
        )
        .unwrap();

        normalize_ranks(&cfg, &FileExists).unwrap();

        assert_eq!(
            vec![
                DegreeRecord::new(0, 1, 2),
                DegreeRecord::new(1, 2, 2),
                DegreeRecord::new(2, 3, 2),
                DegreeRecord::new(3, 2, 2),
            ],
            read_ranks(&cfg)
        );
    }

    #[test]
    fn test_sum_within_rounding_tolerance() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = cfg(dir.path(), 10_000, 3.5);
        create_vertices(&cfg, &FileExists).unwrap();
        normalize_ranks(&cfg, &FileExists).unwrap();

        let ranks = read_ranks(&cfg);
        assert_eq!(10_000, ranks.len());
        let out_sum: u64 = ranks.iter().map(|r| r.out_degree as u64).sum();
        let in_sum: u64 = ranks.iter().map(|r| r.in_degree as u64).sum();
        let target = cfg.target_mass();
        assert!((out_sum as f64 - target).abs() <= 5_000.0, "{}", out_sum);
        assert!((in_sum as f64 - target).abs() <= 5_000.0, "{}", in_sum);
    }

    #[test]
    fn test_extra_records_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = cfg(dir.path(), 2, 1.0);
        std::fs::write(
            cfg.vertices_path(),
            "0000000000,1,3\n0000000001,3,1\n0000000002,6,6\n",
        )
        .unwrap();

        normalize_ranks(&cfg, &FileExists).unwrap();

        assert_eq!(
            vec![DegreeRecord::new(0, 1, 2), DegreeRecord::new(1, 2, 1)],
            read_ranks(&cfg)
        );
    }

    #[test]
    fn test_short_vertex_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = cfg(dir.path(), 3, 2.0);
        std::fs::write(cfg.vertices_path(), "0000000000,1,1\n").unwrap();

        assert!(normalize_ranks(&cfg, &FileExists).is_err());
        assert!(!cfg.ranks_path().exists());
    }

    #[test]
    fn test_zero_sum_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = cfg(dir.path(), 2, 2.0);
        std::fs::write(cfg.vertices_path(), "0000000000,0,1\n0000000001,0,1\n").unwrap();

        let mut buf = Vec::new();
        assert!(normalize_in_memory(&cfg, &cfg.vertices_path(), &mut buf).is_err());
        assert!(normalize_streaming(&cfg, &cfg.vertices_path(), &mut buf).is_err());
    }

    #[test]
    fn test_streaming_matches_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = cfg(dir.path(), 2_000, 2.0);
        create_vertices(&cfg, &FileExists).unwrap();

        let mut in_memory = Vec::new();
        let mut streaming = Vec::new();
        normalize_in_memory(&cfg, &cfg.vertices_path(), &mut in_memory).unwrap();
        normalize_streaming(&cfg, &cfg.vertices_path(), &mut streaming).unwrap();

        assert!(!in_memory.is_empty());
        assert_eq!(in_memory, streaming);
    }

    #[test]
    fn test_streaming_mode_stage() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = GeneratorConfig {
            normalize_mode: NormalizeMode::Streaming,
            ..cfg(dir.path(), 4, 2.0)
        };
        std::fs::write(
            cfg.vertices_path(),
            "0000000000,1,1\n0000000001,2,1\n0000000002,3,1\n0000000003,2,1\n",
        )
        .unwrap();

        normalize_ranks(&cfg, &FileExists).unwrap();

        let out: Vec<u32> = read_ranks(&cfg).iter().map(|r| r.out_degree).collect();
        assert_eq!(vec![1, 2, 3, 2], out);
    }
}
