use anyhow::Context;
use log::info;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Vertices,
    Ranks,
    Edges,
}

impl Stage {
    pub fn step(self) -> usize {
        match self {
            Stage::Vertices => 1,
            Stage::Ranks => 2,
            Stage::Edges => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Vertices => "Vertices generation",
            Stage::Ranks => "Normalization of ranks",
            Stage::Edges => "Edge generation",
        }
    }

    pub(crate) fn salt(self) -> u64 {
        match self {
            Stage::Vertices => 0x9e37_79b9_7f4a_7c15,
            Stage::Ranks => 0xbf58_476d_1ce4_e5b9,
            Stage::Edges => 0x94d0_49bb_1331_11eb,
        }
    }
}

/// Decides whether a stage's output already exists and the stage can be skipped.
pub trait CompletionCheck {
    fn is_complete(&self, output: &Path) -> bool;
}

pub struct FileExists;

impl CompletionCheck for FileExists {
    fn is_complete(&self, output: &Path) -> bool {
        output.exists()
    }
}

impl<F: Fn(&Path) -> bool> CompletionCheck for F {
    fn is_complete(&self, output: &Path) -> bool {
        self(output)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    pub records: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Generated(StageReport),
    Skipped,
}

/// Runs `body` against a scratch file next to `output` and moves it into place
/// once the body succeeds. A stage that fails leaves no output behind.
pub fn run_stage<C, F>(
    stage: Stage,
    output: &Path,
    check: &C,
    body: F,
) -> anyhow::Result<StageOutcome>
where
    C: CompletionCheck + ?Sized,
    F: FnOnce(&mut File) -> anyhow::Result<u64>,
{
    info!("Step {} of 3: {}", stage.step(), stage.title());

    if check.is_complete(output) {
        info!(
            "File {} exists, skipping {}",
            output.display(),
            stage.title().to_lowercase()
        );
        return Ok(StageOutcome::Skipped);
    }

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut scratch = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create scratch file in {}", dir.display()))?;

    info!("Writing to file: {}", output.display());
    let records = body(scratch.as_file_mut())?;
    scratch
        .as_file()
        .sync_all()
        .with_context(|| format!("failed to flush {}", output.display()))?;
    scratch
        .persist(output)
        .with_context(|| format!("failed to move output into {}", output.display()))?;

    Ok(StageOutcome::Generated(StageReport { records }))
}
