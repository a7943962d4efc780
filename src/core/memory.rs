use crate::core::config::GeneratorConfig;
use crate::core::ids::{ID_WIDTH, VertexId};

pub struct MemoryStats {
    pub vertices: usize,
    pub bytes: usize,
}

/// Resident size of the in-memory normalizer: ids plus raw and rescaled
/// out/in degrees, one slot per vertex in each of the five arrays.
pub fn estimate_normalizer_memory(vertices: usize) -> MemoryStats {
    MemoryStats {
        vertices,
        bytes: vertices * (size_of::<VertexId>() + 4 * size_of::<u32>()),
    }
}

/// Approximate size of the edge file: one `src,dst\n` line per edge.
pub fn estimate_output_size(cfg: &GeneratorConfig) -> u64 {
    let line = (2 * ID_WIDTH + 2) as f64;
    (cfg.target_mass() * line) as u64
}
