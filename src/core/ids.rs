use anyhow::{Context, ensure};

pub type VertexId = u32;

/// Width of the canonical on-disk vertex id.
pub const ID_WIDTH: usize = 10;

pub fn format_vertex_id(id: VertexId) -> String {
    format!("{:0width$}", id, width = ID_WIDTH)
}

pub fn parse_vertex_id(raw: &str) -> anyhow::Result<VertexId> {
    ensure!(
        !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()),
        "invalid vertex id {:?}",
        raw
    );
    raw.parse::<VertexId>()
        .with_context(|| format!("vertex id {:?} out of range", raw))
}
