use crate::core::ids::{VertexId, format_vertex_id};
use std::io::Write;

pub struct EdgeWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl<W: Write> EdgeWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(writer),
        }
    }

    /// Writes every edge leaving `src` in one go and returns how many were written.
    pub fn write_batch<I>(&mut self, src: VertexId, dsts: I) -> anyhow::Result<u64>
    where
        I: IntoIterator<Item = VertexId>,
    {
        let src = format_vertex_id(src);
        let mut written = 0;
        for dst in dsts {
            self.inner
                .write_record([src.as_str(), format_vertex_id(dst).as_str()])?;
            written += 1;
        }
        Ok(written)
    }

    pub fn finish(mut self) -> anyhow::Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
    pub src: VertexId,
    pub dst: VertexId,
}

#[cfg(test)]
pub fn read_edges<R: std::io::Read>(reader: R) -> anyhow::Result<Vec<EdgeRecord>> {
    use crate::core::ids::parse_vertex_id;

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);
    let mut edges = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        anyhow::ensure!(record.len() == 2, "expected 2 fields, found {}", record.len());
        edges.push(EdgeRecord {
            src: parse_vertex_id(&record[0])?,
            dst: parse_vertex_id(&record[1])?,
        });
    }
    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_batch() {
        let mut buf = Vec::new();
        let mut writer = EdgeWriter::new(&mut buf);
        assert_eq!(2, writer.write_batch(3, [1, 7]).unwrap());
        assert_eq!(0, writer.write_batch(4, std::iter::empty()).unwrap());
        writer.finish().unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!("0000000003,0000000001\n0000000003,0000000007\n", text);
        assert_eq!(
            vec![EdgeRecord { src: 3, dst: 1 }, EdgeRecord { src: 3, dst: 7 }],
            read_edges(text.as_bytes()).unwrap()
        );
    }
}
