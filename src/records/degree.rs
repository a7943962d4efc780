use crate::core::ids::{VertexId, format_vertex_id, parse_vertex_id};
use anyhow::{Context, bail};
use std::io::{Read, Write};

/// One line of the vertex or rank file: `id,outDegree,inDegree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegreeRecord {
    pub id: VertexId,
    pub out_degree: u32,
    pub in_degree: u32,
}

impl DegreeRecord {
    pub fn new(id: VertexId, out_degree: u32, in_degree: u32) -> Self {
        Self {
            id,
            out_degree,
            in_degree,
        }
    }
}

pub struct DegreeReader<R: Read> {
    inner: csv::Reader<R>,
    record: csv::StringRecord,
}

impl<R: Read> DegreeReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_reader(reader),
            record: csv::StringRecord::new(),
        }
    }

    fn parse_current(&self) -> anyhow::Result<DegreeRecord> {
        let line = self.record.position().map_or(0, |p| p.line());
        if self.record.len() != 3 {
            bail!(
                "line {}: expected 3 fields, found {}",
                line,
                self.record.len()
            );
        }
        let id = parse_vertex_id(&self.record[0]).with_context(|| format!("line {}", line))?;
        let out_degree = self.record[1]
            .parse::<u32>()
            .with_context(|| format!("line {}: invalid out-degree {:?}", line, &self.record[1]))?;
        let in_degree = self.record[2]
            .parse::<u32>()
            .with_context(|| format!("line {}: invalid in-degree {:?}", line, &self.record[2]))?;
        Ok(DegreeRecord::new(id, out_degree, in_degree))
    }
}

impl<R: Read> Iterator for DegreeReader<R> {
    type Item = anyhow::Result<DegreeRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.read_record(&mut self.record) {
            Ok(true) => Some(self.parse_current()),
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}

pub struct DegreeWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl<W: Write> DegreeWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(writer),
        }
    }

    pub fn write(&mut self, record: &DegreeRecord) -> anyhow::Result<()> {
        self.inner.write_record([
            format_vertex_id(record.id),
            record.out_degree.to_string(),
            record.in_degree.to_string(),
        ])?;
        Ok(())
    }

    pub fn finish(mut self) -> anyhow::Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}
