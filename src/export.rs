use crate::attribute::AttributeKind;
use crate::data_structure::{IndexType, VertexKey};
use crate::error::{MeshError, Result};
use crate::weld::Welded;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufWriter;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttributeBuffer {
  pub dimension: usize,
  pub values: Vec<f32>,
}

/// One value array per attribute, each holding `vertex_count` samples, plus
/// the shared triangle index buffer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffers {
  pub attributes: BTreeMap<AttributeKind, AttributeBuffer>,
  pub indexes: Vec<IndexType>,
  pub vertex_count: IndexType,
}

impl Buffers {
  pub fn from_welded(welded: &Welded) -> Self {
    let attributes = welded
      .attributes()
      .iter()
      .map(|(kind, stream)| {
        (
          *kind,
          AttributeBuffer {
            dimension: stream.dimension(),
            values: stream.values().to_vec(),
          },
        )
      })
      .collect();

    Buffers {
      attributes,
      indexes: welded.indexes().to_vec(),
      vertex_count: welded.vertex_count(),
    }
  }

  pub fn attribute(&self, kind: AttributeKind) -> Option<&AttributeBuffer> {
    self.attributes.get(&kind)
  }

  pub fn sample(&self, kind: AttributeKind, key: VertexKey) -> Option<&[f32]> {
    let buffer = self.attribute(kind)?;
    let start = key as usize * buffer.dimension;
    buffer.values.get(start..start + buffer.dimension)
  }

  pub fn num_triangles(&self) -> usize {
    self.indexes.len() / 3
  }

  pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, self)
      .map_err(std::io::Error::from)?;
    writer.flush()?;
    Ok(())
  }

  /// Writes a single-indexed OBJ: every `v`/`vn`/`vt` line is one welded
  /// vertex and every face corner uses the same (1-based) index for all of
  /// its attributes.
  pub fn write_obj_to<W: Write>(&self, writer: &mut W) -> Result<()> {
    let positions =
      self
        .attribute(AttributeKind::Position)
        .ok_or(MeshError::MissingAttribute {
          attribute: AttributeKind::Position,
          face: 0,
          corner: 0,
        })?;
    let normals = self.attribute(AttributeKind::Normal);
    let texcoords = self.attribute(AttributeKind::TexCoord);

    write_samples(writer, "v", positions)?;
    if let Some(texcoords) = texcoords {
      write_samples(writer, "vt", texcoords)?;
    }
    if let Some(normals) = normals {
      write_samples(writer, "vn", normals)?;
    }

    for face in self.indexes.chunks_exact(3) {
      write!(writer, "f")?;
      for idx in face {
        let idx = idx + 1;
        match (texcoords.is_some(), normals.is_some()) {
          (false, false) => write!(writer, " {}", idx)?,
          (true, false) => write!(writer, " {}/{}", idx, idx)?,
          (false, true) => write!(writer, " {}//{}", idx, idx)?,
          (true, true) => write!(writer, " {}/{}/{}", idx, idx, idx)?,
        }
      }
      writeln!(writer)?;
    }

    Ok(())
  }

  pub fn write_obj(&self, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    self.write_obj_to(&mut writer)?;
    writer.flush()?;
    Ok(())
  }
}

fn write_samples<W: Write>(
  writer: &mut W,
  tag: &str,
  buffer: &AttributeBuffer,
) -> Result<()> {
  for sample in buffer.values.chunks_exact(buffer.dimension) {
    write!(writer, "{}", tag)?;
    for value in sample {
      write!(writer, " {}", value)?;
    }
    writeln!(writer)?;
  }
  Ok(())
}
