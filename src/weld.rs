//! Collapses multi-indexed face corners into single-indexed vertices.
//!
//! A corner's identity is the concatenation of its attribute *values* (not
//! indices) in `AttributeKind` order. Equal keys weld to one vertex; ids are
//! handed out in first-seen order so the output is deterministic. Values are
//! compared exactly, so samples that differ only by float noise stay apart.

use crate::attribute::{AttributeKind, AttributeStream, AttributeTable};
use crate::data_structure::IndexType;
use crate::error::{MeshError, Result};
use crate::face::{FaceCorner, FaceIndexSet};

use log::{debug, warn};
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;
use std::collections::HashMap;

/// Output of the weld: one sample per vertex id for each attribute in the
/// layout, the polygons rewritten in vertex ids, and the fan-triangulated
/// index buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Welded {
  vertex_count: IndexType,
  attributes: BTreeMap<AttributeKind, AttributeStream>,
  polygons: Vec<Vec<IndexType>>,
  indexes: Vec<IndexType>,
}

impl Welded {
  pub fn vertex_count(&self) -> IndexType {
    self.vertex_count
  }

  pub fn attributes(&self) -> &BTreeMap<AttributeKind, AttributeStream> {
    &self.attributes
  }

  pub fn attribute(&self, kind: AttributeKind) -> Option<&AttributeStream> {
    self.attributes.get(&kind)
  }

  /// Faces in vertex ids, with their input corner counts.
  pub fn polygons(&self) -> &[Vec<IndexType>] {
    &self.polygons
  }

  /// Triangle list: `[0, 1, 2], [0, 2, 3], ...` per polygon.
  pub fn indexes(&self) -> &[IndexType] {
    &self.indexes
  }
}

pub fn weld(table: &AttributeTable, faces: &FaceIndexSet) -> Result<Welded> {
  if faces.is_empty() {
    return Err(MeshError::EmptyMesh);
  }

  let layout = faces.validate(table)?;

  for kind in table.kinds().filter(|kind| !layout.contains(kind)) {
    warn!("{} stream is not referenced by any face corner, dropping", kind);
  }

  let mut streams = Vec::with_capacity(layout.len());
  for &kind in &layout {
    let stream = table.get(kind).ok_or(MeshError::MissingAttribute {
      attribute: kind,
      face: 0,
      corner: 0,
    })?;
    streams.push((kind, stream));
  }

  let mut key_to_id: HashMap<Vec<OrderedFloat<f32>>, IndexType> =
    HashMap::new();
  let mut out_values: Vec<Vec<f32>> = vec![Vec::new(); streams.len()];
  let mut polygons = Vec::with_capacity(faces.num_faces());
  let mut indexes = Vec::new();
  let mut key = Vec::new();

  for (face_idx, corners) in faces.faces().enumerate() {
    let mut polygon = Vec::with_capacity(corners.len());

    for (corner_idx, corner) in corners.iter().enumerate() {
      key.clear();
      for &(kind, stream) in &streams {
        let sample = corner_sample(stream, kind, corner, face_idx, corner_idx)?;
        key.extend(sample.iter().copied().map(OrderedFloat));
      }

      let vertex_idx = match key_to_id.get(&key) {
        Some(v) => *v,
        None => {
          let vertex_idx = key_to_id.len() as IndexType;
          key_to_id.insert(key.clone(), vertex_idx);
          for (values, &(kind, stream)) in out_values.iter_mut().zip(&streams)
          {
            let sample =
              corner_sample(stream, kind, corner, face_idx, corner_idx)?;
            values.extend_from_slice(sample);
          }
          vertex_idx
        }
      };

      polygon.push(vertex_idx);
    }

    for i in 1..polygon.len() - 1 {
      indexes.extend_from_slice(&[polygon[0], polygon[i], polygon[i + 1]]);
    }

    polygons.push(polygon);
  }

  let vertex_count = key_to_id.len() as IndexType;

  let mut attributes = BTreeMap::new();
  for (values, &(kind, stream)) in out_values.into_iter().zip(&streams) {
    attributes.insert(
      kind,
      AttributeStream::new(kind, values, stream.dimension())?,
    );
  }

  debug!(
    "welded {} corners into {} vertices ({} triangles)",
    faces.num_corners(),
    vertex_count,
    indexes.len() / 3
  );

  Ok(Welded {
    vertex_count,
    attributes,
    polygons,
    indexes,
  })
}

fn corner_sample<'a>(
  stream: &'a AttributeStream,
  kind: AttributeKind,
  corner: &FaceCorner,
  face: usize,
  corner_idx: usize,
) -> Result<&'a [f32]> {
  let index = corner.get(kind).ok_or(MeshError::MissingAttribute {
    attribute: kind,
    face,
    corner: corner_idx,
  })?;

  stream.sample(index).ok_or(MeshError::IndexOutOfRange {
    attribute: kind,
    face,
    corner: corner_idx,
    index,
    len: stream.len(),
  })
}
