use crate::attribute::{AttributeKind, AttributeTable};
use crate::error::{MeshError, Result};

/// One vertex occurrence inside a face: a 0-based sample index into each
/// attribute stream the corner reads from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FaceCorner {
  indices: [Option<u32>; AttributeKind::COUNT],
}

impl FaceCorner {
  pub fn new() -> Self {
    Self::default()
  }

  /// A corner that only reads a position.
  pub fn position(idx: u32) -> Self {
    Self::new().with(AttributeKind::Position, idx)
  }

  pub fn with(mut self, kind: AttributeKind, idx: u32) -> Self {
    self.indices[kind.slot()] = Some(idx);
    self
  }

  pub fn set(&mut self, kind: AttributeKind, idx: Option<u32>) {
    self.indices[kind.slot()] = idx;
  }

  pub fn get(&self, kind: AttributeKind) -> Option<u32> {
    self.indices[kind.slot()]
  }

  /// Attribute kinds this corner references, in key order.
  pub fn kinds(&self) -> impl Iterator<Item = AttributeKind> + '_ {
    AttributeKind::ALL
      .iter()
      .copied()
      .filter(move |kind| self.get(*kind).is_some())
  }
}

#[derive(Clone, Debug, Default)]
pub struct FaceIndexSet {
  corners: Vec<FaceCorner>,
  face_starts: Vec<usize>,
}

impl FaceIndexSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a face and returns its index. Corner indices are checked
  /// against whatever streams `table` holds right now; kinds without a
  /// stream yet are checked again when the mesh is built.
  pub fn add_face(
    &mut self,
    corners: &[FaceCorner],
    table: &AttributeTable,
  ) -> Result<usize> {
    let face = self.face_starts.len();

    if corners.len() < 3 {
      return Err(MeshError::DegenerateFace {
        face,
        reason: format!("{} corners, at least 3 are needed", corners.len()),
      });
    }

    for (corner_idx, corner) in corners.iter().enumerate() {
      for kind in corner.kinds() {
        if table.contains(kind) {
          check_range(table, kind, corner, face, corner_idx)?;
        }
      }
    }

    self.face_starts.push(self.corners.len());
    self.corners.extend_from_slice(corners);

    Ok(face)
  }

  pub fn num_faces(&self) -> usize {
    self.face_starts.len()
  }

  pub fn num_corners(&self) -> usize {
    self.corners.len()
  }

  pub fn is_empty(&self) -> bool {
    self.face_starts.is_empty()
  }

  pub fn face(&self, face: usize) -> &[FaceCorner] {
    let start = self.face_starts[face];
    let end = self
      .face_starts
      .get(face + 1)
      .copied()
      .unwrap_or(self.corners.len());
    &self.corners[start..end]
  }

  pub fn faces(&self) -> impl Iterator<Item = &[FaceCorner]> + '_ {
    (0..self.num_faces()).map(move |face| self.face(face))
  }

  /// Kinds every corner must reference: those of the first corner.
  pub fn layout(&self) -> Vec<AttributeKind> {
    self
      .corners
      .first()
      .map(|corner| corner.kinds().collect())
      .unwrap_or_default()
  }

  /// Full check run before welding: every corner references exactly the
  /// layout kinds, each of which has a stream holding the referenced sample.
  pub fn validate(&self, table: &AttributeTable) -> Result<Vec<AttributeKind>> {
    let layout = self.layout();
    if layout.is_empty() && !self.is_empty() {
      return Err(MeshError::MissingAttribute {
        attribute: AttributeKind::Position,
        face: 0,
        corner: 0,
      });
    }

    for (face, corners) in self.faces().enumerate() {
      for (corner_idx, corner) in corners.iter().enumerate() {
        if let Some(kind) = AttributeKind::ALL.iter().copied().find(|kind| {
          corner.get(*kind).is_some() != layout.contains(kind)
        }) {
          // Name the kind the layout expects; an extra kind on this corner
          // means the first corner is the one missing it.
          let (face, corner_idx) = if layout.contains(&kind) {
            (face, corner_idx)
          } else {
            (0, 0)
          };
          return Err(MeshError::MissingAttribute {
            attribute: kind,
            face,
            corner: corner_idx,
          });
        }

        for &kind in &layout {
          if !table.contains(kind) {
            return Err(MeshError::MissingAttribute {
              attribute: kind,
              face,
              corner: corner_idx,
            });
          }
          check_range(table, kind, corner, face, corner_idx)?;
        }
      }
    }

    Ok(layout)
  }
}

fn check_range(
  table: &AttributeTable,
  kind: AttributeKind,
  corner: &FaceCorner,
  face: usize,
  corner_idx: usize,
) -> Result<()> {
  let (Some(stream), Some(index)) = (table.get(kind), corner.get(kind)) else {
    return Ok(());
  };

  if (index as usize) >= stream.len() {
    return Err(MeshError::IndexOutOfRange {
      attribute: kind,
      face,
      corner: corner_idx,
      index,
      len: stream.len(),
    });
  }

  Ok(())
}
