use crate::data_structure::base::{
  EdgeKey, FaceKey, HalfEdgeKey, IndexType, VertexKey,
};
use crate::error::{MeshError, Result};

use log::debug;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::iter;
use std::ops::Range;

struct HalfEdgeRef {
  twin_idx: Option<IndexType>,
  next_idx: IndexType,
  vertex_idx: IndexType,
  edge_idx: IndexType,
  face_idx: IndexType,
}

struct VertexRef {
  // first outgoing half edge in construction order
  half_edge_idx: Option<IndexType>,
}

struct EdgeRef {
  half_edge_idx: IndexType,
}

// half edges of a face are stored contiguously
struct FaceRef {
  half_edge_idx: IndexType,
  len: IndexType,
}

/// Arena-backed half-edge adjacency over polygon faces. All links are
/// indices into the arena; the structure is immutable once built.
pub struct HalfEdgeMesh {
  half_edge_refs: Vec<HalfEdgeRef>,
  vertex_refs: Vec<VertexRef>,
  edge_refs: Vec<EdgeRef>,
  face_refs: Vec<FaceRef>,
}

impl HalfEdgeMesh {
  /// Builds the topology of `faces`, each an ordered cycle of vertex ids in
  /// `0..vertex_count`. A directed edge used by two faces is ambiguous and
  /// fails with `NonManifoldEdge`; a vertex repeated in one face fails with
  /// `DegenerateFace`.
  pub fn from_faces<F>(vertex_count: IndexType, faces: &[F]) -> Result<Self>
  where
    F: AsRef<[VertexKey]>,
  {
    let mut vertex_pair_to_half_edge_idx = HashMap::new();

    let mut half_edge_refs = Vec::<HalfEdgeRef>::new();
    let mut vertex_refs: Vec<VertexRef> = (0..vertex_count)
      .map(|_| VertexRef {
        half_edge_idx: None,
      })
      .collect();
    let mut edge_refs = Vec::new();
    let mut face_refs = Vec::with_capacity(faces.len());

    for (face_idx, face) in faces.iter().enumerate() {
      let face = face.as_ref();
      let len = face.len();

      if len < 3 {
        return Err(MeshError::DegenerateFace {
          face: face_idx,
          reason: format!("{len} corners, at least 3 are needed"),
        });
      }

      let start_idx = half_edge_refs.len() as IndexType;

      for (i, &vertex_idx) in face.iter().enumerate() {
        if vertex_idx >= vertex_count {
          return Err(MeshError::DegenerateFace {
            face: face_idx,
            reason: format!(
              "vertex {vertex_idx} out of {vertex_count} welded vertices"
            ),
          });
        }

        if face[..i].contains(&vertex_idx) {
          return Err(MeshError::DegenerateFace {
            face: face_idx,
            reason: format!("vertex {vertex_idx} appears more than once"),
          });
        }

        let half_edge_idx = start_idx + i as IndexType;
        let next_vertex_idx = face[(i + 1) % len];

        match vertex_pair_to_half_edge_idx.entry((vertex_idx, next_vertex_idx))
        {
          Entry::Occupied(_) => {
            return Err(MeshError::NonManifoldEdge {
              origin: vertex_idx,
              destination: next_vertex_idx,
              face: face_idx,
            });
          }
          Entry::Vacant(entry) => {
            entry.insert(half_edge_idx);
          }
        }

        vertex_refs[vertex_idx as usize]
          .half_edge_idx
          .get_or_insert(half_edge_idx);

        half_edge_refs.push(HalfEdgeRef {
          twin_idx: None,
          next_idx: start_idx + ((i + 1) % len) as IndexType,
          vertex_idx,
          edge_idx: 0,
          face_idx: face_idx as IndexType,
        });
      }

      face_refs.push(FaceRef {
        half_edge_idx: start_idx,
        len: len as IndexType,
      });
    }

    for half_edge_idx in 0..half_edge_refs.len() {
      let vertex_idx = half_edge_refs[half_edge_idx].vertex_idx;
      let next_idx = half_edge_refs[half_edge_idx].next_idx;
      let next_vertex_idx = half_edge_refs[next_idx as usize].vertex_idx;

      let twin_idx = vertex_pair_to_half_edge_idx
        .get(&(next_vertex_idx, vertex_idx))
        .copied();

      // the lower index of a twin pair owns the edge record
      let edge_idx = match twin_idx {
        Some(v) if (v as usize) < half_edge_idx => {
          half_edge_refs[v as usize].edge_idx
        }
        _ => {
          edge_refs.push(EdgeRef {
            half_edge_idx: half_edge_idx as IndexType,
          });
          (edge_refs.len() - 1) as IndexType
        }
      };

      let half_edge = &mut half_edge_refs[half_edge_idx];
      half_edge.twin_idx = twin_idx;
      half_edge.edge_idx = edge_idx;
    }

    let out = HalfEdgeMesh {
      half_edge_refs,
      vertex_refs,
      edge_refs,
      face_refs,
    };

    for idx in out.half_edge_keys() {
      out.verify_half_edge_valid(idx);
    }

    debug!(
      "built {} half edges, {} edges ({} boundary), {} faces",
      out.num_half_edges(),
      out.num_edges(),
      out.num_boundary_edges(),
      out.num_faces()
    );

    Ok(out)
  }

  #[cfg(debug_assertions)]
  fn verify_half_edge_valid(&self, half_edge_idx: HalfEdgeKey) {
    let half_edge = &self.half_edge_refs[half_edge_idx as usize];

    if let Some(twin_idx) = half_edge.twin_idx {
      let twin = &self.half_edge_refs[twin_idx as usize];
      debug_assert_eq!(twin.twin_idx, Some(half_edge_idx));
      debug_assert_eq!(twin.vertex_idx, self.destination(half_edge_idx));
      debug_assert_eq!(twin.edge_idx, half_edge.edge_idx);
    }

    let face = &self.face_refs[half_edge.face_idx as usize];
    let mut idx = half_edge_idx;
    for _ in 0..face.len {
      idx = self.next(idx);
      debug_assert_eq!(self.face_of(idx), half_edge.face_idx);
    }
    debug_assert_eq!(idx, half_edge_idx);
  }

  #[cfg(not(debug_assertions))]
  fn verify_half_edge_valid(&self, _: HalfEdgeKey) {}

  pub fn num_vertices(&self) -> usize {
    self.vertex_refs.len()
  }

  pub fn num_half_edges(&self) -> usize {
    self.half_edge_refs.len()
  }

  pub fn num_edges(&self) -> usize {
    self.edge_refs.len()
  }

  pub fn num_faces(&self) -> usize {
    self.face_refs.len()
  }

  pub fn vertex_keys(&self) -> Range<VertexKey> {
    0..(self.vertex_refs.len() as IndexType)
  }

  pub fn half_edge_keys(&self) -> Range<HalfEdgeKey> {
    0..(self.half_edge_refs.len() as IndexType)
  }

  pub fn edge_keys(&self) -> Range<EdgeKey> {
    0..(self.edge_refs.len() as IndexType)
  }

  pub fn face_keys(&self) -> Range<FaceKey> {
    0..(self.face_refs.len() as IndexType)
  }

  pub fn origin(&self, key: HalfEdgeKey) -> VertexKey {
    self.half_edge_refs[key as usize].vertex_idx
  }

  pub fn destination(&self, key: HalfEdgeKey) -> VertexKey {
    self.origin(self.next(key))
  }

  pub fn next(&self, key: HalfEdgeKey) -> HalfEdgeKey {
    self.half_edge_refs[key as usize].next_idx
  }

  /// Walks the face cycle, so costs the face's corner count.
  pub fn prev(&self, key: HalfEdgeKey) -> HalfEdgeKey {
    let mut idx = key;
    loop {
      let next_idx = self.next(idx);
      if next_idx == key {
        return idx;
      }
      idx = next_idx;
    }
  }

  pub fn twin(&self, key: HalfEdgeKey) -> Option<HalfEdgeKey> {
    self.half_edge_refs[key as usize].twin_idx
  }

  pub fn face_of(&self, key: HalfEdgeKey) -> FaceKey {
    self.half_edge_refs[key as usize].face_idx
  }

  pub fn edge_of(&self, key: HalfEdgeKey) -> EdgeKey {
    self.half_edge_refs[key as usize].edge_idx
  }

  pub fn outgoing(&self, key: VertexKey) -> Option<HalfEdgeKey> {
    self.vertex_refs[key as usize].half_edge_idx
  }

  pub fn face_half_edges(&self, key: FaceKey) -> Range<HalfEdgeKey> {
    let face = &self.face_refs[key as usize];
    face.half_edge_idx..(face.half_edge_idx + face.len)
  }

  pub fn face_vertices(
    &self,
    key: FaceKey,
  ) -> impl Iterator<Item = VertexKey> + '_ {
    self.face_half_edges(key).map(move |idx| self.origin(idx))
  }

  pub fn edge_half_edge(&self, key: EdgeKey) -> HalfEdgeKey {
    self.edge_refs[key as usize].half_edge_idx
  }

  pub fn edge_endpoints(&self, key: EdgeKey) -> [VertexKey; 2] {
    let half_edge_idx = self.edge_half_edge(key);
    [self.origin(half_edge_idx), self.destination(half_edge_idx)]
  }

  /// The face on each side of the edge; the second is absent on a boundary.
  pub fn edge_faces(&self, key: EdgeKey) -> (FaceKey, Option<FaceKey>) {
    let half_edge_idx = self.edge_half_edge(key);
    (
      self.face_of(half_edge_idx),
      self.twin(half_edge_idx).map(|twin_idx| self.face_of(twin_idx)),
    )
  }

  pub fn is_boundary_edge(&self, key: HalfEdgeKey) -> bool {
    self.twin(key).is_none()
  }

  pub fn num_boundary_edges(&self) -> usize {
    self
      .half_edge_keys()
      .filter(|idx| self.is_boundary_edge(*idx))
      .count()
  }

  pub fn is_closed(&self) -> bool {
    self.num_boundary_edges() == 0
  }

  /// Vertices that start at least one boundary half edge, each reported
  /// once in the order their boundary half edges were created.
  pub fn boundary_vertices(&self) -> impl Iterator<Item = VertexKey> + '_ {
    let mut seen = vec![false; self.vertex_refs.len()];

    self
      .half_edge_keys()
      .filter(move |idx| self.is_boundary_edge(*idx))
      .map(move |idx| self.origin(idx))
      .filter(move |vertex_idx| {
        !std::mem::replace(&mut seen[*vertex_idx as usize], true)
      })
  }

  /// Half edges leaving `key`, rotating `twin.next` from the recorded
  /// outgoing half edge.
  pub fn outgoing_half_edges(&self, key: VertexKey) -> VertexFan<'_> {
    VertexFan::new(self, self.outgoing(key))
  }

  pub fn faces_around_vertex(
    &self,
    key: VertexKey,
  ) -> impl Iterator<Item = FaceKey> + '_ {
    self
      .outgoing_half_edges(key)
      .map(move |idx| self.face_of(idx))
  }

  pub fn neighbors(
    &self,
    key: VertexKey,
  ) -> impl Iterator<Item = VertexKey> + '_ {
    self.outgoing_half_edges(key).flat_map(move |idx| {
      // the incoming boundary half edge is the only way to reach the far
      // end of the last fan face
      let prev_idx = self.prev(idx);
      let incoming_boundary = if self.is_boundary_edge(prev_idx) {
        Some(self.origin(prev_idx))
      } else {
        None
      };
      iter::once(self.destination(idx)).chain(incoming_boundary)
    })
  }

  pub fn degree(&self, key: VertexKey) -> usize {
    self.neighbors(key).count()
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FanState {
  Forward(HalfEdgeKey),
  Backward(HalfEdgeKey),
  Done,
}

/// Half edges around one vertex. Rotates forward via `twin.next` until it
/// comes back to the start or runs into a boundary; on a boundary it picks up
/// the rest of the fan by rotating backward via `prev.twin` from the start.
/// Finite either way.
pub struct VertexFan<'a> {
  mesh: &'a HalfEdgeMesh,
  start: HalfEdgeKey,
  state: FanState,
}

impl<'a> VertexFan<'a> {
  fn new(mesh: &'a HalfEdgeMesh, start: Option<HalfEdgeKey>) -> Self {
    match start {
      Some(start) => VertexFan {
        mesh,
        start,
        state: FanState::Forward(start),
      },
      None => VertexFan {
        mesh,
        start: 0,
        state: FanState::Done,
      },
    }
  }
}

impl<'a> Iterator for VertexFan<'a> {
  type Item = HalfEdgeKey;

  fn next(&mut self) -> Option<HalfEdgeKey> {
    match self.state {
      FanState::Forward(idx) => {
        self.state = match self.mesh.twin(idx).map(|t| self.mesh.next(t)) {
          Some(next_idx) if next_idx == self.start => FanState::Done,
          Some(next_idx) => FanState::Forward(next_idx),
          None => FanState::Backward(self.start),
        };
        Some(idx)
      }
      FanState::Backward(idx) => {
        match self.mesh.twin(self.mesh.prev(idx)) {
          Some(twin_idx) if twin_idx != self.start => {
            self.state = FanState::Backward(twin_idx);
            Some(twin_idx)
          }
          _ => {
            self.state = FanState::Done;
            None
          }
        }
      }
      FanState::Done => None,
    }
  }
}
