use crate::attribute::{AttributeKind, AttributeTable};
use crate::config::ObjConfig;
use crate::data_structure::{HalfEdgeMesh, IndexType};
use crate::error::Result;
use crate::export::Buffers;
use crate::face::{FaceCorner, FaceIndexSet};
use crate::weld::{weld, Welded};

use log::info;
use std::io::BufRead;
use std::path::Path;

/// Collects attribute streams and multi-indexed faces, then builds a
/// [`Mesh`] in one pass.
#[derive(Clone, Debug, Default)]
pub struct MeshBuilder {
  attributes: AttributeTable,
  faces: FaceIndexSet,
}

impl MeshBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replaces any stream already registered for `kind`.
  pub fn register(
    &mut self,
    kind: AttributeKind,
    values: Vec<f32>,
    dimension: usize,
  ) -> Result<()> {
    self.attributes.register(kind, values, dimension)
  }

  pub fn register_named(
    &mut self,
    name: &str,
    values: Vec<f32>,
    dimension: usize,
  ) -> Result<()> {
    self.register(name.parse()?, values, dimension)
  }

  pub fn add_face(&mut self, corners: &[FaceCorner]) -> Result<usize> {
    self.faces.add_face(corners, &self.attributes)
  }

  pub fn attributes(&self) -> &AttributeTable {
    &self.attributes
  }

  pub fn faces(&self) -> &FaceIndexSet {
    &self.faces
  }

  /// Welds the corners and builds the topology. Nothing is returned unless
  /// both stages succeed.
  pub fn build(&self) -> Result<Mesh> {
    let welded = weld(&self.attributes, &self.faces)?;
    let topology =
      HalfEdgeMesh::from_faces(welded.vertex_count(), welded.polygons())?;

    Ok(Mesh { welded, topology })
  }

  pub fn from_obj(path: &Path, config: &ObjConfig) -> Result<Self> {
    let (models, _) = tobj::load_obj(path, &load_options())?;
    info!("loaded {} models from {}", models.len(), path.display());
    Self::from_models(&models, config)
  }

  pub fn from_obj_buf<R: BufRead>(
    reader: &mut R,
    config: &ObjConfig,
  ) -> Result<Self> {
    let (models, _) =
      tobj::load_obj_buf(reader, &load_options(), |_| Ok(Default::default()))?;
    Self::from_models(&models, config)
  }

  /// Merges every model into one builder, shifting each model's indices past
  /// the samples of the models before it.
  pub fn from_models(
    models: &[tobj::Model],
    config: &ObjConfig,
  ) -> Result<Self> {
    config.validate()?;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut texcoords = Vec::new();
    let mut faces = Vec::new();

    for m in models {
      let mesh = &m.mesh;

      let position_offset =
        (positions.len() / config.position_dimension()) as IndexType;
      let normal_offset =
        (normals.len() / config.normal_dimension()) as IndexType;
      let texcoord_offset =
        (texcoords.len() / config.texcoord_dimension) as IndexType;

      for vals in mesh.positions.chunks_exact(3) {
        positions.extend_from_slice(vals);
        if config.homogeneous {
          positions.push(1.0);
        }
      }

      for vals in mesh.normals.chunks_exact(3) {
        normals.extend_from_slice(vals);
        if config.homogeneous {
          normals.push(1.0);
        }
      }

      for vals in mesh.texcoords.chunks_exact(2) {
        texcoords.extend_from_slice(vals);
        if config.texcoord_dimension == 3 {
          texcoords.push(0.0);
        }
      }

      // tobj reports index 0 for a normal or texcoord a face leaves out
      // whenever other faces of the model carry one
      let corner = |i: usize| {
        let mut corner =
          FaceCorner::position(mesh.indices[i] + position_offset);
        corner.set(
          AttributeKind::Normal,
          mesh.normal_indices.get(i).map(|idx| idx + normal_offset),
        );
        corner.set(
          AttributeKind::TexCoord,
          mesh.texcoord_indices.get(i).map(|idx| idx + texcoord_offset),
        );
        corner
      };

      if mesh.face_arities.is_empty() {
        for start in (0..mesh.indices.len()).step_by(3) {
          let end = (start + 3).min(mesh.indices.len());
          faces.push((start..end).map(&corner).collect::<Vec<_>>());
        }
      } else {
        let mut start = 0;
        for &arity in &mesh.face_arities {
          let end = start + arity as usize;
          faces.push((start..end).map(&corner).collect::<Vec<_>>());
          start = end;
        }
      }

      info!(
        "model {}: {} positions, {} normals, {} texcoords",
        m.name,
        mesh.positions.len() / 3,
        mesh.normals.len() / 3,
        mesh.texcoords.len() / 2
      );
    }

    let mut builder = MeshBuilder::new();
    builder.register(
      AttributeKind::Position,
      positions,
      config.position_dimension(),
    )?;
    if !normals.is_empty() {
      builder.register(
        AttributeKind::Normal,
        normals,
        config.normal_dimension(),
      )?;
    }
    if !texcoords.is_empty() {
      builder.register(
        AttributeKind::TexCoord,
        texcoords,
        config.texcoord_dimension,
      )?;
    }

    for face in &faces {
      builder.add_face(face)?;
    }

    info!(
      "loaded {} faces and {} corners",
      builder.faces.num_faces(),
      builder.faces.num_corners()
    );

    Ok(builder)
  }
}

fn load_options() -> tobj::LoadOptions {
  tobj::LoadOptions {
    single_index: false,
    triangulate: false,
    ignore_points: true,
    ignore_lines: true,
    ..Default::default()
  }
}

/// A built mesh: welded vertex data plus its half-edge topology. Read-only,
/// so it can be shared across threads freely.
pub struct Mesh {
  welded: Welded,
  topology: HalfEdgeMesh,
}

impl Mesh {
  pub fn welded(&self) -> &Welded {
    &self.welded
  }

  pub fn topology(&self) -> &HalfEdgeMesh {
    &self.topology
  }

  pub fn vertex_count(&self) -> IndexType {
    self.welded.vertex_count()
  }

  pub fn to_buffers(&self) -> Buffers {
    Buffers::from_welded(&self.welded)
  }
}
