use crate::attribute::AttributeKind;
use crate::config::SilhouetteConfig;
use crate::data_structure::{EdgeKey, FaceKey, Vector3, VertexKey};
use crate::error::{MeshError, Result};
use crate::export::Buffers;
use crate::mesh::Mesh;
use crate::utils::{get_normal, to_vector3};

fn missing(attribute: AttributeKind) -> MeshError {
  MeshError::MissingAttribute {
    attribute,
    face: 0,
    corner: 0,
  }
}

/// Vertices whose normal makes a cosine below `config.cos_threshold` with
/// `config.view`. Zero-length normals are never reported.
pub fn facing_away(
  buffers: &Buffers,
  config: &SilhouetteConfig,
) -> Result<Vec<VertexKey>> {
  let normals = buffers
    .attribute(AttributeKind::Normal)
    .ok_or_else(|| missing(AttributeKind::Normal))?;
  let view = config.view.normalize();

  Ok(
    normals
      .values
      .chunks_exact(normals.dimension)
      .enumerate()
      .filter_map(|(vertex_idx, sample)| {
        let normal = to_vector3(sample);
        let len = normal.norm();
        if len > 0.0 && normal.dot(&view) / len < config.cos_threshold {
          Some(vertex_idx as VertexKey)
        } else {
          None
        }
      })
      .collect(),
  )
}

pub fn face_normal(
  mesh: &Mesh,
  buffers: &Buffers,
  face: FaceKey,
) -> Result<Vector3> {
  let corners = mesh
    .topology()
    .face_vertices(face)
    .map(|vertex_idx| {
      buffers
        .sample(AttributeKind::Position, vertex_idx)
        .map(to_vector3)
        .ok_or_else(|| missing(AttributeKind::Position))
    })
    .collect::<Result<Vec<_>>>()?;
  Ok(get_normal(&corners))
}

/// Boundary edges plus edges between a face turned toward the viewer and one
/// turned away.
pub fn silhouette_edges(
  mesh: &Mesh,
  config: &SilhouetteConfig,
) -> Result<Vec<EdgeKey>> {
  let buffers = mesh.to_buffers();
  let topology = mesh.topology();

  let front_facing = topology
    .face_keys()
    .map(|face| {
      face_normal(mesh, &buffers, face).map(|n| n.dot(&config.view) > 0.0)
    })
    .collect::<Result<Vec<_>>>()?;

  Ok(
    topology
      .edge_keys()
      .filter(|edge| match topology.edge_faces(*edge) {
        (_, None) => true,
        (left, Some(right)) => {
          front_facing[left as usize] != front_facing[right as usize]
        }
      })
      .collect(),
  )
}
