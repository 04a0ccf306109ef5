use indexed_mesh::{
  AttributeKind, FaceCorner, MeshBuilder, MeshError, ObjConfig,
};

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::io::Cursor;

#[rustfmt::skip]
const CUBE_POSITIONS: [f32; 24] = [
  0.0, 0.0, 0.0,
  1.0, 0.0, 0.0,
  1.0, 1.0, 0.0,
  0.0, 1.0, 0.0,
  0.0, 0.0, 1.0,
  1.0, 0.0, 1.0,
  1.0, 1.0, 1.0,
  0.0, 1.0, 1.0,
];

// counter-clockwise from outside: -z, +z, -y, +y, +x, -x
const CUBE_FACES: [[u32; 4]; 6] = [
  [0, 3, 2, 1],
  [4, 5, 6, 7],
  [0, 1, 5, 4],
  [2, 3, 7, 6],
  [1, 2, 6, 5],
  [0, 4, 7, 3],
];

#[rustfmt::skip]
const FACE_NORMALS: [f32; 18] = [
  0.0, 0.0, -1.0,
  0.0, 0.0, 1.0,
  0.0, -1.0, 0.0,
  0.0, 1.0, 0.0,
  1.0, 0.0, 0.0,
  -1.0, 0.0, 0.0,
];

fn cube_with_normals(per_face: bool) -> MeshBuilder {
  let mut builder = MeshBuilder::new();
  builder
    .register(AttributeKind::Position, CUBE_POSITIONS.to_vec(), 3)
    .unwrap();

  if per_face {
    builder
      .register(AttributeKind::Normal, FACE_NORMALS.to_vec(), 3)
      .unwrap();
  } else {
    // one radial normal per corner position
    let normals = CUBE_POSITIONS.iter().map(|v| v - 0.5).collect();
    builder.register(AttributeKind::Normal, normals, 3).unwrap();
  }

  // uvs follow the position so they never split a vertex on their own
  let uvs = CUBE_POSITIONS
    .chunks_exact(3)
    .flat_map(|p| [p[0], p[1] + p[2]])
    .collect();
  builder.register(AttributeKind::TexCoord, uvs, 2).unwrap();

  for (face_idx, face) in CUBE_FACES.iter().enumerate() {
    let corners: Vec<_> = face
      .iter()
      .map(|&i| {
        let normal = if per_face { face_idx as u32 } else { i };
        FaceCorner::position(i)
          .with(AttributeKind::Normal, normal)
          .with(AttributeKind::TexCoord, i)
      })
      .collect();
    builder.add_face(&corners).unwrap();
  }

  builder
}

fn tetrahedron() -> MeshBuilder {
  let mut builder = MeshBuilder::new();
  builder
    .register(
      AttributeKind::Position,
      vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
      3,
    )
    .unwrap();
  for face in &[[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]] {
    let corners: Vec<_> =
      face.iter().map(|&i| FaceCorner::position(i)).collect();
    builder.add_face(&corners).unwrap();
  }
  builder
}

#[test]
fn cube_with_shared_normals_welds_to_eight() {
  let mesh = cube_with_normals(false).build().unwrap();
  assert_eq!(mesh.vertex_count(), 8);
  assert!(mesh.topology().is_closed());
  assert_eq!(mesh.topology().num_edges(), 12);

  let buffers = mesh.to_buffers();
  assert_eq!(buffers.indexes.len(), 36);
  let normals = buffers.attribute(AttributeKind::Normal).unwrap();
  assert_eq!(normals.values.len(), 24);
}

#[test]
fn cube_with_face_normals_welds_to_twenty_four() {
  let mesh = cube_with_normals(true).build().unwrap();
  assert_eq!(mesh.vertex_count(), 24);

  // no two faces share a welded vertex, so every face is an island
  let topology = mesh.topology();
  assert_eq!(topology.num_boundary_edges(), 24);
  assert_eq!(topology.boundary_vertices().count(), 24);

  let buffers = mesh.to_buffers();
  for kind in [AttributeKind::Position, AttributeKind::Normal] {
    assert_eq!(buffers.attribute(kind).unwrap().values.len(), 72);
  }
  assert_eq!(
    buffers.attribute(AttributeKind::TexCoord).unwrap().values.len(),
    48
  );
}

#[test]
fn tetrahedron_has_no_boundary() {
  let mesh = tetrahedron().build().unwrap();
  let topology = mesh.topology();
  assert_eq!(topology.num_faces(), 4);
  assert_eq!(topology.num_edges(), 6);
  assert_eq!(topology.boundary_vertices().next(), None);

  for idx in topology.half_edge_keys() {
    let twin_idx = topology.twin(idx).unwrap();
    assert_eq!(topology.twin(twin_idx), Some(idx));
  }
}

#[test]
fn split_quad_has_four_boundary_edges() {
  let mut builder = MeshBuilder::new();
  builder
    .register(
      AttributeKind::Position,
      vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
      3,
    )
    .unwrap();
  for face in &[[0, 1, 2], [0, 2, 3]] {
    let corners: Vec<_> =
      face.iter().map(|&i| FaceCorner::position(i)).collect();
    builder.add_face(&corners).unwrap();
  }
  let mesh = builder.build().unwrap();
  let topology = mesh.topology();

  let mut interior = Vec::new();
  let mut boundary = 0;
  for idx in topology.half_edge_keys() {
    if topology.is_boundary_edge(idx) {
      boundary += 1;
    } else {
      interior.push((topology.origin(idx), topology.destination(idx)));
    }
  }
  assert_eq!(boundary, 4);
  assert_eq!(interior, vec![(2, 0), (0, 2)]);
}

#[test]
fn building_twice_is_identical() {
  let builder = cube_with_normals(true);
  let first = builder.build().unwrap().to_buffers();
  let second = builder.build().unwrap().to_buffers();
  assert_eq!(first, second);
}

#[test]
fn indexes_stay_below_vertex_count() {
  for per_face in [false, true] {
    let buffers = cube_with_normals(per_face).build().unwrap().to_buffers();
    assert!(buffers.indexes.iter().all(|&i| i < buffers.vertex_count));
  }
}

#[test]
fn zero_dimension_is_invalid() {
  let mut builder = MeshBuilder::new();
  let err = builder
    .register(AttributeKind::Position, vec![], 0)
    .unwrap_err();
  assert!(matches!(err, MeshError::InvalidAttribute { .. }));
}

#[test]
fn index_at_sample_count_is_out_of_range() {
  let mut builder = tetrahedron();
  let corners = [
    FaceCorner::position(0),
    FaceCorner::position(1),
    FaceCorner::position(4),
  ];
  let err = builder.add_face(&corners).unwrap_err();
  assert!(matches!(
    err,
    MeshError::IndexOutOfRange {
      attribute: AttributeKind::Position,
      face: 4,
      corner: 2,
      index: 4,
      len: 4,
    }
  ));
}

#[test]
fn missing_stream_fails_build() {
  let mut builder = MeshBuilder::new();
  let corners: Vec<_> = (0..3)
    .map(|i| FaceCorner::new().with(AttributeKind::Normal, i))
    .collect();
  builder.add_face(&corners).unwrap();
  assert!(matches!(
    builder.build(),
    Err(MeshError::MissingAttribute {
      attribute: AttributeKind::Normal,
      ..
    })
  ));
}

#[test]
fn jittered_grid_keeps_near_duplicates_apart() {
  const N: u32 = 12;
  let mut rng = StdRng::seed_from_u64(7);
  let noise = Normal::new(0.0, 1e-4).unwrap();

  // every grid cell gets its own copy of its four corner positions; half of
  // the cells are jittered so their copies no longer match the neighbors
  let mut positions = Vec::new();
  let mut faces = Vec::new();
  for y in 0..N {
    for x in 0..N {
      let jitter = (x + y) % 2 == 1;
      let base = (positions.len() / 3) as u32;
      for (dx, dy) in [(0, 0), (1, 0), (1, 1), (0, 1)] {
        let mut p = [(x + dx) as f32, (y + dy) as f32, 0.0];
        if jitter {
          for v in &mut p {
            *v += noise.sample(&mut rng);
          }
        }
        positions.extend_from_slice(&p);
      }
      faces.push([base, base + 1, base + 2, base + 3]);
    }
  }

  let mut builder = MeshBuilder::new();
  builder
    .register(AttributeKind::Position, positions, 3)
    .unwrap();
  for face in &faces {
    let corners: Vec<_> =
      face.iter().map(|&i| FaceCorner::position(i)).collect();
    builder.add_face(&corners).unwrap();
  }

  let mesh = builder.build().unwrap();
  let jittered = (N * N / 2) * 4;
  let exact = (0..=N)
    .flat_map(|y| (0..=N).map(move |x| (x, y)))
    .filter(|&(x, y)| {
      // grid points touched by at least one un-jittered cell
      [(0, 0), (1, 0), (0, 1), (1, 1)].iter().any(|&(dx, dy)| {
        x >= dx
          && y >= dy
          && x - dx < N
          && y - dy < N
          && (x - dx + y - dy) % 2 == 0
      })
    })
    .count() as u32;
  assert_eq!(mesh.vertex_count(), jittered + exact);

  let again = builder.build().unwrap();
  assert_eq!(mesh.welded(), again.welded());
}

#[test]
fn obj_corners_are_multi_indexed() {
  let obj = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
f 1/1/1 4/4/1 4/4/1
";
  let config = ObjConfig::default();
  let err = MeshBuilder::from_obj_buf(&mut Cursor::new(obj), &config)
    .and_then(|builder| builder.build().map(|_| ()))
    .unwrap_err();
  assert!(matches!(err, MeshError::DegenerateFace { face: 1, .. }));

  let obj = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";
  let builder =
    MeshBuilder::from_obj_buf(&mut Cursor::new(obj), &config).unwrap();
  let corner = builder.faces().face(0)[2];
  assert_eq!(corner.get(AttributeKind::Position), Some(2));
  assert_eq!(corner.get(AttributeKind::TexCoord), Some(2));
  assert_eq!(corner.get(AttributeKind::Normal), Some(0));

  let mesh = builder.build().unwrap();
  assert_eq!(mesh.vertex_count(), 4);
  assert_eq!(mesh.topology().num_faces(), 1);
  assert_eq!(mesh.topology().face_half_edges(0).len(), 4);

  let buffers = mesh.to_buffers();
  assert_eq!(buffers.indexes, vec![0, 1, 2, 0, 2, 3]);
  assert_relative_eq!(
    buffers.sample(AttributeKind::TexCoord, 2).unwrap()[1],
    1.0
  );
}

#[test]
fn homogeneous_obj_pads_components() {
  let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
vt 0 0
vt 1 0
vt 0 1
f 1/1/1 2/2/1 3/3/1
";
  let config = ObjConfig {
    homogeneous: true,
    texcoord_dimension: 3,
  };
  let buffers = MeshBuilder::from_obj_buf(&mut Cursor::new(obj), &config)
    .unwrap()
    .build()
    .unwrap()
    .to_buffers();

  assert_eq!(
    buffers.sample(AttributeKind::Position, 1),
    Some(&[1.0, 0.0, 0.0, 1.0][..])
  );
  assert_eq!(
    buffers.sample(AttributeKind::Normal, 0),
    Some(&[0.0, 0.0, 1.0, 1.0][..])
  );
  assert_eq!(
    buffers.sample(AttributeKind::TexCoord, 2),
    Some(&[0.0, 1.0, 0.0][..])
  );
}

#[test]
fn built_mesh_is_shareable() {
  fn assert_send_sync<T: Send + Sync>() {}
  assert_send_sync::<indexed_mesh::Mesh>();

  let mesh = tetrahedron().build().unwrap();
  std::thread::scope(|s| {
    for vertex_idx in mesh.topology().vertex_keys() {
      let mesh = &mesh;
      s.spawn(move || {
        assert_eq!(mesh.topology().neighbors(vertex_idx).count(), 3);
      });
    }
  });
}
