use crate::data_structure::Vector3;

/// Newell normal of a polygon, zero when the polygon has no area.
pub fn get_normal(vertices: &[Vector3]) -> Vector3 {
  let mut normal = Vector3::zeros();
  for (i, vertex) in vertices.iter().enumerate() {
    normal += vertex.cross(&vertices[(i + 1) % vertices.len()]);
  }
  normal.try_normalize(0.0).unwrap_or_else(Vector3::zeros)
}

/// First three components of a sample, zero filled when it has fewer.
pub fn to_vector3(sample: &[f32]) -> Vector3 {
  let component = |i: usize| sample.get(i).copied().unwrap_or(0.0);
  Vector3::new(component(0), component(1), component(2))
}
