pub type IndexType = u32;

pub type Vector3 = nalgebra::Vector3<f32>;

pub type VertexKey = IndexType;
pub type HalfEdgeKey = IndexType;
pub type EdgeKey = IndexType;
pub type FaceKey = IndexType;
