mod base;
pub use base::EdgeKey;
pub use base::FaceKey;
pub use base::HalfEdgeKey;
pub use base::IndexType;
pub use base::Vector3;
pub use base::VertexKey;

mod half_edge;
pub use half_edge::HalfEdgeMesh;
pub use half_edge::VertexFan;
