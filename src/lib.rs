pub mod attribute;
pub mod config;
pub mod data_structure;
pub mod error;
pub mod export;
pub mod face;
pub mod mesh;
pub mod silhouette;
mod utils;
pub mod weld;

pub use attribute::AttributeKind;
pub use attribute::AttributeTable;

pub use config::ObjConfig;
pub use config::SilhouetteConfig;

pub use data_structure::HalfEdgeMesh;
pub use data_structure::IndexType;
pub use data_structure::Vector3;

pub use error::MeshError;
pub use error::Result;

pub use export::Buffers;

pub use face::FaceCorner;
pub use face::FaceIndexSet;

pub use mesh::Mesh;
pub use mesh::MeshBuilder;
