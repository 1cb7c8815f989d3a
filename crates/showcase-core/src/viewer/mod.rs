//! 3D product viewer: scene description, mesh generation, orbit camera and
//! the construct / run / dispose lifecycle.

pub mod lifecycle;
pub mod mesh;
pub mod orbit;
pub mod scene;

pub use lifecycle::{
    DrawItem, FrameView, GraphicsBackend, Viewer, ViewerCommand, ViewerState, CAMERA_TARGET,
};
pub use mesh::{MeshData, Vertex};
pub use orbit::{OrbitControls, OrbitParams};
pub use scene::{GeometryDesc, LightDesc, LightKind, MaterialDesc, PropKind, SceneDesc};
