//! Hotspot Core - Engine-independent viewer logic
//!
//! This crate holds everything the viewer does that does not need a renderer:
//! - Occlusion testing against an abstract scene query
//! - The hotspot marker state machine and its fade animation
//! - Material switching across the loaded mesh collection
//! - Orbit camera math
//! - Equirectangular HDRI to cubemap conversion
//! - Edge extraction for line-rendered wireframes
//! - Viewer configuration and color parsing

pub mod color;
pub mod config;
pub mod cubemap;
pub mod edges;
pub mod fade;
pub mod hotspot;
pub mod material;
pub mod occlusion;
pub mod orbit;

pub use color::{ColorError, Rgba};
pub use config::{ConfigError, ViewerConfig, load_config, save_default_config};
pub use cubemap::{CubeFace, CubemapError, EquirectImage, equirect_to_cubemap};
pub use edges::unique_edges;
pub use fade::{Fade, FadeAnimation, FadeTiming};
pub use hotspot::{FrameUpdate, HotspotMarker, MarkerState};
pub use material::{MaterialKind, MaterialSwitcher};
pub use occlusion::{PickingInfo, Ray, SceneQuery, is_occluded};
pub use orbit::OrbitCamera;
