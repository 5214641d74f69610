pub mod config;
pub mod error;
pub mod grid;
pub mod overlay;
pub mod ray;
pub mod session;
pub mod visibility;

pub use config::Config;
pub use error::{ConfigError, GridError, SessionError};
pub use grid::{Cell, GridMap, ObstacleMap};
pub use overlay::{FogLevel, FogPalette, Overlay, OverlayCache};
pub use ray::{RayDirection, RayFan};
pub use session::{FogSession, FogStats};
pub use visibility::{march_ray, trace_ray, RayStop, RayTrace, VisibilityEngine, VisibilityState};
