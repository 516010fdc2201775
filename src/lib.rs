//! Dotmap renders a decorative dotted world map: a translucent background dot
//! lattice, straight connective lines between consecutive geographic markers,
//! glow + core-dot marker graphics, and a sinusoidal pulsing ring per marker.
//!
//! # Pipeline overview
//!
//! 1. **Compile**: `MapScene + PulseClock + SurfaceSize -> Vec<DrawOp>`
//!    (backend-agnostic, pure, and where the op-count properties are tested)
//! 2. **Execute**: `Vec<DrawOp> -> pixels` on a CPU surface ([`CpuRenderer`])
//! 3. **Drive**: [`MapRenderer`] ties a host viewport to the compile/execute
//!    steps; [`driver::spawn`] runs it as a stoppable fixed-rate loop
//!
//! The projection is deliberately the simplest possible equirectangular
//! mapping; the map is decorative, not navigational. Out-of-range coordinates
//! are projected permissively and clipped by the surface.
#![forbid(unsafe_code)]

pub mod anim;
pub mod core;
pub mod driver;
pub mod error;
pub mod locale;
pub mod render_cpu;
pub mod renderer;
pub mod scene;

pub use anim::PulseClock;
pub use core::{GRID_SPACING, GeoPoint, MapStyle, Point, Rgba8, SurfaceSize, TIME_STEP};
pub use driver::{DriverHandle, TickRate};
pub use error::{DotmapError, DotmapResult};
pub use locale::LocaleTable;
pub use render_cpu::{CpuRenderer, FrameRGBA, RenderSettings};
pub use renderer::{FixedViewport, HostViewport, MapRenderer};
pub use scene::{DrawOp, MapScene, compile_frame, compile_static};
