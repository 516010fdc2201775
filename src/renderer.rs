use crate::{
    anim::PulseClock,
    core::SurfaceSize,
    error::DotmapResult,
    render_cpu::{CpuRenderer, FrameRGBA, RenderSettings},
    scene::{MapScene, compile_frame, compile_static},
};

/// Capability the renderer needs from its host: a measurable content box.
///
/// Keeps the renderer independent of any concrete windowing or UI layer; tests
/// use [`FixedViewport`].
pub trait HostViewport {
    fn content_size(&self) -> SurfaceSize;
}

/// A host with an externally controlled, fixed content box.
#[derive(Clone, Copy, Debug)]
pub struct FixedViewport {
    pub size: SurfaceSize,
}

impl FixedViewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
        }
    }
}

impl HostViewport for FixedViewport {
    fn content_size(&self) -> SurfaceSize {
        self.size
    }
}

/// The dotted-map renderer: an immutable scene, a pulse clock, and a CPU
/// surface sized to the host's content box.
///
/// The marker list is fixed at construction. The only mutable state is the
/// clock and the surface dimensions.
pub struct MapRenderer<H: HostViewport> {
    host: H,
    scene: MapScene,
    clock: PulseClock,
    surface: CpuRenderer,
}

impl<H: HostViewport> MapRenderer<H> {
    /// Build a renderer sized to the host's current content box and draw the
    /// initial static frame. An empty marker list is fine: the renderer
    /// degrades to the background lattice alone.
    pub fn new(host: H, scene: MapScene, settings: RenderSettings) -> DotmapResult<Self> {
        scene.validate()?;
        let size = host.content_size();
        let mut renderer = Self {
            host,
            scene,
            clock: PulseClock::new(),
            surface: CpuRenderer::new(size, settings)?,
        };
        tracing::debug!(
            width = size.width,
            height = size.height,
            markers = renderer.scene.markers.len(),
            "map renderer initialized"
        );
        renderer.draw_static()?;
        Ok(renderer)
    }

    pub fn scene(&self) -> &MapScene {
        &self.scene
    }

    pub fn clock(&self) -> PulseClock {
        self.clock
    }

    /// Current surface dimensions.
    pub fn size(&self) -> SurfaceSize {
        self.surface.size()
    }

    /// Draw the static frame (lattice, lines, glows, dots) without advancing
    /// the clock or overlaying pulse rings.
    pub fn draw_static(&mut self) -> DotmapResult<()> {
        let ops = compile_static(&self.scene, self.surface.size());
        self.surface.execute(&ops)
    }

    /// One animation tick: advance the clock, then draw the full frame with
    /// pulse rings.
    pub fn tick(&mut self) -> DotmapResult<()> {
        self.clock.advance();
        self.draw_frame_at(self.clock)
    }

    /// Draw a full animated frame at an explicit clock without touching the
    /// renderer's own clock. Used for offline single-frame export.
    pub fn draw_frame_at(&mut self, clock: PulseClock) -> DotmapResult<()> {
        let ops = compile_frame(&self.scene, clock, self.surface.size());
        self.surface.execute(&ops)
    }

    /// Re-measure the host, resize the surface to match, and synchronously
    /// redraw so the map is never shown at a stale size. The animation loop
    /// picks up the new size on its next tick regardless.
    pub fn handle_resize(&mut self) -> DotmapResult<()> {
        let size = self.host.content_size();
        if size != self.surface.size() {
            tracing::debug!(width = size.width, height = size.height, "surface resized");
            self.surface.resize(size)?;
        }
        self.draw_static()
    }

    /// Read back the last rendered frame.
    pub fn frame(&self) -> FrameRGBA {
        self.surface.frame()
    }
}
