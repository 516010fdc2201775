use crate::{
    core::{Point, Rgba8, SurfaceSize},
    error::{DotmapError, DotmapResult},
    scene::DrawOp,
};

/// One rendered frame: premultiplied RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// Straight-alpha background applied by `DrawOp::Clear`; `None` clears to
    /// transparent.
    pub clear_rgba: Option<[u8; 4]>,
}

struct CpuSurface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

/// CPU rasterizer for compiled draw-op lists.
///
/// Owns the drawing surface. The surface holds no content worth preserving
/// between frames; every frame starts with a `Clear` op.
pub struct CpuRenderer {
    settings: RenderSettings,
    surface: CpuSurface,
}

impl CpuRenderer {
    pub fn new(size: SurfaceSize, settings: RenderSettings) -> DotmapResult<Self> {
        let (width, height) = checked_dims(size)?;
        Ok(Self {
            settings,
            surface: CpuSurface {
                width,
                height,
                pixmap: vello_cpu::Pixmap::new(width, height),
            },
        })
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(u32::from(self.surface.width), u32::from(self.surface.height))
    }

    /// Resize the surface, discarding its contents.
    pub fn resize(&mut self, size: SurfaceSize) -> DotmapResult<()> {
        let (width, height) = checked_dims(size)?;
        if width == self.surface.width && height == self.surface.height {
            return Ok(());
        }
        self.surface = CpuSurface {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
        };
        Ok(())
    }

    /// Execute a compiled op list against the surface.
    ///
    /// A zero-sized surface makes this a no-op.
    pub fn execute(&mut self, ops: &[DrawOp]) -> DotmapResult<()> {
        if self.surface.width == 0 || self.surface.height == 0 {
            return Ok(());
        }

        // `Clear` mutates the pixmap directly while draw ops composite onto it
        // at flush time, so a frame's `Clear` must precede its draw ops. The
        // scene compiler always emits it first.
        let mut ctx = vello_cpu::RenderContext::new(self.surface.width, self.surface.height);
        for op in ops {
            self.exec_op(&mut ctx, op)?;
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut self.surface.pixmap);
        Ok(())
    }

    /// Read back the current surface contents.
    pub fn frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.surface.width),
            height: u32::from(self.surface.height),
            data: self.surface.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn exec_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &DrawOp,
    ) -> DotmapResult<()> {
        match *op {
            DrawOp::Clear => {
                let premul = self
                    .settings
                    .clear_rgba
                    .map(|[r, g, b, a]| premul_rgba8(r, g, b, a))
                    .unwrap_or([0, 0, 0, 0]);
                clear_pixmap(&mut self.surface.pixmap, premul);
                Ok(())
            }
            DrawOp::GridDot {
                center,
                radius,
                color,
                alpha,
            } => {
                ctx.set_paint(color_to_cpu(color));
                fill_circle(ctx, center, radius, alpha);
                Ok(())
            }
            DrawOp::Line {
                from,
                to,
                color,
                width,
                alpha,
            } => {
                ctx.set_paint(color_to_cpu(color));
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
                let mut path = vello_cpu::kurbo::BezPath::new();
                path.move_to(point_to_cpu(from));
                path.line_to(point_to_cpu(to));
                with_opacity(ctx, alpha, |ctx| ctx.stroke_path(&path));
                Ok(())
            }
            DrawOp::MarkerGlow {
                center,
                radius,
                color,
                alpha,
            } => {
                // Degenerate gradient; nothing to draw.
                if radius <= 0.0 {
                    return Ok(());
                }
                let gradient = vello_cpu::peniko::Gradient::new_radial(
                    point_to_cpu(center),
                    radius as f32,
                )
                .with_stops([color_to_cpu(color), color_to_cpu(color.with_alpha(0))]);
                ctx.set_paint(gradient);
                fill_circle(ctx, center, radius, alpha);
                Ok(())
            }
            DrawOp::MarkerDot {
                center,
                radius,
                color,
            } => {
                ctx.set_paint(color_to_cpu(color));
                fill_circle(ctx, center, radius, 1.0);
                Ok(())
            }
            DrawOp::PulseRing {
                center,
                radius,
                color,
                width,
                alpha,
            } => {
                ctx.set_paint(color_to_cpu(color));
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
                let ring = circle_path(center, radius);
                with_opacity(ctx, alpha, |ctx| ctx.stroke_path(&ring));
                Ok(())
            }
        }
    }
}

fn checked_dims(size: SurfaceSize) -> DotmapResult<(u16, u16)> {
    let width: u16 = size
        .width
        .try_into()
        .map_err(|_| DotmapError::render("surface width exceeds u16"))?;
    let height: u16 = size
        .height
        .try_into()
        .map_err(|_| DotmapError::render("surface height exceeds u16"))?;
    Ok((width, height))
}

fn premul_rgba8(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    let af = u16::from(a) + 1;
    let premul = |c: u8| -> u8 { ((u16::from(c) * af) >> 8) as u8 };
    [premul(r), premul(g), premul(b), a]
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn circle_path(center: Point, radius: f64) -> vello_cpu::kurbo::BezPath {
    use kurbo::{PathEl, Shape as _};

    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in kurbo::Circle::new(center, radius).path_elements(0.1) {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn fill_circle(ctx: &mut vello_cpu::RenderContext, center: Point, radius: f64, alpha: f32) {
    let path = circle_path(center, radius);
    with_opacity(ctx, alpha, |ctx| ctx.fill_path(&path));
}

fn with_opacity<F>(ctx: &mut vello_cpu::RenderContext, alpha: f32, draw: F)
where
    F: FnOnce(&mut vello_cpu::RenderContext),
{
    if alpha < 1.0 {
        ctx.push_opacity_layer(alpha);
        draw(ctx);
        ctx.pop_layer();
    } else {
        draw(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premul_is_conservative() {
        assert_eq!(premul_rgba8(255, 255, 255, 255), [255, 255, 255, 255]);
        assert_eq!(premul_rgba8(255, 128, 0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn resize_reports_new_dims_immediately() {
        let mut renderer =
            CpuRenderer::new(SurfaceSize::new(64, 64), RenderSettings::default()).unwrap();
        renderer.resize(SurfaceSize::new(128, 32)).unwrap();
        assert_eq!(renderer.size(), SurfaceSize::new(128, 32));
        let frame = renderer.frame();
        assert_eq!((frame.width, frame.height), (128, 32));
        assert_eq!(frame.data.len(), 128 * 32 * 4);
    }

    #[test]
    fn zero_sized_surface_executes_as_noop() {
        let mut renderer =
            CpuRenderer::new(SurfaceSize::new(0, 0), RenderSettings::default()).unwrap();
        renderer.execute(&[DrawOp::Clear]).unwrap();
        assert!(renderer.frame().data.is_empty());
    }

    #[test]
    fn oversized_surface_is_rejected() {
        let err = CpuRenderer::new(SurfaceSize::new(70_000, 10), RenderSettings::default());
        assert!(err.is_err());
    }
}
