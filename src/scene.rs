use crate::{
    anim::PulseClock,
    core::{GRID_SPACING, GeoPoint, MapStyle, Point, Rgba8, SurfaceSize},
    error::DotmapResult,
};

/// An immutable map scene: an ordered marker list plus visual style.
///
/// The marker list is fixed for the scene's lifetime; consecutive markers are
/// joined by connective lines, so order matters.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MapScene {
    #[serde(default)]
    pub markers: Vec<GeoPoint>,
    #[serde(default)]
    pub style: MapStyle,
}

impl MapScene {
    pub fn new(markers: Vec<GeoPoint>, style: MapStyle) -> Self {
        Self { markers, style }
    }

    pub fn validate(&self) -> DotmapResult<()> {
        self.style.validate()
    }
}

/// One backend-agnostic drawing primitive.
///
/// A compiled frame is an ordered `Vec<DrawOp>`; executing the ops in order on
/// a cleared surface reproduces the frame exactly. Alpha values are layer
/// opacities applied on top of the (already possibly translucent) colors.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear,
    /// Background lattice dot, drawn translucent.
    GridDot {
        center: Point,
        radius: f64,
        color: Rgba8,
        alpha: f32,
    },
    /// Straight connective line between two consecutive markers.
    Line {
        from: Point,
        to: Point,
        color: Rgba8,
        width: f64,
        alpha: f32,
    },
    /// Radial gradient disk fading from the marker color to transparent.
    MarkerGlow {
        center: Point,
        radius: f64,
        color: Rgba8,
        alpha: f32,
    },
    /// Opaque marker core dot.
    MarkerDot {
        center: Point,
        radius: f64,
        color: Rgba8,
    },
    /// Stroked pulsing ring overlay.
    PulseRing {
        center: Point,
        radius: f64,
        color: Rgba8,
        width: f64,
        alpha: f32,
    },
}

const GRID_DOT_ALPHA: f32 = 0.3;
const LINE_ALPHA: f32 = 0.5;
const LINE_WIDTH: f64 = 1.0;
const GLOW_ALPHA: f32 = 0.3;
const GLOW_RADIUS_FACTOR: f64 = 30.0;
const DOT_RADIUS_FACTOR: f64 = 10.0;
const RING_WIDTH: f64 = 2.0;

/// Compile the static frame: clear, background lattice, connective lines,
/// marker glows, marker core dots. No pulse overlay.
///
/// A zero-sized surface compiles to a bare `Clear`: the lattice loop bounds
/// produce no iterations and marker graphics are left to the rasterizer's
/// clipping.
pub fn compile_static(scene: &MapScene, size: SurfaceSize) -> Vec<DrawOp> {
    let width = f64::from(size.width);
    let height = f64::from(size.height);
    let mut ops = Vec::with_capacity(estimated_op_count(scene, size));

    ops.push(DrawOp::Clear);

    // Background lattice, one spacing in from the origin on both axes.
    let mut x = GRID_SPACING;
    while x < width {
        let mut y = GRID_SPACING;
        while y < height {
            ops.push(DrawOp::GridDot {
                center: Point::new(x, y),
                radius: scene.style.dot_size,
                color: scene.style.dot_color,
                alpha: GRID_DOT_ALPHA,
            });
            y += GRID_SPACING;
        }
        x += GRID_SPACING;
    }

    // Consecutive marker pairs. Zero or one marker draws no lines.
    for pair in scene.markers.windows(2) {
        ops.push(DrawOp::Line {
            from: pair[0].project(size),
            to: pair[1].project(size),
            color: scene.style.line_color,
            width: LINE_WIDTH,
            alpha: LINE_ALPHA,
        });
    }

    for marker in &scene.markers {
        let center = marker.project(size);
        ops.push(DrawOp::MarkerGlow {
            center,
            radius: marker.size * GLOW_RADIUS_FACTOR,
            color: scene.style.marker_color,
            alpha: GLOW_ALPHA,
        });
        ops.push(DrawOp::MarkerDot {
            center,
            radius: marker.size * DOT_RADIUS_FACTOR,
            color: scene.style.marker_color,
        });
    }

    ops
}

/// Compile one animated frame: the static frame plus a pulsing ring per
/// marker at the clock's current time.
pub fn compile_frame(scene: &MapScene, clock: PulseClock, size: SurfaceSize) -> Vec<DrawOp> {
    let mut ops = compile_static(scene, size);
    for (index, marker) in scene.markers.iter().enumerate() {
        ops.push(DrawOp::PulseRing {
            center: marker.project(size),
            radius: clock.ring_radius(marker.size, index),
            color: scene.style.marker_color,
            width: RING_WIDTH,
            alpha: clock.ring_alpha(index) as f32,
        });
    }
    ops
}

fn estimated_op_count(scene: &MapScene, size: SurfaceSize) -> usize {
    let cells_x = (f64::from(size.width) / GRID_SPACING).ceil() as usize;
    let cells_y = (f64::from(size.height) / GRID_SPACING).ceil() as usize;
    1 + cells_x * cells_y + scene.markers.len() * 3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count<F: Fn(&DrawOp) -> bool>(ops: &[DrawOp], pred: F) -> usize {
        ops.iter().filter(|op| pred(op)).count()
    }

    fn marker(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng, 0.3)
    }

    #[test]
    fn empty_scene_compiles_to_grid_only() {
        let scene = MapScene::new(vec![], MapStyle::default());
        let ops = compile_static(&scene, SurfaceSize::new(100, 100));

        assert_eq!(ops[0], DrawOp::Clear);
        assert!(ops[1..].iter().all(|op| matches!(op, DrawOp::GridDot { .. })));
        // 20..100 step 20 on both axes: 4x4 lattice.
        assert_eq!(ops.len(), 1 + 16);
    }

    #[test]
    fn single_marker_has_no_lines() {
        let scene = MapScene::new(vec![marker(0.0, 0.0)], MapStyle::default());
        let ops = compile_static(&scene, SurfaceSize::new(100, 100));

        assert_eq!(count(&ops, |op| matches!(op, DrawOp::Line { .. })), 0);
        assert_eq!(count(&ops, |op| matches!(op, DrawOp::MarkerGlow { .. })), 1);
        assert_eq!(count(&ops, |op| matches!(op, DrawOp::MarkerDot { .. })), 1);
    }

    #[test]
    fn lines_join_consecutive_pairs_in_order() {
        let markers = vec![marker(10.0, 10.0), marker(20.0, 20.0), marker(30.0, 30.0)];
        let scene = MapScene::new(markers.clone(), MapStyle::default());
        let size = SurfaceSize::new(360, 180);
        let ops = compile_static(&scene, size);

        let lines: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], (markers[0].project(size), markers[1].project(size)));
        assert_eq!(lines[1], (markers[1].project(size), markers[2].project(size)));
    }

    #[test]
    fn zero_sized_surface_compiles_to_bare_clear() {
        let scene = MapScene::new(vec![], MapStyle::default());
        assert_eq!(
            compile_static(&scene, SurfaceSize::new(0, 0)),
            vec![DrawOp::Clear]
        );
    }

    #[test]
    fn frame_adds_one_ring_per_marker_after_static_ops() {
        let scene = MapScene::new(vec![marker(0.0, 0.0), marker(5.0, 5.0)], MapStyle::default());
        let size = SurfaceSize::new(100, 100);
        let static_len = compile_static(&scene, size).len();
        let ops = compile_frame(&scene, PulseClock::new(), size);

        assert_eq!(ops.len(), static_len + 2);
        assert!(
            ops[static_len..]
                .iter()
                .all(|op| matches!(op, DrawOp::PulseRing { .. }))
        );
    }

    #[test]
    fn rest_pose_ring_geometry() {
        let scene = MapScene::new(vec![marker(0.0, 0.0)], MapStyle::default());
        let ops = compile_frame(&scene, PulseClock::new(), SurfaceSize::new(100, 100));

        let Some(DrawOp::PulseRing { radius, alpha, .. }) = ops.last() else {
            panic!("last op must be the pulse ring");
        };
        assert_eq!(*radius, 0.3 * 10.0 + 5.0);
        assert_eq!(*alpha, 0.5);
    }

    #[test]
    fn grid_ignores_markers() {
        let empty = MapScene::new(vec![], MapStyle::default());
        let busy = MapScene::new(vec![marker(0.0, 0.0); 5], MapStyle::default());
        let size = SurfaceSize::new(200, 120);

        let grid = |scene: &MapScene| {
            compile_static(scene, size)
                .into_iter()
                .filter(|op| matches!(op, DrawOp::GridDot { .. }))
                .collect::<Vec<_>>()
        };
        assert_eq!(grid(&empty), grid(&busy));
    }
}
