use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::{
    error::{DotmapError, DotmapResult},
    render_cpu::FrameRGBA,
    renderer::{HostViewport, MapRenderer},
};

/// Tick frequency of the animation loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TickRate(u32);

impl TickRate {
    pub fn per_second(ticks: u32) -> DotmapResult<Self> {
        if ticks == 0 {
            return Err(DotmapError::validation("TickRate must be > 0"));
        }
        Ok(Self(ticks))
    }

    pub fn interval(self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.0))
    }
}

/// Handle to a running animation loop.
///
/// Dropping the handle without calling [`stop`](Self::stop) leaves the loop
/// running detached for the rest of the process, which matches the original
/// page-lifetime behavior; embedders that need deterministic teardown call
/// `stop` followed by [`join`](Self::join).
pub struct DriverHandle {
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<DotmapResult<()>>>,
}

impl DriverHandle {
    /// Request the loop to halt. The current tick completes; the next one is
    /// never scheduled.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Wait for the loop thread to finish, surfacing any render error it hit.
    pub fn join(mut self) -> DotmapResult<()> {
        let Some(join) = self.join.take() else {
            return Ok(());
        };
        join.join()
            .map_err(|_| DotmapError::render("animation loop panicked"))?
    }

    pub fn stop_and_join(self) -> DotmapResult<()> {
        self.stop();
        self.join()
    }
}

/// Spawn the animation loop: tick the renderer at a fixed rate and hand every
/// frame to `sink` until [`DriverHandle::stop`] is called or `sink` reports an
/// error.
pub fn spawn<H, F>(
    mut renderer: MapRenderer<H>,
    rate: TickRate,
    mut sink: F,
) -> DriverHandle
where
    H: HostViewport + Send + 'static,
    F: FnMut(u64, FrameRGBA) -> DotmapResult<()> + Send + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();
    let interval = rate.interval();

    let join = std::thread::spawn(move || -> DotmapResult<()> {
        let mut ticks: u64 = 0;
        tracing::info!(interval_ms = interval.as_millis() as u64, "animation loop started");
        while !stop_flag.load(Ordering::Relaxed) {
            renderer.tick()?;
            sink(ticks, renderer.frame())?;
            ticks += 1;
            std::thread::sleep(interval);
        }
        tracing::info!(ticks, "animation loop stopped");
        Ok(())
    });

    DriverHandle {
        stop,
        join: Some(join),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MapStyle;
    use crate::render_cpu::RenderSettings;
    use crate::renderer::FixedViewport;
    use crate::scene::MapScene;

    use std::sync::Mutex;

    #[test]
    fn tick_rate_rejects_zero() {
        assert!(TickRate::per_second(0).is_err());
        assert_eq!(TickRate::per_second(50).unwrap().interval(), Duration::from_millis(20));
    }

    #[test]
    fn stop_halts_the_loop() {
        let renderer = MapRenderer::new(
            FixedViewport::new(32, 32),
            MapScene::new(vec![], MapStyle::default()),
            RenderSettings::default(),
        )
        .unwrap();

        let seen = Arc::new(Mutex::new(0u64));
        let seen_in_sink = seen.clone();
        let handle = spawn(
            renderer,
            TickRate::per_second(200).unwrap(),
            move |tick, frame| {
                assert_eq!(frame.width, 32);
                *seen_in_sink.lock().unwrap() = tick + 1;
                Ok(())
            },
        );

        // Let a few ticks happen, then halt deterministically.
        while *seen.lock().unwrap() < 3 {
            std::thread::sleep(Duration::from_millis(1));
        }
        handle.stop_and_join().unwrap();

        let after_stop = *seen.lock().unwrap();
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(*seen.lock().unwrap(), after_stop);
    }

    #[test]
    fn sink_error_terminates_the_loop() {
        let renderer = MapRenderer::new(
            FixedViewport::new(16, 16),
            MapScene::new(vec![], MapStyle::default()),
            RenderSettings::default(),
        )
        .unwrap();

        let handle = spawn(renderer, TickRate::per_second(500).unwrap(), |_, _| {
            Err(DotmapError::render("sink full"))
        });
        assert!(handle.join().is_err());
    }
}
