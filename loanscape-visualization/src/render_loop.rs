//! Start/stop frame scheduling

use crate::camera::Camera;
use crate::tooltip::Tooltip;
use instant::Instant;
use loanscape_core::Result;
use std::time::Duration;

/// What a frame is rendered from
pub struct FrameView<'a> {
    pub camera: &'a Camera,
    pub tooltip: &'a Tooltip,
}

/// Something that can draw one frame
pub trait FrameRenderer {
    fn render_frame(&mut self, view: &FrameView<'_>) -> Result<()>;
}

/// Renders one frame per tick while running.
///
/// Pacing comes from the caller: the viewer ticks on every redraw and asks
/// for the next redraw whenever a tick returns `true`.
#[derive(Debug)]
pub struct RenderLoop {
    running: bool,
    frames_rendered: u64,
    sample_start: Instant,
    sample_frames: u32,
    sample_interval: Duration,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            running: false,
            frames_rendered: 0,
            sample_start: Instant::now(),
            sample_frames: 0,
            sample_interval: Duration::from_secs(5),
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            log::debug!("Render loop started");
            self.running = true;
            self.sample_start = Instant::now();
            self.sample_frames = 0;
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Render loop stopped after {} frames", self.frames_rendered);
            self.running = false;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Render a frame if running. Returns whether another frame should be
    /// scheduled.
    pub fn tick<R: FrameRenderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        view: &FrameView<'_>,
    ) -> Result<bool> {
        if !self.running {
            return Ok(false);
        }

        renderer.render_frame(view)?;
        self.frames_rendered += 1;
        self.sample_frames += 1;

        let elapsed = self.sample_start.elapsed();
        if elapsed >= self.sample_interval {
            let fps = self.sample_frames as f64 / elapsed.as_secs_f64();
            log::debug!("{:.1} fps over the last {} frames", fps, self.sample_frames);
            self.sample_start = Instant::now();
            self.sample_frames = 0;
        }

        Ok(true)
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loanscape_core::Error;

    #[derive(Default)]
    struct CountingRenderer {
        frames: usize,
        fail: bool,
    }

    impl FrameRenderer for CountingRenderer {
        fn render_frame(&mut self, _view: &FrameView<'_>) -> Result<()> {
            if self.fail {
                return Err(Error::Gpu("device lost".to_string()));
            }
            self.frames += 1;
            Ok(())
        }
    }

    #[test]
    fn test_renders_only_while_running() {
        let camera = Camera::default();
        let tooltip = Tooltip::default();
        let view = FrameView {
            camera: &camera,
            tooltip: &tooltip,
        };
        let mut renderer = CountingRenderer::default();
        let mut render_loop = RenderLoop::new();

        assert!(!render_loop.tick(&mut renderer, &view).unwrap());
        assert_eq!(renderer.frames, 0);

        render_loop.start();
        assert!(render_loop.is_running());
        assert!(render_loop.tick(&mut renderer, &view).unwrap());
        assert!(render_loop.tick(&mut renderer, &view).unwrap());
        assert_eq!(renderer.frames, 2);

        render_loop.stop();
        assert!(!render_loop.tick(&mut renderer, &view).unwrap());
        assert_eq!(renderer.frames, 2);
        assert_eq!(render_loop.frames_rendered(), 2);
    }

    #[test]
    fn test_render_errors_propagate() {
        let camera = Camera::default();
        let tooltip = Tooltip::default();
        let view = FrameView {
            camera: &camera,
            tooltip: &tooltip,
        };
        let mut renderer = CountingRenderer {
            frames: 0,
            fail: true,
        };
        let mut render_loop = RenderLoop::new();
        render_loop.start();

        assert!(render_loop.tick(&mut renderer, &view).is_err());
        assert_eq!(render_loop.frames_rendered(), 0);
        assert!(render_loop.is_running());
    }
}
