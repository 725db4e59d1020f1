//! Fixed-rate render loop.
//!
//! A background task recomposes the display surface from the session on
//! every tick, regardless of whether anything changed. Ticks that fall
//! behind are skipped rather than queued.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracepad_core::{thread_safe, Result, ThreadSafe};

use crate::session::Session;
use crate::surface::RasterSurface;

/// Handle to a running render loop. Dropping it stops the loop.
#[derive(Debug)]
pub struct RenderLoop {
    frame: ThreadSafe<RasterSurface>,
    frames: watch::Receiver<u64>,
    handle: JoinHandle<()>,
}

impl RenderLoop {
    /// Starts rendering `session` at `frame_rate` frames per second.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(session: ThreadSafe<Session>, frame_rate: u32) -> Result<Self> {
        let frame = thread_safe(session.lock().new_display_surface()?);
        let (tx, frames) = watch::channel(0u64);
        let period = Duration::from_secs_f64(1.0 / f64::from(frame_rate.max(1)));

        let display = frame.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                {
                    let session = session.lock();
                    let mut display = display.lock();
                    session.compose_into(&mut display);
                }
                tx.send_modify(|count| *count += 1);
            }
        });

        tracing::info!(frame_rate, "Render loop started");
        Ok(Self {
            frame,
            frames,
            handle,
        })
    }

    /// Frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        *self.frames.borrow()
    }

    /// Receiver that is notified after every rendered frame.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.frames.clone()
    }

    /// Waits until `n` more frames have been rendered and returns the frame
    /// count. Returns early if the loop has stopped.
    pub async fn wait_for_frames(&self, n: u64) -> u64 {
        let mut rx = self.frames.clone();
        let target = *rx.borrow_and_update() + n;
        let reached = rx.wait_for(|count| *count >= target).await.map(|count| *count);
        reached.unwrap_or_else(|_| *rx.borrow())
    }

    /// Runs `f` against the most recently rendered frame.
    pub fn with_frame<R>(&self, f: impl FnOnce(&RasterSurface) -> R) -> R {
        f(&self.frame.lock())
    }

    /// PNG of the most recently rendered frame.
    pub fn latest_frame_png(&self) -> Result<Vec<u8>> {
        Ok(self.frame.lock().encode_png()?)
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(&self) {
        if !self.handle.is_finished() {
            self.handle.abort();
            tracing::info!(frames = self.frame_count(), "Render loop stopped");
        }
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DrawMode;
    use crate::input::PointerEvent;
    use crate::session::SessionOptions;
    use tracepad_core::{Point, Rgba};

    #[tokio::test]
    async fn test_frames_reflect_session() {
        let session = thread_safe(
            Session::new(SessionOptions {
                width: 100.0,
                height: 100.0,
                template_guide: false,
                ..Default::default()
            })
            .unwrap(),
        );
        let render = RenderLoop::spawn(session.clone(), 120).unwrap();
        render.wait_for_frames(1).await;
        assert!(render.with_frame(|f| f.pixel_at(Point::new(40.0, 40.0))) == Some(Rgba::WHITE));

        {
            let mut guard = session.lock();
            guard.set_mode(DrawMode::FreeBrush);
            guard.handle_pointer(PointerEvent::down(40.0, 40.0));
            guard.handle_pointer(PointerEvent::up(40.0, 40.0));
        }
        let count = render.wait_for_frames(2).await;
        assert!(count >= 3);
        let px = render.with_frame(|f| f.pixel_at(Point::new(40.0, 40.0))).unwrap();
        assert_eq!(px, Rgba::RED);

        render.stop();
    }
}
