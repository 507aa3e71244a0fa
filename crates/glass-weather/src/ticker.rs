use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Advances an animation frame index on a timer.
///
/// The timer task is released on [`FrameTicker::stop`] and on drop, so a
/// view that owns a ticker cannot leak it.
pub struct FrameTicker {
    frame_rx: watch::Receiver<usize>,
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl FrameTicker {
    /// Start cycling through `frame_count` frames, one per `period`.
    ///
    /// With `reduce_motion` set, or fewer than two frames, the ticker stays
    /// on frame 0 and no task is spawned. Must be called inside a tokio
    /// runtime otherwise.
    pub fn start(frame_count: usize, period: Duration, reduce_motion: bool) -> Self {
        let (tx, frame_rx) = watch::channel(0usize);
        let token = CancellationToken::new();

        if reduce_motion || frame_count < 2 || period.is_zero() {
            tracing::debug!("Frame ticker idle ({} frames, reduce_motion={})", frame_count, reduce_motion);
            return Self {
                frame_rx,
                token,
                handle: None,
            };
        }

        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately; frame 0 is already showing.
            ticker.tick().await;
            let mut frame = 0usize;
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {
                        frame = (frame + 1) % frame_count;
                        if tx.send(frame).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self {
            frame_rx,
            token,
            handle: Some(handle),
        }
    }

    /// Frames per second to period; zero fps yields a zero period (idle).
    pub fn period_for_fps(fps: u32) -> Duration {
        if fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(1) / fps
        }
    }

    pub fn current_frame(&self) -> usize {
        *self.frame_rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.frame_rx.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop advancing and release the timer.
    pub fn stop(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for FrameTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
