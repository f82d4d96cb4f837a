use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::panel::ControlPanel;
use crate::protocol::{PollMode, PollSchedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    NotStarted,
    Armed,
}

/// Repeating image refresh timer.
///
/// Once armed it runs for the life of the runtime. Ticks never wait for the
/// previous refresh to finish.
pub struct ImageLoop {
    schedule: PollSchedule,
    state: LoopState,
    attempts: Arc<AtomicU64>,
}

impl ImageLoop {
    pub fn new(schedule: PollSchedule) -> Self {
        Self {
            schedule,
            state: LoopState::NotStarted,
            attempts: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Refresh requests issued so far.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    pub fn start_image_loop(&mut self, panel: ControlPanel) {
        if self.state == LoopState::Armed {
            warn!("🔁 Image loop already armed");
            return;
        }
        self.state = LoopState::Armed;

        let schedule = self.schedule;
        let attempts = self.attempts.clone();
        info!(
            "🔁 Starting image loop every {:?} ({:?})",
            schedule.interval, schedule.mode
        );

        tokio::spawn(async move {
            // first tick one full period after arming
            let mut ticker = interval_at(Instant::now() + schedule.interval, schedule.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if tick(&panel, schedule.mode).await.is_some() {
                    attempts.fetch_add(1, Ordering::Relaxed);
                }
            }
        });
    }
}

async fn tick(panel: &ControlPanel, mode: PollMode) -> Option<JoinHandle<()>> {
    if mode == PollMode::WhenAutoload && !panel.state().await.autoload {
        debug!("autoload: disabled");
        return None;
    }

    match panel.update_image().await {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("🔁 Image refresh skipped: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraClient;
    use crate::mock_server::MockCameraServer;
    use crate::protocol::Profile;
    use crate::render::PanelView;
    use crate::types::PanelState;
    use std::time::Duration;

    fn schedule(mode: PollMode) -> PollSchedule {
        PollSchedule {
            interval: Duration::from_millis(100),
            mode,
        }
    }

    async fn panel(profile: Profile, server: &MockCameraServer) -> ControlPanel {
        let client = CameraClient::new(server.base_url(), None).unwrap();
        ControlPanel::new(profile, PanelState::default(), client, Arc::new(PanelView::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_attempt_per_interval() {
        let server = MockCameraServer::start().await;
        let mut image_loop = ImageLoop::new(schedule(PollMode::Always));
        assert_eq!(image_loop.state(), LoopState::NotStarted);

        image_loop.start_image_loop(panel(Profile::Tuning, &server).await);
        assert_eq!(image_loop.state(), LoopState::Armed);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(image_loop.attempts(), 0);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(image_loop.attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_do_not_wait_for_slow_responses() {
        let server = MockCameraServer::start().await;
        server.reply_after("get_latest", 200, "img.jpg", Duration::from_secs(3600));
        let mut image_loop = ImageLoop::new(schedule(PollMode::Always));

        image_loop.start_image_loop(panel(Profile::Tuning, &server).await);
        tokio::time::sleep(Duration::from_millis(550)).await;

        assert_eq!(image_loop.attempts(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoload_gates_refresh() {
        let server = MockCameraServer::start().await;
        let panel = panel(Profile::Timelapse, &server).await;
        let mut image_loop = ImageLoop::new(schedule(PollMode::WhenAutoload));

        image_loop.start_image_loop(panel.clone());
        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(image_loop.attempts(), 0);
        assert!(server.requests().is_empty());

        panel.set_autoload(true).await;
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(image_loop.attempts(), 2);
    }

    #[tokio::test]
    async fn test_refreshes_reach_the_server() {
        let server = MockCameraServer::start().await;
        server.reply("get_latest", 200, "img_042.jpg");
        let view = PanelView::new();
        let client = CameraClient::new(server.base_url(), None).unwrap();
        let panel = ControlPanel::new(Profile::Tuning, PanelState::default(), client, Arc::new(view.clone()));
        let mut image_loop = ImageLoop::new(PollSchedule {
            interval: Duration::from_millis(20),
            mode: PollMode::Always,
        });

        image_loop.start_image_loop(panel);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(!server.requests().is_empty());
        assert!(server.requests().iter().all(|r| r.path == "get_latest"));
        assert_eq!(view.snapshot().label, "img_042.jpg");
    }

    #[tokio::test]
    async fn test_second_start_is_ignored() {
        let server = MockCameraServer::start().await;
        let panel = panel(Profile::Tuning, &server).await;
        let mut image_loop = ImageLoop::new(schedule(PollMode::Always));

        image_loop.start_image_loop(panel.clone());
        image_loop.start_image_loop(panel);
        assert_eq!(image_loop.state(), LoopState::Armed);
    }
}
