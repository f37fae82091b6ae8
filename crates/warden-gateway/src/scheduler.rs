//! Sweep scheduler
//!
//! Runs the inactivity sweep on a fixed period. The first sweep fires one
//! full period after startup so a restart does not immediately re-notify
//! everyone the previous cycle already reached.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use warden_service::InactivitySweep;

/// Periodic driver for the inactivity sweep
pub struct SweepScheduler {
    sweep: Arc<InactivitySweep>,
    period: Duration,
    running: AtomicBool,
}

impl SweepScheduler {
    /// Create a new sweep scheduler
    pub fn new(sweep: Arc<InactivitySweep>, period: Duration) -> Self {
        Self {
            sweep,
            period,
            running: AtomicBool::new(false),
        }
    }

    /// Start the schedule on a background task
    pub fn start(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Sweep scheduler is already running");
            return;
        }

        let scheduler = self.clone();
        tokio::spawn(async move {
            scheduler.run().await;
        });

        info!(period_secs = self.period.as_secs(), "Sweep scheduler started");
    }

    /// Stop the schedule; an in-flight sweep finishes its cycle
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        info!("Sweep scheduler stopped");
    }

    /// Check if the scheduler is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run(&self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so the first sweep
        // lands one full period from now.
        ticker.tick().await;

        while self.running.load(Ordering::SeqCst) {
            ticker.tick().await;
            if !self.running.load(Ordering::SeqCst) {
                break;
            }
            let swept = self.sweep.sweep_all().await;
            info!(swept, "Scheduled sweep cycle completed");
        }
    }
}
