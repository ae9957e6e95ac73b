//! Per-cadence timer task driving notification passes.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::Utc;
use log::debug;
use log::error;
use log::info;
use tokio::time::sleep;

use crate::config::Config;
use crate::service::Services;
use crate::service::cadence::Cadence;

/// Task that runs one cadence's notification pass on schedule.
///
/// No mutual exclusion is held against manual triggers; a timer firing
/// while an on-demand pass runs results in two independent passes.
pub struct CadenceScheduler {
    cadence: Cadence,
    services: Arc<Services>,
    config: Arc<Config>,
    running: AtomicBool,
}

impl CadenceScheduler {
    /// Creates a new scheduler for the given cadence.
    pub fn new(cadence: Cadence, services: Arc<Services>, config: Arc<Config>) -> Arc<Self> {
        info!("Initializing CadenceScheduler for {cadence} cadence.");
        Arc::new(Self {
            cadence,
            services,
            config,
            running: AtomicBool::new(false),
        })
    }

    /// Starts the scheduling loop.
    pub fn start(self: Arc<Self>) -> anyhow::Result<()> {
        if !self.running.load(Ordering::SeqCst) {
            self.running.store(true, Ordering::SeqCst);
            info!("Starting {} scheduler loop.", self.cadence);
            self.spawn_loop();
        }
        Ok(())
    }

    /// Stops the scheduling loop after its current sleep elapses.
    pub fn stop(self: Arc<Self>) -> anyhow::Result<()> {
        info!("Stopping {} scheduler loop.", self.cadence);
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn spawn_loop(self: Arc<Self>) {
        tokio::spawn(async move {
            loop {
                let now = Utc::now();
                let next = self.cadence.next_fire(now, &self.config);
                let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
                debug!(
                    "Next {} pass scheduled at {} (in {:.0?}).",
                    self.cadence, next, wait
                );
                sleep(wait).await;

                if !self.running.load(Ordering::SeqCst) {
                    info!("Stopping {} scheduler loop.", self.cadence);
                    break;
                }

                if let Err(e) = self.run_pass().await {
                    error!("Error running {} pass: {e}", self.cadence);
                }
            }
        });
    }

    async fn run_pass(&self) -> anyhow::Result<()> {
        let summary = match self.cadence {
            Cadence::Daily => self.services.alert.run_pass(self.cadence).await?,
            Cadence::Weekly | Cadence::Monthly => {
                self.services.digest.run_pass(self.cadence).await?
            }
        };
        info!("Scheduled {summary}");
        Ok(())
    }
}
