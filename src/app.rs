//! Frame loop tying the landmark source, pipeline and transport together.

use crate::{
    config::Config,
    error::Result,
    pipeline::Pipeline,
    source::{JsonLinesSource, LandmarkSource},
    transport::{LogTransport, Transport, UdpTransport},
};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

// Send failures after the first are reported once per this many
const SEND_FAILURE_LOG_INTERVAL: u64 = 100;

/// Counters of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Frames delivered by the source
    pub frames: u64,
    /// Records produced by the pipeline
    pub records: u64,
    /// Frames the source failed to deliver
    pub skipped: u64,
    /// Records the transport failed to send
    pub send_failures: u64,
}

/// Main application struct
pub struct TrackerApp {
    config: Config,
    source: Box<dyn LandmarkSource>,
    pipeline: Pipeline,
    transport: Box<dyn Transport>,
    stats: RunStats,
}

impl TrackerApp {
    /// Create the application, opening the source and the transport
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the source cannot
    /// be opened or the transport cannot be set up
    pub fn new(config: Config) -> Result<Self> {
        info!("Initializing face tracking application");
        config.validate()?;

        let source = JsonLinesSource::open(&config.source.input)?;
        let transport: Box<dyn Transport> = if config.transport.enabled {
            Box::new(UdpTransport::connect(&config.transport.endpoint, &config.transport.event)?)
        } else {
            info!("Network sending disabled, logging records instead");
            Box::new(LogTransport::new())
        };

        Self::with_parts(config, Box::new(source), transport)
    }

    /// Create the application around an existing source and transport
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the pose model cannot be loaded
    pub fn with_parts(config: Config, source: Box<dyn LandmarkSource>, transport: Box<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let pipeline = Pipeline::from_config(&config)?;
        Ok(Self {
            config,
            source,
            pipeline,
            transport,
            stats: RunStats::default(),
        })
    }

    /// Run until the source ends or `stop` is set, then close the transport.
    ///
    /// Reaching the end of the input also sets `stop`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails in a way that cannot be skipped
    pub fn run(&mut self, stop: &AtomicBool) -> Result<RunStats> {
        info!("Starting main application loop");

        let start_time = Instant::now();
        let mut last_fps_update = Instant::now();
        let mut result = Ok(());

        while !stop.load(Ordering::SeqCst) {
            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    info!("End of input reached");
                    stop.store(true, Ordering::SeqCst);
                    break;
                }
                Err(e) if e.is_recoverable() => {
                    warn!("Failed to read frame, skipping: {e}");
                    self.stats.skipped += 1;
                    continue;
                }
                Err(e) => {
                    result = Err(e);
                    break;
                }
            };
            self.stats.frames += 1;

            if let Some(record) = self.pipeline.process(&frame) {
                self.stats.records += 1;
                if let Err(e) = self.transport.send(&record) {
                    self.stats.send_failures += 1;
                    let failures = self.stats.send_failures;
                    if failures == 1 || failures % SEND_FAILURE_LOG_INTERVAL == 0 {
                        warn!("{e} ({failures} failed sends)");
                    }
                }
            }

            if self.config.debug.enabled && self.stats.frames % self.config.debug.fps_interval == 0 {
                if let Some(report) = self.pipeline.last_report() {
                    debug!("Last pose {:?}, features {:?}", report.stabilized_pose, report.features);
                }
            }

            // Update FPS counter
            if last_fps_update.elapsed() >= Duration::from_secs(1) {
                #[allow(clippy::cast_precision_loss)]
                let fps = self.stats.frames as f64 / start_time.elapsed().as_secs_f64();
                debug!("FPS: {fps:.1}");
                last_fps_update = Instant::now();
            }
        }

        if let Err(e) = self.transport.close() {
            warn!("Failed to close transport: {e}");
        }
        info!(
            "Application shutting down: {} frames, {} records, {} skipped, {} failed sends",
            self.stats.frames, self.stats.records, self.stats.skipped, self.stats.send_failures
        );
        result.map(|()| self.stats)
    }

    /// The frame pipeline
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn stats(&self) -> RunStats {
        self.stats
    }
}
