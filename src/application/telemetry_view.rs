// Telemetry view - mount/unmount lifecycle of the live chart and its buffer
use crate::application::device_api::TransportError;
use crate::domain::telemetry::{ChartSnapshot, Sample, TimeSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Stopped,
    Running,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollerError {
    #[error("telemetry view is already running")]
    AlreadyRunning,
    #[error("telemetry view is not running")]
    NotRunning,
    #[error("seed series must not be empty")]
    EmptySeed,
}

/// Issued when a fetch starts. Carries the epoch it was issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTicket {
    epoch: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Appended(ChartSnapshot),
    Failed,
    /// The view was unmounted or remounted since the fetch started.
    Discarded,
}

/// Owns the buffer for one mount of the chart. Every mount and unmount
/// advances the epoch, so completions from an earlier mount never land.
#[derive(Debug)]
pub struct TelemetryView {
    seed: Vec<f64>,
    epoch: u64,
    series: Option<TimeSeries>,
}

impl TelemetryView {
    pub fn new(seed: Vec<f64>) -> Result<Self, PollerError> {
        if seed.is_empty() {
            return Err(PollerError::EmptySeed);
        }
        Ok(Self {
            seed,
            epoch: 0,
            series: None,
        })
    }

    /// Rebuilds a stopped view that continues counting from `epoch`.
    pub(crate) fn resume(seed: Vec<f64>, epoch: u64) -> Result<Self, PollerError> {
        let mut view = Self::new(seed)?;
        view.epoch = epoch + 1;
        Ok(view)
    }

    pub fn state(&self) -> PollerState {
        match self.series {
            Some(_) => PollerState::Running,
            None => PollerState::Stopped,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn mount(&mut self) -> Result<ChartSnapshot, PollerError> {
        if self.series.is_some() {
            return Err(PollerError::AlreadyRunning);
        }
        let series = TimeSeries::seeded(&self.seed).ok_or(PollerError::EmptySeed)?;
        let snapshot = series.snapshot();
        self.epoch += 1;
        self.series = Some(series);
        tracing::debug!(epoch = self.epoch, "telemetry view mounted");
        Ok(snapshot)
    }

    pub fn unmount(&mut self) {
        if self.series.take().is_some() {
            self.epoch += 1;
            tracing::debug!(epoch = self.epoch, "telemetry view unmounted");
        }
    }

    /// Ticket for a fetch about to start, or `None` while stopped.
    pub fn begin_poll(&self) -> Option<PollTicket> {
        self.series.as_ref().map(|_| PollTicket { epoch: self.epoch })
    }

    pub fn complete(
        &mut self,
        ticket: PollTicket,
        result: Result<Sample, TransportError>,
    ) -> PollOutcome {
        if ticket.epoch != self.epoch {
            tracing::debug!(
                ticket = ticket.epoch,
                current = self.epoch,
                "discarding stale temperature reading"
            );
            return PollOutcome::Discarded;
        }
        let Some(series) = self.series.as_mut() else {
            return PollOutcome::Discarded;
        };

        match result {
            Ok(sample) => {
                series.push(sample);
                PollOutcome::Appended(series.snapshot())
            }
            Err(e) => {
                tracing::warn!("Error polling temperature: {}", e);
                PollOutcome::Failed
            }
        }
    }

    pub fn snapshot(&self) -> Option<ChartSnapshot> {
        self.series.as_ref().map(TimeSeries::snapshot)
    }
}
