// Telemetry poller - Fixed-interval pull loop feeding the chart view
use crate::application::device_api::{DeviceApi, TransportError};
use crate::application::telemetry_view::{
    PollOutcome, PollTicket, PollerError, PollerState, TelemetryView,
};
use crate::domain::telemetry::{ChartSnapshot, Sample};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

const RESULT_QUEUE_DEPTH: usize = 16;

struct Session {
    epoch: u64,
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<TelemetryView>,
    snapshots: watch::Receiver<ChartSnapshot>,
}

/// Explicitly started and stopped timer scoped to one chart view.
/// While running, the loop task owns the view; `stop` takes it back.
pub struct TelemetryPoller {
    api: Arc<dyn DeviceApi>,
    interval: Duration,
    seed: Vec<f64>,
    view: Option<TelemetryView>,
    session: Option<Session>,
}

impl TelemetryPoller {
    pub fn new(
        api: Arc<dyn DeviceApi>,
        interval: Duration,
        seed: Vec<f64>,
    ) -> Result<Self, PollerError> {
        let view = TelemetryView::new(seed.clone())?;
        Ok(Self {
            api,
            interval,
            seed,
            view: Some(view),
            session: None,
        })
    }

    pub fn state(&self) -> PollerState {
        match self.session {
            Some(_) => PollerState::Running,
            None => PollerState::Stopped,
        }
    }

    /// Mounts the view with its seed and starts ticking. The first fetch
    /// happens one interval after start.
    pub fn start(&mut self) -> Result<watch::Receiver<ChartSnapshot>, PollerError> {
        if self.session.is_some() {
            return Err(PollerError::AlreadyRunning);
        }
        let mut view = match self.view.take() {
            Some(view) => view,
            None => TelemetryView::new(self.seed.clone())?,
        };
        let initial = match view.mount() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.view = Some(view);
                return Err(e);
            }
        };

        let epoch = view.epoch();
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);
        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(run_poll_loop(
            view,
            self.api.clone(),
            self.interval,
            snapshot_tx,
            stop_rx,
        ));

        tracing::info!(epoch, interval_ms = self.interval.as_millis() as u64, "telemetry poller started");
        self.session = Some(Session {
            epoch,
            stop_tx,
            handle,
            snapshots: snapshot_rx.clone(),
        });
        Ok(snapshot_rx)
    }

    /// Cancels the timer and discards the buffer. Fetches still in flight
    /// are ignored when they complete.
    pub async fn stop(&mut self) -> Result<(), PollerError> {
        let session = self.session.take().ok_or(PollerError::NotRunning)?;
        let _ = session.stop_tx.send(());

        let view = match session.handle.await {
            Ok(view) => view,
            Err(e) => {
                tracing::error!("Telemetry poll loop ended abnormally: {}", e);
                TelemetryView::resume(self.seed.clone(), session.epoch)?
            }
        };
        tracing::info!(epoch = view.epoch(), "telemetry poller stopped");
        self.view = Some(view);
        Ok(())
    }

    pub fn subscribe(&self) -> Option<watch::Receiver<ChartSnapshot>> {
        self.session.as_ref().map(|s| s.snapshots.clone())
    }

    pub fn snapshot(&self) -> Option<ChartSnapshot> {
        self.session.as_ref().map(|s| s.snapshots.borrow().clone())
    }
}

impl Drop for TelemetryPoller {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            let _ = session.stop_tx.send(());
        }
    }
}

async fn run_poll_loop(
    mut view: TelemetryView,
    api: Arc<dyn DeviceApi>,
    period: Duration,
    snapshots: watch::Sender<ChartSnapshot>,
    mut stop_rx: oneshot::Receiver<()>,
) -> TelemetryView {
    let (result_tx, mut result_rx) =
        mpsc::channel::<(PollTicket, Result<Sample, TransportError>)>(RESULT_QUEUE_DEPTH);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut stop_rx => break,
            _ = ticker.tick() => {
                let Some(ticket) = view.begin_poll() else { break };
                tracing::debug!("polling raw temperature");

                // Fetches may overlap when the device is slower than the period.
                let api = api.clone();
                let result_tx = result_tx.clone();
                tokio::spawn(async move {
                    let result = api.get_raw_temperature().await;
                    let _ = result_tx.send((ticket, result)).await;
                });
            }
            Some((ticket, result)) = result_rx.recv() => {
                if let PollOutcome::Appended(snapshot) = view.complete(ticket, result) {
                    snapshots.send_replace(snapshot);
                }
            }
        }
    }

    view.unmount();
    view
}
