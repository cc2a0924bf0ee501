use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::aggregator::HealthMetricsAggregator;
use crate::capability::{Capability, check_capability};
use crate::config::InsightsConfig;
use crate::error::McpResult;
use crate::snapshot::DailyHealthSnapshot;
use crate::state::{InsightsState, Notice};
use health_connect_client::utils::DayWindows;
use health_connect_client::{HealthDataProvider, INSIGHTS_PERMISSIONS};

/// Yields the day windows for "now" in the configured zone.
type Clock = Arc<dyn Fn() -> DayWindows + Send + Sync>;

/// Counts a refresh as in flight until dropped, including when the
/// refresh future is cancelled mid-read.
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn start(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Drives the insights screen: capability check, snapshot refresh, notices.
///
/// Initial load and user refresh go through the same [`refresh`](Self::refresh)
/// path. The snapshot is swapped as a whole under the state lock, so readers
/// never see a mix of old and new metrics.
///
/// Each refresh takes a generation number when it starts. A refresh that
/// finishes after a newer one has already published is discarded.
/// `loading` is true while any refresh is in flight.
#[derive(Clone)]
pub struct InsightsService {
    provider: Arc<dyn HealthDataProvider>,
    aggregator: HealthMetricsAggregator,
    clock: Clock,
    state: Arc<Mutex<InsightsState>>,
    in_flight: Arc<AtomicUsize>,
    started: Arc<AtomicU64>,
    // Only written while the state lock is held.
    published: Arc<AtomicU64>,
}

impl InsightsService {
    pub fn new(provider: Arc<dyn HealthDataProvider>, config: InsightsConfig) -> Self {
        let aggregator = HealthMetricsAggregator::new(config.grouping_separator);
        Self::from_parts(provider, aggregator, Arc::new(move || config.day_windows()))
    }

    /// Service whose days are cut in the zone of whatever `clock` returns.
    pub fn with_clock<F, Tz>(
        provider: Arc<dyn HealthDataProvider>,
        aggregator: HealthMetricsAggregator,
        clock: F,
    ) -> Self
    where
        F: Fn() -> DateTime<Tz> + Send + Sync + 'static,
        Tz: TimeZone + 'static,
    {
        Self::from_parts(
            provider,
            aggregator,
            Arc::new(move || DayWindows::at(&clock())),
        )
    }

    fn from_parts(
        provider: Arc<dyn HealthDataProvider>,
        aggregator: HealthMetricsAggregator,
        clock: Clock,
    ) -> Self {
        Self {
            provider,
            aggregator,
            clock,
            state: Arc::new(Mutex::new(InsightsState::default())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            started: Arc::new(AtomicU64::new(0)),
            published: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn provider(&self) -> &dyn HealthDataProvider {
        self.provider.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn current(&self) -> InsightsState {
        self.snapshot_of(&*self.state.lock().await)
    }

    /// First load. Same as a refresh.
    pub async fn on_mount(&self) -> InsightsState {
        self.refresh().await
    }

    pub async fn refresh(&self) -> InsightsState {
        let in_flight = InFlight::start(&self.in_flight);
        let generation = self.started.fetch_add(1, Ordering::SeqCst) + 1;

        let capability = check_capability(self.provider.as_ref()).await;
        if !capability.is_ready() {
            tracing::info!(?capability, "health data not accessible; showing placeholders");
            return self
                .publish(
                    in_flight,
                    generation,
                    capability,
                    DailyHealthSnapshot::no_data(),
                    None,
                )
                .await;
        }

        let report = self
            .aggregator
            .fetch(self.provider.as_ref(), (self.clock)())
            .await;
        tracing::info!(degraded = report.degraded.len(), "health snapshot refreshed");
        self.publish(
            in_flight,
            generation,
            capability,
            report.snapshot,
            Notice::degraded(&report.degraded),
        )
        .await
    }

    /// Request the insights permissions, then reload if they were granted.
    pub async fn request_permissions(&self) -> McpResult<InsightsState> {
        let granted = self
            .provider
            .request_permissions(&INSIGHTS_PERMISSIONS)
            .await?;
        tracing::info!(granted = granted.len(), "health permissions requested");
        Ok(self.refresh().await)
    }

    pub async fn dismiss_notices(&self) -> InsightsState {
        let mut state = self.state.lock().await;
        state.notices.clear();
        self.snapshot_of(&state)
    }

    fn snapshot_of(&self, state: &InsightsState) -> InsightsState {
        InsightsState {
            loading: self.is_loading(),
            ..state.clone()
        }
    }

    async fn publish(
        &self,
        in_flight: InFlight,
        generation: u64,
        capability: Capability,
        snapshot: DailyHealthSnapshot,
        transient: Option<Notice>,
    ) -> InsightsState {
        let mut state = self.state.lock().await;
        drop(in_flight);
        if generation < self.published.load(Ordering::SeqCst) {
            tracing::debug!(generation, "discarding refresh overtaken by a newer one");
            return self.snapshot_of(&state);
        }
        self.published.store(generation, Ordering::SeqCst);

        // Persistent notices track the capability; drop stale ones before re-adding.
        state.notices.clear();
        if let Some(notice) = capability.notice() {
            state.notices.push(notice);
        }
        state.notices.extend(transient);
        state.capability = capability;
        state.snapshot = Some(snapshot);
        state.refreshed_at = Some(Utc::now());
        state.loading = self.is_loading();
        state.clone()
    }
}
