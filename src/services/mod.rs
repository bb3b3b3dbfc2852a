/// Fetch lifecycle and session wiring
use crate::clients::QuakeSource;
use crate::domain::{FetchResult, Quake, QueryParams, Window};
use crate::errors::ApiResult;
use crate::filters::FilterState;
use crate::state::{FetchState, Selection};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

struct ControllerInner {
    source: Arc<dyn QuakeSource>,
    state: watch::Sender<FetchState>,
    latest_seq: AtomicU64,
}

/// Owns the request lifecycle for `/quakes` queries.
///
/// Every fetch takes a sequence number when it is issued. A response is only
/// written to state if no newer fetch has been issued since; stale responses
/// are dropped, so the most recently issued query always wins.
#[derive(Clone)]
pub struct FetchController {
    inner: Arc<ControllerInner>,
}

impl FetchController {
    pub fn new(source: Arc<dyn QuakeSource>) -> Self {
        let (state, _) = watch::channel(FetchState::default());
        Self {
            inner: Arc::new(ControllerInner {
                source,
                state,
                latest_seq: AtomicU64::new(0),
            }),
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> FetchState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every state transition
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.inner.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    /// Sequence number of the most recently issued fetch (0 before the first)
    pub fn latest_seq(&self) -> u64 {
        self.inner.latest_seq.load(Ordering::SeqCst)
    }

    /// Issue a query.
    ///
    /// The loading transition and sequence number are taken immediately, before
    /// the returned future is polled, so issue order is call order.
    pub fn fetch(
        &self,
        params: QueryParams,
    ) -> impl Future<Output = ApiResult<FetchResult>> + Send + 'static {
        let seq = self.begin(&params);
        let this = self.clone();
        async move {
            let result = this.inner.source.fetch_quakes(&params).await;
            this.complete(seq, &result);
            result
        }
    }

    /// Issue a query on a background task
    pub fn spawn_fetch(&self, params: QueryParams) -> JoinHandle<ApiResult<FetchResult>> {
        tokio::spawn(self.fetch(params))
    }

    fn begin(&self, params: &QueryParams) -> u64 {
        let seq = self.inner.latest_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        info!(
            seq,
            window = %params.window,
            min_mag = params.min_mag,
            limit = params.limit,
            "fetching quakes"
        );
        seq
    }

    fn complete(&self, seq: u64, result: &ApiResult<FetchResult>) {
        let applied = self.inner.state.send_if_modified(|state| {
            if self.inner.latest_seq.load(Ordering::SeqCst) != seq {
                return false;
            }
            match result {
                Ok(data) => {
                    state.data = Some(data.clone());
                    state.error = None;
                }
                Err(err) => {
                    state.data = None;
                    state.error = Some(err.user_message());
                }
            }
            state.loading = false;
            true
        });

        if !applied {
            debug!(
                seq,
                latest = self.latest_seq(),
                "discarding superseded quake response"
            );
            return;
        }
        match result {
            Ok(data) => info!(
                seq,
                items = data.items.len(),
                count = data.meta.count,
                "quakes loaded"
            ),
            Err(err) => warn!(seq, code = err.code(), error = %err, "quake fetch failed"),
        }
    }

    /// Look up a record in the current results
    pub fn find(&self, id: &str) -> Option<Quake> {
        let state = self.inner.state.borrow();
        state.data.as_ref().and_then(|data| data.find(id)).cloned()
    }

    /// Issue one fetch per received parameter set, in arrival order
    pub fn drive(&self, mut updates: mpsc::UnboundedReceiver<QueryParams>) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            while let Some(params) = updates.recv().await {
                this.spawn_fetch(params);
            }
            debug!("filter channel closed; fetch driver stopping");
        })
    }
}

/// One viewer's session: filters, fetch lifecycle and selection
pub struct QuakeSession {
    filters: FilterState,
    controller: FetchController,
    selection: Selection,
    driver: JoinHandle<()>,
}

impl QuakeSession {
    /// Start a session and issue the initial fetch. Must run inside a Tokio runtime.
    pub fn start(source: Arc<dyn QuakeSource>, initial: QueryParams) -> Self {
        let controller = FetchController::new(source);
        let (tx, rx) = mpsc::unbounded_channel();
        let driver = controller.drive(rx);
        let mut filters = FilterState::new(initial, tx);
        filters.announce();

        Self {
            filters,
            controller,
            selection: Selection::default(),
            driver,
        }
    }

    pub fn params(&self) -> QueryParams {
        self.filters.params()
    }

    pub fn set_window(&mut self, window: Window) {
        self.filters.set_window(window);
    }

    pub fn set_min_mag(&mut self, min_mag: f64) {
        self.filters.set_min_mag(min_mag);
    }

    pub fn set_min_mag_text(&mut self, text: &str) {
        self.filters.set_min_mag_text(text);
    }

    pub fn set_limit(&mut self, limit: i64) {
        self.filters.set_limit(limit);
    }

    /// Refetch with the current filter values
    pub fn refresh(&mut self) {
        self.filters.announce();
    }

    /// Whether the refresh action should be offered: nothing queued, nothing loading
    pub fn can_refresh(&self) -> bool {
        !self.has_pending() && !self.controller.is_loading()
    }

    /// A requested fetch has not been issued by the driver yet
    fn has_pending(&self) -> bool {
        self.controller.latest_seq() < self.filters.requested()
    }

    pub fn controller(&self) -> &FetchController {
        &self.controller
    }

    pub fn state(&self) -> FetchState {
        self.controller.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.controller.subscribe()
    }

    /// Wait until every fetch requested so far has been issued and the latest one applied
    pub async fn settled(&self) -> FetchState {
        let requested = self.filters.requested();
        let controller = self.controller.clone();
        let mut rx = self.controller.subscribe();
        let state = match rx
            .wait_for(|state| controller.latest_seq() >= requested && state.is_settled())
            .await
        {
            Ok(state) => state.clone(),
            Err(_) => self.controller.state(),
        };
        state
    }

    pub fn select(&mut self, quake: Quake) {
        self.selection.select(quake);
    }

    /// Select the record with `id` from the current results; false if absent
    pub fn select_by_id(&mut self, id: &str) -> bool {
        match self.controller.find(id) {
            Some(quake) => {
                self.selection.select(quake);
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }
}

impl Drop for QuakeSession {
    fn drop(&mut self) {
        self.driver.abort();
    }
}
