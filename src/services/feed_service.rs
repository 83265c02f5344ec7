//! The "Latest transactions" live feed: initial fetch, subscription wiring and rendering.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::{HashSet, VecDeque};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::queries::{new_transaction_subscription, NEW_TRANSACTION_OPERATION};
use crate::api::subscription::start_message;
use crate::api::{ApiError, ExplorerClient, ReadyState, SocketEvent, SubscriptionClient};
use crate::commands::{self, CommandContext, CommandOutcome};
use crate::config::{Config, Environment};
use crate::models::Transaction;
use crate::services::transaction_service;
use crate::state::AppState;
use crate::utils::age::relative_age;
use crate::utils::links::{self, shorten};

const SUBSCRIPTION_ID: &str = "1";

/// Bounded, newest-first window of transactions plus the subscription handshake state
#[derive(Debug)]
pub struct LatestTransactions {
    items: VecDeque<Transaction>,
    capacity: usize,
    loading: bool,
    ready_state: ReadyState,
}

impl LatestTransactions {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity + 1),
            capacity,
            loading: true,
            ready_state: ReadyState::Connecting,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub fn items(&self) -> impl Iterator<Item = &Transaction> {
        self.items.iter()
    }

    /// Transaction ids in display order
    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|t| t.transaction_id.clone()).collect()
    }

    /// Install the fetched page and end loading. Returns the newest item.
    pub fn replace(&mut self, items: Vec<Transaction>) -> Option<&Transaction> {
        self.loading = false;
        self.items = items.into_iter().take(self.capacity).collect();
        self.items.front()
    }

    /// Loading ended without data
    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    /// Prepend `txn`; returns the evicted oldest item when the window was full
    pub fn push_latest(&mut self, txn: Transaction) -> Option<Transaction> {
        self.items.push_front(txn);
        if self.items.len() > self.capacity {
            self.items.pop_back()
        } else {
            None
        }
    }

    /// Track the socket state. Returns the `start` frame to send when the
    /// socket has just become open, and nothing otherwise.
    pub fn on_ready_state(&mut self, state: ReadyState) -> Option<String> {
        let previous = self.ready_state;
        self.ready_state = state;

        if state == ReadyState::Open && previous != ReadyState::Open {
            Some(start_message(
                SUBSCRIPTION_ID,
                NEW_TRANSACTION_OPERATION,
                &new_transaction_subscription(),
            ))
        } else {
            None
        }
    }

    /// Apply one inbound socket frame. Frames that do not carry a new
    /// transaction leave the window untouched.
    pub fn apply_message(&mut self, text: &str) -> Option<Transaction> {
        let txn = parse_new_transaction(text)?;
        if let Some(evicted) = self.push_latest(txn.clone()) {
            debug!("Evicted {} from the live window", evicted.transaction_id);
        }
        Some(txn)
    }
}

/// Extract `payload.data.newDataAvailabilityTransaction` from a socket frame
pub fn parse_new_transaction(text: &str) -> Option<Transaction> {
    let json: Value = serde_json::from_str(text).unwrap_or_else(|_| Value::Object(Default::default()));

    let data = json.get("payload").and_then(|p| p.get("data"))?;
    let raw = data.get("newDataAvailabilityTransaction")?;

    match serde_json::from_value::<Transaction>(raw.clone()) {
        Ok(txn) => Some(txn),
        Err(e) => {
            debug!("Ignoring push payload that is not a transaction: {}", e);
            None
        }
    }
}

/// Everything the feed renders besides the window itself
pub struct FeedView<'a> {
    pub environment: &'a Environment,
    pub explorer_url: &'a str,
    pub favorites: &'a HashSet<String>,
    pub last_finalized: Option<&'a Transaction>,
}

fn live_indicator(state: ReadyState) -> &'static str {
    match state {
        ReadyState::Open => "● live",
        ReadyState::Connecting => "◌ connecting",
        ReadyState::Closing | ReadyState::Closed => "○ offline",
    }
}

/// Render the widget as terminal text
pub fn render_feed(widget: &LatestTransactions, view: &FeedView<'_>, now: DateTime<Utc>) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "📡 Latest transactions · {} · {}\n",
        view.environment.name,
        live_indicator(widget.ready_state())
    ));
    output.push_str(&format!(
        "View all → {}\n",
        links::absolute(view.explorer_url, links::TRANSACTIONS_PATH)
    ));

    if let Some(last) = view.last_finalized {
        output.push_str(&format!(
            "Last finalized: {} ({})\n",
            shorten(&last.transaction_id, 8, 6),
            relative_age(last.created_at, now)
        ));
    }
    output.push('\n');

    if widget.is_loading() {
        output.push_str("⏳ Loading latest transactions...\n");
    }

    let txns: Vec<Transaction> = widget.items().cloned().collect();
    output.push_str(&transaction_service::transaction_table(&txns, view.favorites, 1, now).render());

    if !widget.is_empty() {
        output.push('\n');
        output.push_str(&transaction_service::transaction_links(
            &txns,
            1,
            view.explorer_url,
            &view.environment.viewer_url,
        ));
    }

    output
}

enum FeedEvent {
    Loaded(Result<Vec<Transaction>, ApiError>),
    Line(String),
    Command(CommandOutcome),
}

fn spawn_stdin_reader(events: mpsc::UnboundedSender<FeedEvent>) {
    // A plain thread: a blocked stdin read must not hold up runtime shutdown
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if events.send(FeedEvent::Line(line)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });
}

/// Run one typed line off the event loop so a slow request cannot stall
/// pushes or ctrl-c. The outcome comes back as a `FeedEvent::Command`.
fn spawn_command(
    ctx: Arc<CommandContext>,
    visible: Vec<String>,
    line: String,
    events: mpsc::UnboundedSender<FeedEvent>,
) {
    tokio::spawn(async move {
        let outcome = commands::handle_line(&ctx, &visible, &line).await;
        let _ = events.send(FeedEvent::Command(outcome));
    });
}

fn write_frame<W: Write>(out: &mut W, clear: bool, text: &str) -> io::Result<()> {
    if clear {
        write!(out, "\x1B[2J\x1B[H")?;
    }
    writeln!(out, "{}", text)?;
    out.flush()
}

/// `false` once the reader of stdout is gone
fn still_writable(result: io::Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            warn!("stdout closed, stopping the feed");
            false
        }
        Err(e) => {
            warn!("Failed to write to stdout: {}", e);
            true
        }
    }
}

fn emit(clear: bool, text: &str) -> bool {
    let mut stdout = io::stdout().lock();
    still_writable(write_frame(&mut stdout, clear, text))
}

async fn redraw(widget: &LatestTransactions, config: &Config, state: &AppState) -> bool {
    let favorites = state.favorites().await;
    let last_finalized = state.last_finalized().await;
    let view = FeedView {
        environment: state.selected_environment(),
        explorer_url: &config.explorer_url,
        favorites: &favorites,
        last_finalized: last_finalized.as_ref(),
    };

    emit(config.clear_screen, &render_feed(widget, &view, Utc::now()))
}

/// Run the live feed until `quit` or ctrl-c
pub async fn run(config: Config, client: Arc<ExplorerClient>, state: AppState) -> Result<(), String> {
    let mut widget = LatestTransactions::new(config.feed_limit);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<FeedEvent>();
    let (socket_tx, mut socket_rx) = mpsc::unbounded_channel::<SocketEvent>();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<String>();

    let fetch_task = {
        let client = client.clone();
        let events = event_tx.clone();
        let limit = config.feed_limit;
        tokio::spawn(async move {
            let result = client.latest_transactions(limit).await;
            let _ = events.send(FeedEvent::Loaded(result));
        })
    };

    let socket_task = {
        let subscription = SubscriptionClient::new(config.socket_endpoint());
        tokio::spawn(async move {
            if let Err(e) = subscription.run(socket_tx, outbound_rx).await {
                warn!("Live feed socket stopped: {}", e);
            }
        })
    };

    let command_events = event_tx.clone();
    spawn_stdin_reader(event_tx);

    let command_ctx = Arc::new(CommandContext::new(client, state.clone(), config.clone()));

    if !redraw(&widget, &config, &state).await {
        fetch_task.abort();
        socket_task.abort();
        return Ok(());
    }

    loop {
        tokio::select! {
            Some(event) = event_rx.recv() => match event {
                FeedEvent::Loaded(Ok(txns)) => {
                    info!("Loaded {} latest transactions", txns.len());
                    if let Some(first) = widget.replace(txns).cloned() {
                        state.set_last_finalized(first).await;
                    }
                    if !redraw(&widget, &config, &state).await {
                        break;
                    }
                }
                FeedEvent::Loaded(Err(e)) => {
                    error!("Failed to load latest transactions: {}", e);
                    widget.finish_loading();
                    if !redraw(&widget, &config, &state).await {
                        break;
                    }
                }
                FeedEvent::Line(line) => {
                    spawn_command(command_ctx.clone(), widget.ids(), line, command_events.clone());
                }
                FeedEvent::Command(outcome) => match outcome {
                    CommandOutcome::Quit => break,
                    CommandOutcome::Ignored => {}
                    CommandOutcome::Reply(text) => {
                        if !emit(false, &format!("{}\n", text)) {
                            break;
                        }
                    }
                    CommandOutcome::Refresh(text) => {
                        if !redraw(&widget, &config, &state).await || !emit(false, &format!("{}\n", text)) {
                            break;
                        }
                    }
                },
            },
            Some(socket_event) = socket_rx.recv() => match socket_event {
                SocketEvent::ReadyState(ready) => {
                    debug!("Socket ready state: {:?}", ready);
                    if let Some(start) = widget.on_ready_state(ready) {
                        info!("Subscribing to {}", NEW_TRANSACTION_OPERATION);
                        if outbound_tx.send(start).is_err() {
                            warn!("Live feed socket is gone; subscription not sent");
                        }
                    }
                    if ready == ReadyState::Closed {
                        warn!("Live feed disconnected; the table will no longer update");
                    }
                    if !redraw(&widget, &config, &state).await {
                        break;
                    }
                }
                SocketEvent::Message(text) => {
                    if let Some(txn) = widget.apply_message(&text) {
                        debug!(
                            "New transaction {} ({}/{} in window)",
                            txn.transaction_id,
                            widget.len(),
                            widget.capacity()
                        );
                        state.set_last_finalized(txn).await;
                        if !redraw(&widget, &config, &state).await {
                            break;
                        }
                    }
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    fetch_task.abort();
    socket_task.abort();
    Ok(())
}
