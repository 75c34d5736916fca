//! Bridge between the egui shell and the transfer workspace crates.
//! Wallet and network calls block, so every operation runs off the UI thread.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use eframe::egui;
use eyre::WrapErr;

use rusty_send_adapters::{
    KeplrAdapter, RestBalanceAdapter, SigningClientAdapter, TransferAdapterConfig,
};
use rusty_send_core::{ChainConfig, TransferFlowController, TransferRequest, TransferState};

type SendController = TransferFlowController<KeplrAdapter, RestBalanceAdapter, SigningClientAdapter>;

const AUTO_CONNECT_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AutoConnect,
    Connect,
    RefreshBalance,
    Submit,
}

/// Result of one finished operation, picked up by the next frame.
#[derive(Debug, Clone)]
pub struct OperationOutcome {
    pub operation: Operation,
    /// Controller state after the operation; `None` if it never ran.
    pub state: Option<TransferState>,
    pub error: Option<String>,
}

pub struct TransferBridge {
    controller: Arc<Mutex<SendController>>,
    chain: ChainConfig,
    runtime: tokio::runtime::Runtime,
    outcomes: Arc<Mutex<Vec<OperationOutcome>>>,
    in_flight: Arc<AtomicUsize>,
}

impl TransferBridge {
    pub fn new(config: TransferAdapterConfig) -> eyre::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("rusty-send-worker")
            .enable_all()
            .build()
            .wrap_err("failed to start worker runtime")?;
        let chain = config.chain.clone();
        let controller = TransferFlowController::new(
            KeplrAdapter::with_config(config.clone()),
            RestBalanceAdapter::with_config(config.clone()),
            SigningClientAdapter::with_config(config),
            chain.clone(),
        );
        Ok(Self {
            controller: Arc::new(Mutex::new(controller)),
            chain,
            runtime,
            outcomes: Arc::default(),
            in_flight: Arc::default(),
        })
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Gives the wallet a moment to inject itself before probing for a session.
    pub fn schedule_auto_connect(&self, ctx: &egui::Context) {
        self.dispatch(ctx, Operation::AutoConnect, Some(AUTO_CONNECT_DELAY), |c| {
            c.auto_connect();
            None
        });
    }

    pub fn connect(&self, ctx: &egui::Context) {
        self.dispatch(ctx, Operation::Connect, None, |c| {
            c.detect_and_connect().err().map(|e| e.to_string())
        });
    }

    pub fn refresh_balance(&self, ctx: &egui::Context) {
        self.dispatch(ctx, Operation::RefreshBalance, None, |c| {
            c.refresh_balance();
            None
        });
    }

    pub fn submit(&self, ctx: &egui::Context, request: TransferRequest) {
        self.dispatch(ctx, Operation::Submit, None, move |c| {
            c.update_form(request);
            c.submit_transfer().err().map(|e| e.to_string())
        });
    }

    pub fn drain_outcomes(&self) -> Vec<OperationOutcome> {
        match self.outcomes.lock() {
            Ok(mut g) => std::mem::take(&mut *g),
            Err(e) => {
                tracing::error!(error = %e, "outcome slot poisoned");
                Vec::new()
            }
        }
    }

    fn dispatch<F>(
        &self,
        ctx: &egui::Context,
        operation: Operation,
        delay: Option<Duration>,
        work: F,
    ) where
        F: FnOnce(&mut SendController) -> Option<String> + Send + 'static,
    {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let controller = Arc::clone(&self.controller);
        let outcomes = Arc::clone(&self.outcomes);
        let in_flight = Arc::clone(&self.in_flight);
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let joined =
                tokio::task::spawn_blocking(move || run_operation(&controller, operation, work))
                    .await;
            let outcome = joined.unwrap_or_else(|e| OperationOutcome {
                operation,
                state: None,
                error: Some(format!("operation aborted: {e}")),
            });
            if let Some(error) = &outcome.error {
                tracing::debug!(?operation, %error, "operation finished with error");
            }

            in_flight.fetch_sub(1, Ordering::SeqCst);
            match outcomes.lock() {
                Ok(mut g) => g.push(outcome),
                Err(e) => tracing::error!(error = %e, "outcome slot poisoned"),
            }
            ctx.request_repaint();
        });
    }
}

fn run_operation<F>(
    controller: &Mutex<SendController>,
    operation: Operation,
    work: F,
) -> OperationOutcome
where
    F: FnOnce(&mut SendController) -> Option<String>,
{
    match controller.lock() {
        Ok(mut c) => {
            let error = work(&mut c);
            OperationOutcome {
                operation,
                state: Some(c.state().clone()),
                error,
            }
        }
        Err(e) => OperationOutcome {
            operation,
            state: None,
            error: Some(format!("controller lock poisoned: {e}")),
        },
    }
}
