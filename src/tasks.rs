//! Background portal calls.
//!
//! Each user action spawns one task on the runner's tokio runtime. Results
//! come back over a single mpsc channel that the UI loop drains between
//! frames, so view state is only ever touched from the UI thread.

use crate::portal::{
    HomeworkSummary, LoginOutcome, PortalClient, PortalError, SubmissionRequest, SubmitReceipt,
};
use anyhow::{Context, Result};
use std::fmt;
use std::future::Future;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Login,
    HomeworkList,
    Submission,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Login => write!(f, "login"),
            TaskKind::HomeworkList => write!(f, "homework list"),
            TaskKind::Submission => write!(f, "submission"),
        }
    }
}

/// Result of one background call, delivered to the UI loop.
#[derive(Debug)]
pub enum TaskOutcome {
    Login {
        /// Screen id the user typed, kept for the session
        screen_id: String,
        result: Result<LoginOutcome, PortalError>,
    },
    HomeworkList(Result<Vec<HomeworkSummary>, PortalError>),
    Submission(Result<SubmitReceipt, PortalError>),
    /// The task panicked or was cancelled before producing a result
    Crashed { kind: TaskKind, message: String },
}

pub struct TaskRunner {
    runtime: Runtime,
    client: Arc<PortalClient>,
    tx: Sender<TaskOutcome>,
    rx: Receiver<TaskOutcome>,
}

impl TaskRunner {
    pub fn new(client: PortalClient) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("hwsubmit-worker")
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;
        let (tx, rx) = mpsc::channel();

        Ok(Self {
            runtime,
            client: Arc::new(client),
            tx,
            rx,
        })
    }

    pub fn login(&self, screen_id: String, password: String) {
        let client = Arc::clone(&self.client);
        let echoed = screen_id.clone();
        self.spawn(
            TaskKind::Login,
            async move { client.login(&screen_id, &password).await },
            move |result| TaskOutcome::Login {
                screen_id: echoed,
                result,
            },
        );
    }

    pub fn fetch_homeworks(&self, token: String) {
        let client = Arc::clone(&self.client);
        self.spawn(
            TaskKind::HomeworkList,
            async move { client.list_homeworks(&token).await },
            TaskOutcome::HomeworkList,
        );
    }

    pub fn submit(&self, token: String, request: SubmissionRequest) {
        let client = Arc::clone(&self.client);
        self.spawn(
            TaskKind::Submission,
            async move { client.submit_homework(&token, &request).await },
            TaskOutcome::Submission,
        );
    }

    /// All results that have arrived since the last call, without blocking.
    pub fn drain(&self) -> Vec<TaskOutcome> {
        self.rx.try_iter().collect()
    }

    /// Block until the next result or `timeout`. Test hook; the UI loop
    /// only uses [`TaskRunner::drain`].
    #[doc(hidden)]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<TaskOutcome> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Run `work` in its own task; a panic inside it becomes `TaskOutcome::Crashed`.
    fn spawn<T, Fut, W>(&self, kind: TaskKind, work: Fut, wrap: W)
    where
        T: Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        W: FnOnce(T) -> TaskOutcome + Send + 'static,
    {
        let tx = self.tx.clone();
        debug!("Spawning {} task", kind);
        self.runtime.spawn(async move {
            let outcome = match tokio::spawn(work).await {
                Ok(value) => wrap(value),
                Err(join_error) => {
                    let message = if join_error.is_panic() {
                        panic_message(join_error.into_panic())
                    } else {
                        "task was cancelled".to_string()
                    };
                    error!("{} task failed: {}", kind, message);
                    TaskOutcome::Crashed { kind, message }
                }
            };
            if tx.send(outcome).is_err() {
                debug!("UI loop gone, dropping {} result", kind);
            }
        });
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "task panicked".to_string()
    }
}
