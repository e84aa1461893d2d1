//! Runs analyses one at a time on a blocking thread.

#[derive(Debug)]
struct Job {
    input: crate::AnalysisInput,
    reply: tokio::sync::oneshot::Sender<String>,
}

#[derive(Debug, Clone)]
pub struct WorkerHandle {
    tx: tokio::sync::mpsc::UnboundedSender<Job>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// The worker thread is gone.
    Stopped,
    /// The job was dropped before a payload was produced.
    Cancelled,
}

impl std::fmt::Display for WorkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stopped => write!(f, "analysis worker has stopped"),
            Self::Cancelled => write!(f, "analysis was cancelled"),
        }
    }
}

impl std::error::Error for WorkerError {}

/// Starts the worker. It runs until every [`WorkerHandle`] is dropped.
///
/// Must be called from within a tokio runtime.
pub fn spawn() -> (WorkerHandle, tokio::task::JoinHandle<()>) {
    spawn_with(|input, reply| crate::analyse(input, reply))
}

fn spawn_with<A>(analyse: A) -> (WorkerHandle, tokio::task::JoinHandle<()>)
where
    A: Fn(crate::AnalysisInput, &mut dyn FnMut(String)) + Send + 'static,
{
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Job>();

    let handle = tokio::task::spawn_blocking(move || {
        while let Some(job) = rx.blocking_recv() {
            run(job, &analyse);
        }

        tracing::info!("Analysis worker stopped");
    });

    (WorkerHandle { tx }, handle)
}

/// Answers the job exactly once, even if the analysis panics.
fn run<A>(job: Job, analyse: &A)
where
    A: Fn(crate::AnalysisInput, &mut dyn FnMut(String)),
{
    let Job { input, reply } = job;
    let mut reply = Some(reply);

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        analyse(input, &mut |payload| deliver(&mut reply, payload));
    }));
    if outcome.is_err() {
        tracing::error!("Analysis panicked");
        deliver(&mut reply, analysis::error_payload("analysis panicked"));
    }
}

fn deliver(reply: &mut Option<tokio::sync::oneshot::Sender<String>>, payload: String) {
    let reply = match reply.take() {
        Some(r) => r,
        None => return,
    };

    if reply.send(payload).is_err() {
        tracing::warn!("Requester went away before the result was ready");
    }
}

impl WorkerHandle {
    /// Queues the input and waits for its payload.
    pub async fn submit(&self, input: crate::AnalysisInput) -> Result<String, WorkerError> {
        let (reply, rx) = tokio::sync::oneshot::channel();

        self.tx
            .send(Job { input, reply })
            .map_err(|_| WorkerError::Stopped)?;

        rx.await.map_err(|_| WorkerError::Cancelled)
    }
}
