use std::fmt::Display;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{trace, warn};

enum Command<T> {
    Update(T),
    Flush(oneshot::Sender<()>),
    Cancel(oneshot::Sender<()>),
}

/// Coalesces rapid updates into one write after a quiet period.
///
/// A background task owns the pending value and its timer. Each
/// [`schedule`](Debouncer::schedule) replaces the pending value and restarts
/// the quiet period, so only the last value of a burst reaches the sink.
/// Dropping the handle flushes whatever is still pending.
///
/// The sink runs on tokio's blocking pool, one call at a time, so slow disk
/// writes never stall the runtime's worker threads.
///
/// Must be created inside a tokio runtime.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<Command<T>>,
    worker: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the worker. Sink errors are logged and dropped.
    pub fn new<F, E>(delay: Duration, sink: F) -> Self
    where
        F: FnMut(T) -> Result<(), E> + Send + 'static,
        E: Display + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run(delay, rx, Arc::new(Mutex::new(sink))));
        Self { tx, worker }
    }

    /// Replace the pending value and restart the quiet period.
    pub fn schedule(&self, value: T) {
        if self.tx.send(Command::Update(value)).is_err() {
            warn!("Debounce worker has stopped, update discarded");
        }
    }

    /// Write the pending value now, if there is one.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(Command::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    /// Discard the pending value without writing it.
    pub async fn cancel(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(Command::Cancel(done)).is_ok() {
            let _ = wait.await;
        }
    }

    /// Flush and wait for the worker to exit.
    pub async fn shutdown(self) {
        let Debouncer { tx, worker } = self;
        drop(tx);
        if let Err(e) = worker.await {
            warn!(error = %e, "Debounce worker failed");
        }
    }
}

async fn run<T, F, E>(
    delay: Duration,
    mut rx: mpsc::UnboundedReceiver<Command<T>>,
    sink: Arc<Mutex<F>>,
) where
    T: Send + 'static,
    F: FnMut(T) -> Result<(), E> + Send + 'static,
    E: Display + Send + 'static,
{
    let mut pending: Option<T> = None;
    let mut deadline = Instant::now();

    loop {
        tokio::select! {
            command = rx.recv() => match command {
                Some(Command::Update(value)) => {
                    pending = Some(value);
                    deadline = Instant::now() + delay;
                }
                Some(Command::Flush(done)) => {
                    if let Some(value) = pending.take() {
                        write(&sink, value).await;
                    }
                    let _ = done.send(());
                }
                Some(Command::Cancel(done)) => {
                    if pending.take().is_some() {
                        trace!("Pending write cancelled");
                    }
                    let _ = done.send(());
                }
                None => {
                    if let Some(value) = pending.take() {
                        write(&sink, value).await;
                    }
                    break;
                }
            },
            _ = sleep_until(deadline), if pending.is_some() => {
                if let Some(value) = pending.take() {
                    write(&sink, value).await;
                }
            }
        }
    }
}

async fn write<T, F, E>(sink: &Arc<Mutex<F>>, value: T)
where
    T: Send + 'static,
    F: FnMut(T) -> Result<(), E> + Send + 'static,
    E: Display + Send + 'static,
{
    let sink = Arc::clone(sink);
    let result = tokio::task::spawn_blocking(move || {
        let mut sink = sink.lock().unwrap_or_else(PoisonError::into_inner);
        (&mut *sink)(value)
    })
    .await;

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Debounced write failed"),
        Err(e) => warn!(error = %e, "Debounced write panicked"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::{self, ThreadId};

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl FnMut(u32) -> Result<(), String>) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let written = written.clone();
            move |value: u32| -> Result<(), String> {
                written.lock().unwrap().push(value);
                Ok(())
            }
        };
        (written, sink)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesced() {
        let (written, sink) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(700), sink);

        debouncer.schedule(1);
        debouncer.schedule(2);
        debouncer.schedule(3);

        tokio::time::sleep(Duration::from_millis(699)).await;
        assert!(written.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*written.lock().unwrap(), vec![3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_restarts_quiet_period() {
        let (written, sink) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(700), sink);

        debouncer.schedule(1);
        tokio::time::sleep(Duration::from_millis(500)).await;
        debouncer.schedule(2);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(written.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(*written.lock().unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_flush_and_cancel() {
        let (written, sink) = recorder();
        let debouncer = Debouncer::new(Duration::from_secs(60), sink);

        debouncer.schedule(1);
        debouncer.flush().await;
        assert_eq!(*written.lock().unwrap(), vec![1]);

        debouncer.schedule(2);
        debouncer.cancel().await;
        debouncer.shutdown().await;
        assert_eq!(*written.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_shutdown_flushes_pending() {
        let (written, sink) = recorder();
        let debouncer = Debouncer::new(Duration::from_secs(60), sink);

        debouncer.schedule(7);
        debouncer.shutdown().await;
        assert_eq!(*written.lock().unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn test_sink_errors_are_swallowed() {
        let debouncer = Debouncer::new(Duration::from_secs(60), |_: u32| {
            Err::<(), _>("disk full".to_string())
        });
        debouncer.schedule(1);
        debouncer.flush().await;
        debouncer.shutdown().await;
    }

    #[tokio::test]
    async fn test_sink_runs_off_the_runtime_thread() {
        let seen: Arc<Mutex<Option<ThreadId>>> = Arc::new(Mutex::new(None));
        let sink = {
            let seen = seen.clone();
            move |_: u32| -> Result<(), String> {
                *seen.lock().unwrap() = Some(thread::current().id());
                Ok(())
            }
        };
        let debouncer = Debouncer::new(Duration::from_secs(60), sink);

        debouncer.schedule(1);
        debouncer.flush().await;

        let writer_thread = seen.lock().unwrap().expect("sink was called");
        assert_ne!(writer_thread, thread::current().id());
        debouncer.shutdown().await;
    }

    #[tokio::test]
    async fn test_panicking_sink_does_not_stop_worker() {
        let (written, mut record) = recorder();
        let debouncer = Debouncer::new(Duration::from_secs(60), move |value: u32| {
            if value == 0 {
                panic!("bad value");
            }
            record(value)
        });

        debouncer.schedule(0);
        debouncer.flush().await;
        debouncer.schedule(5);
        debouncer.flush().await;
        debouncer.shutdown().await;
        assert_eq!(*written.lock().unwrap(), vec![5]);
    }
}
