//! Background thread that owns the backend and answers requests in order.

use anyhow::{Context, Result};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use super::{Backend, FetchError, Request, Response};

pub(crate) enum Job<T> {
    Fetch { tag: T, request: Request },
    ClearCache,
}

/// A finished request, returned with the tag it was submitted under.
pub(crate) struct Delivery<T> {
    pub(crate) tag: T,
    pub(crate) result: Result<Response, FetchError>,
}

pub(crate) struct Worker<T> {
    jobs: Sender<Job<T>>,
    deliveries: Receiver<Delivery<T>>,
}

impl<T: Send + 'static> Worker<T> {
    pub(crate) fn spawn<B>(mut backend: B) -> Result<Self>
    where
        B: Backend + Send + 'static,
    {
        let (job_tx, job_rx) = mpsc::channel::<Job<T>>();
        let (delivery_tx, delivery_rx) = mpsc::channel();

        thread::Builder::new()
            .name("emptui-fetch".into())
            .spawn(move || {
                // Exits once the UI side drops its sender.
                for job in job_rx {
                    match job {
                        Job::Fetch { tag, request } => {
                            let result = backend.call(&request);
                            if let Err(ref e) = result {
                                tracing::warn!(endpoint = %request.endpoint(), error = %e, "request failed");
                            }
                            if delivery_tx.send(Delivery { tag, result }).is_err() {
                                break;
                            }
                        }
                        Job::ClearCache => backend.clear_cache(),
                    }
                }
                tracing::debug!("fetch worker stopped");
            })
            .context("Failed to start fetch worker")?;

        Ok(Self {
            jobs: job_tx,
            deliveries: delivery_rx,
        })
    }

    pub(crate) fn submit(&self, tag: T, request: Request) -> Result<(), FetchError> {
        self.jobs
            .send(Job::Fetch { tag, request })
            .map_err(|_| FetchError::WorkerGone)
    }

    pub(crate) fn clear_cache(&self) -> Result<(), FetchError> {
        self.jobs
            .send(Job::ClearCache)
            .map_err(|_| FetchError::WorkerGone)
    }

    /// Non-blocking poll for the next finished request.
    pub(crate) fn try_recv(&self) -> Result<Option<Delivery<T>>, FetchError> {
        match self.deliveries.try_recv() {
            Ok(delivery) => Ok(Some(delivery)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(FetchError::WorkerGone),
        }
    }

    #[cfg(test)]
    pub(crate) fn recv_timeout(&self, timeout: std::time::Duration) -> Option<Delivery<T>> {
        self.deliveries.recv_timeout(timeout).ok()
    }
}
