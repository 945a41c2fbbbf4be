use crate::controller::{ApplyStatus, PlanController};
use crate::error::{Error, Result};
use crate::powercfg::{ActivePlan, PowerCfg};
use crate::profile::PowerProfile;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Query,
    Apply(PowerProfile),
}

/// Messages delivered to the foreground loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ActivePlan(ActivePlan),
    Apply(ApplyStatus),
}

/// Background thread that owns the controller and runs requests one at a time.
///
/// Requests never block the caller. Because a single thread drains the queue,
/// the command sequences of two applies can never interleave.
pub struct Worker {
    requests: Option<Sender<Request>>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Start the worker. Events arrive on the returned receiver in the order
    /// the requests were submitted.
    pub fn spawn<P>(controller: PlanController<P>) -> Result<(Self, Receiver<Event>)>
    where
        P: PowerCfg + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("powerplan-worker".to_string())
            .spawn(move || serve(controller, request_rx, event_tx))
            .map_err(|e| Error::Other(format!("failed to start worker thread: {}", e)))?;

        let worker = Self {
            requests: Some(request_tx),
            handle: Some(handle),
        };
        Ok((worker, event_rx))
    }

    pub fn query(&self) -> Result<()> {
        self.send(Request::Query)
    }

    pub fn apply(&self, profile: PowerProfile) -> Result<()> {
        self.send(Request::Apply(profile))
    }

    fn send(&self, request: Request) -> Result<()> {
        self.requests
            .as_ref()
            .ok_or(Error::WorkerGone)?
            .send(request)
            .map_err(|_| Error::WorkerGone)
    }

    /// Finish queued requests and wait for the thread to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.requests.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::error!("power plan worker panicked");
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn serve<P: PowerCfg>(
    mut controller: PlanController<P>,
    requests: Receiver<Request>,
    events: Sender<Event>,
) {
    for request in requests {
        debug!(?request, "worker handling request");
        let delivered = match request {
            Request::Query => events.send(Event::ActivePlan(controller.query())).is_ok(),
            Request::Apply(profile) => {
                let mut delivered = true;
                // The error is already carried by the Failed event.
                let _ = controller.apply_with_progress(profile, |status| {
                    delivered &= events.send(Event::Apply(status)).is_ok();
                });
                delivered
            }
        };

        if !delivered {
            debug!("event receiver dropped; stopping worker");
            break;
        }
    }
}
