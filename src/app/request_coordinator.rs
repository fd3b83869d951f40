use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

use crate::{domain::estimate::OutboundRequest, ports::TransportPort};

/// One in-flight network operation.
///
/// A handle is live while it sits in the coordinator's slot. Cancelling or
/// superseding it removes it from the slot and aborts its task, and a
/// completing task only reports back if its own handle is still there.
#[derive(Debug)]
pub struct RequestHandle {
    generation: u64,
    address: String,
    payload: Option<String>,
    task: Option<JoinHandle<()>>,
}

impl RequestHandle {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    fn abort(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    next_generation: u64,
    current: Option<RequestHandle>,
}

impl Slot {
    fn take_if_current(&mut self, generation: u64) -> Option<RequestHandle> {
        if self
            .current
            .as_ref()
            .is_some_and(|handle| handle.generation == generation)
        {
            return self.current.take();
        }
        None
    }
}

/// Single-flight request issuer: a new `post` aborts whatever was in flight.
pub struct RequestCoordinator<T> {
    transport: Arc<T>,
    slot: Arc<Mutex<Slot>>,
}

impl<T> RequestCoordinator<T>
where
    T: TransportPort + 'static,
{
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Issues `request` on a background task.
    ///
    /// `on_success` receives the body of a 2xx response. `on_failure` receives
    /// the body and status of any other response, or `(None, None)` when the
    /// transport itself failed. Neither fires if the request is cancelled or
    /// superseded before its response is observed. Must be called from within
    /// a tokio runtime.
    pub fn post<S, F>(&self, request: OutboundRequest, on_success: S, on_failure: F)
    where
        S: FnOnce(String) + Send + 'static,
        F: FnOnce(Option<String>, Option<u16>) + Send + 'static,
    {
        let mut slot = lock_slot(&self.slot);

        if let Some(previous) = slot.current.take() {
            tracing::debug!(
                generation = previous.generation,
                url = %previous.address,
                "aborting superseded request"
            );
            previous.abort();
        }

        slot.next_generation += 1;
        let generation = slot.next_generation;
        let address = request.url.clone();
        let payload = request.body.clone();

        tracing::info!(generation, method = %request.method, url = %address, "posting request");

        let transport = Arc::clone(&self.transport);
        let shared = Arc::clone(&self.slot);
        let task = tokio::spawn(async move {
            let result = transport.send(&request).await;

            let still_current = lock_slot(&shared).take_if_current(generation).is_some();
            if !still_current {
                tracing::debug!(generation, "swallowed response of cancelled request");
                return;
            }

            match result {
                Ok(response) if response.is_success() => {
                    tracing::info!(generation, status = response.status, "request succeeded");
                    on_success(response.body);
                }
                Ok(response) => {
                    tracing::warn!(generation, status = response.status, "request failed");
                    on_failure(Some(response.body), Some(response.status));
                }
                Err(err) => {
                    tracing::warn!(generation, error = %err, "transport failed");
                    on_failure(None, None);
                }
            }
        });

        slot.current = Some(RequestHandle {
            generation,
            address,
            payload,
            task: Some(task),
        });
    }

    /// Aborts the request in flight, if any. Calling it with nothing in flight
    /// does nothing.
    pub fn cancel(&self) {
        let Some(handle) = lock_slot(&self.slot).current.take() else {
            return;
        };

        tracing::info!(generation = handle.generation, url = %handle.address, "request cancelled");
        handle.abort();
    }
}

impl<T> RequestCoordinator<T> {
    pub fn is_active(&self) -> bool {
        lock_slot(&self.slot).current.is_some()
    }

    pub fn active_address(&self) -> Option<String> {
        lock_slot(&self.slot)
            .current
            .as_ref()
            .map(|handle| handle.address().to_string())
    }

    pub fn active_payload(&self) -> Option<String> {
        lock_slot(&self.slot)
            .current
            .as_ref()
            .and_then(|handle| handle.payload().map(str::to_string))
    }
}

impl<T> Drop for RequestCoordinator<T> {
    fn drop(&mut self) {
        if let Some(handle) = lock_slot(&self.slot).current.take() {
            handle.abort();
        }
    }
}

fn lock_slot(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
