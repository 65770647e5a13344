//! Cross-thread exchange slots between the tick loop and its clients.

use std::sync::{Condvar, Mutex};

use skyward_core::events::{DeltaRequest, TickEvent};

use crate::autopilot::AwaitError;

/// Predicate over published tick events.
pub type Predicate = Box<dyn Fn(&TickEvent) -> bool + Send>;

/// Single-slot delta-request exchange: one producer (the autopilot), one
/// consumer (the tick loop). A new request overwrites an unconsumed one —
/// last write wins, no merging.
#[derive(Default)]
pub struct DeltaSlot {
    slot: Mutex<Option<DeltaRequest>>,
}

impl DeltaSlot {
    pub fn put(&self, request: DeltaRequest) {
        *self.slot.lock().expect("delta slot poisoned") = Some(request);
    }

    pub fn take(&self) -> Option<DeltaRequest> {
        self.slot.lock().expect("delta slot poisoned").take()
    }
}

/// The await-condition rendezvous.
///
/// Predicate evaluation happens under the same lock as publication, so a
/// waiter can neither miss a qualifying event nor see a stale one.
#[derive(Default)]
pub struct ConditionSlot {
    state: Mutex<ConditionState>,
    condvar: Condvar,
}

#[derive(Default)]
struct ConditionState {
    predicate: Option<Predicate>,
    satisfied: Option<TickEvent>,
    cancelled: bool,
}

impl ConditionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a wait is currently pending.
    pub fn awaiting(&self) -> bool {
        self.state
            .lock()
            .expect("condition slot poisoned")
            .predicate
            .is_some()
    }

    /// Tick-thread side: evaluate the pending predicate (if any) against a
    /// freshly published event, waking the waiter on a match.
    pub fn publish(&self, event: &TickEvent) {
        let mut state = self.state.lock().expect("condition slot poisoned");
        let matched = match &state.predicate {
            Some(predicate) => predicate(event),
            None => false,
        };
        if matched {
            state.predicate = None;
            state.satisfied = Some(event.clone());
            self.condvar.notify_all();
        }
    }

    /// Autopilot side: block until a fresh event satisfies `predicate`, or
    /// the simulation stops.
    ///
    /// Panics if called while another wait is already pending.
    pub fn wait(&self, predicate: Predicate) -> Result<TickEvent, AwaitError> {
        let mut state = self.state.lock().expect("condition slot poisoned");
        if state.cancelled {
            return Err(AwaitError::Cancelled);
        }
        assert!(
            state.predicate.is_none(),
            "await_condition called while another wait is pending"
        );
        state.predicate = Some(predicate);

        loop {
            state = self.condvar.wait(state).expect("condition slot poisoned");
            if let Some(event) = state.satisfied.take() {
                return Ok(event);
            }
            if state.cancelled {
                state.predicate = None;
                return Err(AwaitError::Cancelled);
            }
        }
    }

    /// Release any waiter without satisfying its predicate.
    pub fn cancel(&self) {
        let mut state = self.state.lock().expect("condition slot poisoned");
        state.cancelled = true;
        state.predicate = None;
        self.condvar.notify_all();
    }
}
