//! Autopilot coordination: runs caller-supplied logic on its own thread
//! and implements the await-condition / delta-request protocol against
//! published tick events.

use std::sync::Arc;
use std::thread::JoinHandle;

use thiserror::Error;

use skyward_core::events::{DeltaRequest, TickEvent};

use crate::runner::RunnerError;
use crate::shared::{ConditionSlot, DeltaSlot};

/// Why a blocked wait returned without a satisfying event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AwaitError {
    /// The simulation stopped; the routine is expected to unwind.
    #[error("simulation stopped while awaiting a condition")]
    Cancelled,
}

/// Coordinator lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinatorState {
    #[default]
    NotStarted,
    Running,
    /// The routine is blocked inside `await_condition`.
    AwaitingCondition,
    Stopped,
}

/// Capabilities handed to the autopilot routine.
#[derive(Clone)]
pub struct AutopilotHandle {
    pub(crate) condition: Arc<ConditionSlot>,
    pub(crate) delta_slot: Arc<DeltaSlot>,
}

impl AutopilotHandle {
    /// Block until a newly published tick event satisfies `predicate`,
    /// returning that event. The predicate is evaluated once per fresh
    /// event, never against a stale one, and is cleared on return.
    ///
    /// Panics if a wait is already pending.
    pub fn await_condition(
        &self,
        predicate: impl Fn(&TickEvent) -> bool + Send + 'static,
    ) -> Result<TickEvent, AwaitError> {
        self.condition.wait(Box::new(predicate))
    }

    /// Queue a control delta for consumption by the next tick. At most one
    /// request is outstanding; a new call overwrites an unconsumed one.
    pub fn request_delta(&self, request: DeltaRequest) {
        self.delta_slot.put(request);
    }
}

/// Owns the autopilot thread and its lifecycle.
pub struct AutopilotCoordinator {
    condition: Arc<ConditionSlot>,
    delta_slot: Arc<DeltaSlot>,
    lifecycle: CoordinatorState,
    thread: Option<JoinHandle<()>>,
}

impl AutopilotCoordinator {
    pub(crate) fn new(condition: Arc<ConditionSlot>, delta_slot: Arc<DeltaSlot>) -> Self {
        Self {
            condition,
            delta_slot,
            lifecycle: CoordinatorState::NotStarted,
            thread: None,
        }
    }

    pub fn state(&self) -> CoordinatorState {
        match self.lifecycle {
            CoordinatorState::Running if self.condition.awaiting() => {
                CoordinatorState::AwaitingCondition
            }
            state => state,
        }
    }

    /// Launch the routine on a dedicated thread.
    pub fn start(
        &mut self,
        routine: impl FnOnce(AutopilotHandle) + Send + 'static,
    ) -> Result<(), RunnerError> {
        if self.lifecycle != CoordinatorState::NotStarted {
            return Err(RunnerError::AutopilotAlreadyStarted);
        }

        let handle = AutopilotHandle {
            condition: self.condition.clone(),
            delta_slot: self.delta_slot.clone(),
        };
        self.thread = Some(
            std::thread::Builder::new()
                .name("skyward-autopilot".into())
                .spawn(move || routine(handle))
                .expect("failed to spawn autopilot thread"),
        );
        self.lifecycle = CoordinatorState::Running;
        Ok(())
    }

    /// Cancel any pending wait and join the routine. The routine is not
    /// required to have completed its work, only to stop blocking.
    pub fn stop(&mut self) {
        if self.lifecycle == CoordinatorState::Running {
            self.condition.cancel();
            if let Some(thread) = self.thread.take() {
                let _ = thread.join();
            }
        }
        self.lifecycle = CoordinatorState::Stopped;
    }
}
