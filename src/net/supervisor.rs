use heapless::Vec;
use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use super::{
    event_bus::{Conditions, EventBus},
    types::{ConnectionState, LinkEvent, RetryBudget},
};

const SUPERVISOR_ACTIONS_MAX: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SupervisorAction {
    RequestConnect,
    Set(Conditions),
    Clear(Conditions),
    StartRetryDriver,
}

struct DispatchContext {
    /// Snapshot of the bus taken right before dispatch.
    conditions: Conditions,
    actions: Vec<SupervisorAction, SUPERVISOR_ACTIONS_MAX>,
}

impl DispatchContext {
    fn new(conditions: Conditions) -> Self {
        Self {
            conditions,
            actions: Vec::new(),
        }
    }

    fn push(&mut self, action: SupervisorAction) {
        if self.actions.push(action).is_err() {
            debug_assert!(false, "supervisor action buffer overflow: {:?}", action);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupervisorOutput {
    pub from: ConnectionState,
    pub to: ConnectionState,
    pub request_connect: bool,
    pub start_retry_driver: bool,
    pub retry_failures: u32,
}

impl SupervisorOutput {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Owns the connection lifecycle.
///
/// Runs on the link event path, so every transition is a handful of atomic
/// flag updates plus requests for the caller to act on; it never waits.
pub struct ConnectionSupervisor {
    machine: statig::blocking::StateMachine<SupervisorMachine>,
}

impl ConnectionSupervisor {
    pub fn new() -> Self {
        Self {
            machine: SupervisorMachine::default().state_machine(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.machine.inner().state
    }

    pub fn retry_budget(&self) -> RetryBudget {
        self.machine.inner().budget
    }

    pub fn handle(&mut self, event: LinkEvent, bus: &EventBus) -> SupervisorOutput {
        let from = self.state();
        let mut context = DispatchContext::new(bus.get());
        self.machine.handle_with_context(&event, &mut context);

        let mut request_connect = false;
        let mut start_retry_driver = false;
        for action in context.actions {
            match action {
                SupervisorAction::RequestConnect => request_connect = true,
                SupervisorAction::Set(conditions) => {
                    bus.set(conditions);
                }
                SupervisorAction::Clear(conditions) => {
                    bus.clear(conditions);
                }
                SupervisorAction::StartRetryDriver => start_retry_driver = true,
            }
        }

        let inner = self.machine.inner();
        SupervisorOutput {
            from,
            to: inner.state,
            request_connect,
            start_retry_driver,
            retry_failures: inner.budget.failures(),
        }
    }
}

impl Default for ConnectionSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct SupervisorMachine {
    state: ConnectionState,
    budget: RetryBudget,
}

impl SupervisorMachine {
    fn address_acquired(&mut self, context: &mut DispatchContext) -> Outcome<State> {
        self.budget.reset();
        context.push(SupervisorAction::Clear(Conditions::ATTEMPT_FAILED));
        context.push(SupervisorAction::Set(Conditions::CONNECTED));
        self.state = ConnectionState::Connected;
        Transition(State::connected())
    }

    fn link_lost(&mut self, context: &mut DispatchContext) -> Outcome<State> {
        context.push(SupervisorAction::Clear(Conditions::CONNECTED));
        if context.conditions.contains(Conditions::RETRY_IN_PROGRESS) {
            // A retry driver is already running; it decides what happens next.
            self.budget.record_failure();
            context.push(SupervisorAction::Set(Conditions::ATTEMPT_FAILED));
            self.state = ConnectionState::Failed;
            return Transition(State::failed());
        }
        context.push(SupervisorAction::Set(Conditions::RETRY_IN_PROGRESS));
        context.push(SupervisorAction::StartRetryDriver);
        self.state = ConnectionState::Retrying;
        Transition(State::retrying())
    }
}

#[state_machine(initial = "State::idle()")]
impl SupervisorMachine {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &LinkEvent) -> Outcome<State> {
        match *event {
            LinkEvent::StationStarted => {
                context.push(SupervisorAction::RequestConnect);
                self.state = ConnectionState::Connecting;
                Transition(State::connecting())
            }
            LinkEvent::RetryAttempt => Handled,
            LinkEvent::GotAddress(_) => self.address_acquired(context),
            LinkEvent::Disconnected { .. } => self.link_lost(context),
        }
    }

    #[state]
    fn connecting(&mut self, context: &mut DispatchContext, event: &LinkEvent) -> Outcome<State> {
        match *event {
            LinkEvent::StationStarted | LinkEvent::RetryAttempt => Handled,
            LinkEvent::GotAddress(_) => self.address_acquired(context),
            LinkEvent::Disconnected { .. } => self.link_lost(context),
        }
    }

    #[state]
    fn connected(&mut self, context: &mut DispatchContext, event: &LinkEvent) -> Outcome<State> {
        match *event {
            LinkEvent::StationStarted | LinkEvent::RetryAttempt => Handled,
            // Lease renewal or a new address on the same association.
            LinkEvent::GotAddress(_) => self.address_acquired(context),
            LinkEvent::Disconnected { .. } => self.link_lost(context),
        }
    }

    #[state]
    fn retrying(&mut self, context: &mut DispatchContext, event: &LinkEvent) -> Outcome<State> {
        match *event {
            LinkEvent::StationStarted | LinkEvent::RetryAttempt => Handled,
            LinkEvent::GotAddress(_) => self.address_acquired(context),
            LinkEvent::Disconnected { .. } => self.link_lost(context),
        }
    }

    #[state]
    fn failed(&mut self, context: &mut DispatchContext, event: &LinkEvent) -> Outcome<State> {
        match *event {
            LinkEvent::StationStarted => Handled,
            LinkEvent::RetryAttempt => {
                self.state = ConnectionState::Retrying;
                Transition(State::retrying())
            }
            LinkEvent::GotAddress(_) => self.address_acquired(context),
            LinkEvent::Disconnected { .. } => self.link_lost(context),
        }
    }
}
