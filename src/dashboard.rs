//! Dashboard state and action dispatch
//!
//! Owns everything a page session shares: the backend handle, the connection
//! flag, the toast queue and the tab controller. The web server and the tests
//! drive it through [`Dashboard::run`].

use crate::backend::Backend;
use crate::connectivity::{
    ConnectionState, ConnectivityMonitor, MonitorHandle, StatusIndicator, DEFAULT_POLL_INTERVAL,
};
use crate::error::Result;
use crate::tabs::{Activation, TabController};
use crate::toast::{Toast, ToastQueue};
use crate::view::{self, Context, Rendered};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// One user action, i.e. one renderer invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Investigate { person: String, crime: String },
    QuickTest { person: String, crime: String },
    Persons,
    PersonEvidence { person: String },
    CrimeEvidence { crime: String },
    FinalSolution,
}

impl Action {
    /// Map a `/ui/<name>` route and its selections to an action.
    ///
    /// `evidence` is per person when a `person` parameter is present (even
    /// empty, so the missing-selection message shows), per crime otherwise.
    pub fn from_route(name: &str, person: Option<String>, crime: Option<String>) -> Option<Self> {
        let person_or_empty = || person.clone().unwrap_or_default();
        let crime_or_empty = || crime.clone().unwrap_or_default();
        let action = match name {
            "investigate" => Action::Investigate { person: person_or_empty(), crime: crime_or_empty() },
            "quick-test" => Action::QuickTest { person: person_or_empty(), crime: crime_or_empty() },
            "persons" => Action::Persons,
            "evidence" => match person {
                Some(ref p) => Action::PersonEvidence { person: p.clone() },
                None => Action::CrimeEvidence { crime: crime_or_empty() },
            },
            "solution" => Action::FinalSolution,
            _ => return None,
        };
        Some(action)
    }
}

pub struct Dashboard {
    backend: Arc<dyn Backend>,
    connection: ConnectionState,
    toasts: ToastQueue,
    tabs: TabController,
    poll_interval: Duration,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            connection: ConnectionState::new(),
            toasts: ToastQueue::new(),
            tabs: TabController::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn tabs(&self) -> &TabController {
        &self.tabs
    }

    pub fn status(&self) -> StatusIndicator {
        StatusIndicator::for_state(self.connection.is_connected())
    }

    pub fn monitor(&self) -> ConnectivityMonitor {
        ConnectivityMonitor::new(
            Arc::clone(&self.backend),
            self.connection.clone(),
            self.toasts.clone(),
        )
        .with_interval(self.poll_interval)
    }

    /// Greet, then start polling the backend (first check runs immediately).
    pub fn bootstrap(&self) -> MonitorHandle {
        self.toasts.push(Toast::success("Interface d'enquête initialisée"));
        info!(interval = ?self.poll_interval, "starting connectivity monitor");
        self.monitor().spawn()
    }

    /// Run one action; its toast is queued and the fragment returned.
    pub fn run(&self, action: &Action) -> Rendered {
        let ctx = Context::new(self.backend.as_ref(), &self.connection);
        let rendered = match action {
            Action::Investigate { person, crime } => Rendered::from_outcome(
                &view::investigation::INVESTIGATION,
                &view::investigation::investigate(&ctx, person, crime),
            ),
            Action::QuickTest { person, crime } => Rendered::from_outcome(
                &view::investigation::QUICK_TEST,
                &view::investigation::quick_test(&ctx, person, crime),
            ),
            Action::Persons => Rendered::from_outcome(
                &view::persons::PERSONS,
                &view::persons::load_persons(&ctx),
            ),
            Action::PersonEvidence { person } => Rendered::from_outcome(
                &view::evidence::PERSON_EVIDENCE,
                &view::evidence::load_person_evidence(&ctx, person),
            ),
            Action::CrimeEvidence { crime } => Rendered::from_outcome(
                &view::evidence::CRIME_EVIDENCE,
                &view::evidence::load_crime_evidence(&ctx, crime),
            ),
            Action::FinalSolution => Rendered::from_outcome(
                &view::solution::FINAL_SOLUTION,
                &view::solution::reveal_final_solution(&ctx),
            ),
        };
        if let Some(toast) = &rendered.toast {
            self.toasts.push(toast.clone());
        }
        rendered
    }

    pub fn activate_tab(&mut self, name: &str, card_count: usize) -> Result<Activation> {
        let activation = self.tabs.activate(name, card_count)?;
        info!(tab = activation.tab, previous = activation.previous, "tab activated");
        Ok(activation)
    }
}
