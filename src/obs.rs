//! Optional observability helpers for edge flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `idp_edge.flow` with the `flow` and `stage`
//!   fields, plus `severity = "critical"` error events for every server-class failure.
//! - Enable `metrics` to increment the `idp_edge_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`, and the `idp_edge_critical_total`
//!   counter labeled by `endpoint`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Flow kinds observed by the edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Two-phase authorization code issuance.
	Authorization,
	/// Authorization code to access token exchange.
	Token,
	/// Access token introspection.
	Introspection,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Authorization => "authorization",
			FlowKind::Token => "token",
			FlowKind::Introspection => "introspection",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to an orchestrator.
	Attempt,
	/// Successful completion.
	Success,
	/// Caller-correctable failure.
	ClientFailure,
	/// Infrastructure fault or authority contract break.
	ServerFailure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::ClientFailure => "client_failure",
			FlowOutcome::ServerFailure => "server_failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Per-invocation orchestration state.
///
/// `Started → AwaitingPhase1 → (AwaitingPhase2 →) Succeeded | FailedClient | FailedServer`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowState {
	/// Invocation accepted, nothing sent yet.
	Started,
	/// First authority call in flight.
	AwaitingPhase1,
	/// Second authority call in flight.
	AwaitingPhase2,
	/// Entity produced.
	Succeeded,
	/// Finished with a client-class error.
	FailedClient,
	/// Finished with a server-class error.
	FailedServer,
}
impl FlowState {
	/// Returns `true` once no further transition is allowed.
	pub const fn is_terminal(self) -> bool {
		matches!(self, FlowState::Succeeded | FlowState::FailedClient | FlowState::FailedServer)
	}

	/// Returns a stable label suitable for span or log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowState::Started => "started",
			FlowState::AwaitingPhase1 => "awaiting_phase1",
			FlowState::AwaitingPhase2 => "awaiting_phase2",
			FlowState::Succeeded => "succeeded",
			FlowState::FailedClient => "failed_client",
			FlowState::FailedServer => "failed_server",
		}
	}
}
impl Display for FlowState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Raises a critical alert: an error event with the raw upstream detail plus a counter bump.
pub fn alert_critical(source: &'static str, message: &str, raw: &dyn Display) {
	emit_critical(source, message, raw);
	record_critical(source);
}

/// Tracks one invocation through [`FlowState`] and reports its outcome.
#[derive(Debug)]
pub struct FlowTracker {
	kind: FlowKind,
	state: FlowState,
}
impl FlowTracker {
	/// Starts tracking and records the attempt.
	pub fn start(kind: FlowKind) -> Self {
		record_flow_outcome(kind, FlowOutcome::Attempt);

		Self { kind, state: FlowState::Started }
	}

	/// Current state.
	pub fn state(&self) -> FlowState {
		self.state
	}

	/// Moves to `next`; returns `false` and leaves the state untouched once terminal.
	pub fn advance(&mut self, next: FlowState) -> bool {
		if self.state.is_terminal() {
			record_ignored_transition(self.kind, self.state, next);

			return false;
		}

		record_transition(self.kind, self.state, next);

		self.state = next;

		true
	}

	/// Settles the terminal state from `result` and records the matching outcome once.
	pub fn finish<T>(&mut self, result: &Result<T>) -> FlowState {
		let (state, outcome) = match result {
			Ok(_) => (FlowState::Succeeded, FlowOutcome::Success),
			Err(e) if e.is_client_error() => (FlowState::FailedClient, FlowOutcome::ClientFailure),
			Err(_) => (FlowState::FailedServer, FlowOutcome::ServerFailure),
		};

		if self.advance(state) {
			record_flow_outcome(self.kind, outcome);
		}

		self.state
	}
}
