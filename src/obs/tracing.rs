// self
use crate::{
	_prelude::*,
	obs::{FlowKind, FlowState},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by edge flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("idp_edge.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a critical-severity error event for a server-class failure.
///
/// `raw` is the upstream body or error as received; callers pass redacted values only.
pub fn emit_critical(source: &str, message: &str, raw: &dyn Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::error!(severity = "critical", source, raw = %raw, "{message}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (source, message, raw);
	}
}

pub(crate) fn record_transition(kind: FlowKind, from: FlowState, to: FlowState) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(flow = kind.as_str(), from = from.as_str(), to = to.as_str(), "Flow advanced.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, from, to);
	}
}

pub(crate) fn record_ignored_transition(kind: FlowKind, state: FlowState, next: FlowState) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			flow = kind.as_str(),
			state = state.as_str(),
			next = next.as_str(),
			"Ignored transition out of a terminal state."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, state, next);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn critical_events_compile_without_subscribers() {
		emit_critical("token_issue", "Authority answered without an action.", &"{}");
	}

	#[cfg(feature = "tracing")]
	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = FlowSpan::new(FlowKind::Token, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[cfg(feature = "tracing")]
	#[tracing_test::traced_test]
	#[test]
	fn critical_events_carry_the_severity_field() {
		emit_critical("code_issue", "Contract break.", &"{\"action\":\"FORM\"}");

		assert!(logs_contain("severity=\"critical\""));
		assert!(logs_contain("FORM"));
	}
}
