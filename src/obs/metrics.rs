// self
use crate::obs::{FlowKind, FlowOutcome};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"idp_edge_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Counts one critical alert raised for `source` (an endpoint or store label).
pub fn record_critical(source: &'static str) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("idp_edge_critical_total", "endpoint" => source).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = source;
	}
}
