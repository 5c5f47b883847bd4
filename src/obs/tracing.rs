// self
use crate::{_prelude::*, obs::SearchOutcome};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedSearch<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedSearch<F> = F;

/// Span wrapped around a single provider search.
///
/// Opened with `service` and `stage`; `outcome` and `records` stay empty until
/// [`finish`](Self::finish) fills them in.
#[derive(Clone, Debug)]
pub struct SearchSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl SearchSpan {
	/// Opens a span for `service` at `stage`.
	pub fn new(service: &'static str, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"address_autocomplete.search",
				service,
				stage,
				outcome = tracing::field::Empty,
				records = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (service, stage);

			Self {}
		}
	}

	/// Instruments the search future without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedSearch<Fut>
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

	/// Records how the search ended and, on success, how many records it produced.
	pub fn finish(&self, outcome: SearchOutcome, records: Option<usize>) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", outcome.as_str());

			if let Some(records) = records {
				self.span.record("records", records);
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (outcome, records);
		}
	}
}
