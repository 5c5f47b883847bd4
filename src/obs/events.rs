//! Structured event sink injected into providers, the auth gate, and the gateway.
//!
//! Components never reach for a global logger. They hold an [`Arc<dyn EventSink>`] handed
//! to them at construction and emit [`LogEvent`]s that keep the same field contract
//! everywhere: `level`, `message`, `service`, `provider`, `code`, `stack`, plus ordered
//! context fields such as `address` or `middleware`.

// std
use std::backtrace::{Backtrace, BacktraceStatus};
// self
use crate::{_prelude::*, error::ExternalError, provider::ProviderId};

/// Shared handle to an event sink.
pub type SharedSink = Arc<dyn EventSink>;

/// Destination for structured log events.
pub trait EventSink
where
	Self: Send + Sync,
{
	/// Records a single event.
	fn emit(&self, event: LogEvent);
}

/// Severity of a [`LogEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventLevel {
	/// Expected rejections and routing misses.
	Info,
	/// Recoverable oddities.
	Warn,
	/// Failures that lost data or aborted a request.
	Error,
}
impl EventLevel {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			EventLevel::Info => "info",
			EventLevel::Warn => "warn",
			EventLevel::Error => "error",
		}
	}
}
impl Display for EventLevel {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Structured log record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEvent {
	/// Severity.
	pub level: EventLevel,
	/// Human-readable message.
	pub message: String,
	/// Emitting provider implementation, if any.
	pub service: Option<&'static str>,
	/// Backing provider involved in the failure, if any.
	pub provider: Option<ProviderId>,
	/// Provider HTTP status or business code, if any.
	pub code: Option<u32>,
	/// Captured backtrace for error-level events when backtraces are enabled.
	pub stack: Option<String>,
	/// Additional context fields in insertion order.
	pub context: Vec<(&'static str, String)>,
}
impl LogEvent {
	/// Creates an event without any optional fields.
	pub fn new(level: EventLevel, message: impl Into<String>) -> Self {
		Self {
			level,
			message: message.into(),
			service: None,
			provider: None,
			code: None,
			stack: None,
			context: Vec::new(),
		}
	}

	/// Info-level event.
	pub fn info(message: impl Into<String>) -> Self {
		Self::new(EventLevel::Info, message)
	}

	/// Warn-level event.
	pub fn warn(message: impl Into<String>) -> Self {
		Self::new(EventLevel::Warn, message)
	}

	/// Error-level event; captures a backtrace into `stack` when one is available.
	pub fn error(message: impl Into<String>) -> Self {
		let mut event = Self::new(EventLevel::Error, message);

		event.stack = capture_stack();

		event
	}

	/// Attaches a backtrace regardless of `RUST_BACKTRACE`.
	pub fn force_stack(mut self) -> Self {
		self.stack = Some(Backtrace::force_capture().to_string());

		self
	}

	/// Tags the emitting provider implementation.
	pub fn service(mut self, service: &'static str) -> Self {
		self.service = Some(service);

		self
	}

	/// Copies `provider` and `code` from an external failure.
	pub fn external(mut self, err: &ExternalError) -> Self {
		self.provider = Some(err.provider);
		self.code = Some(err.code);

		self
	}

	/// Appends a context field.
	pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
		self.context.push((key, value.into()));

		self
	}

	/// Returns the first context value recorded under `key`.
	pub fn context(&self, key: &str) -> Option<&str> {
		self.context.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
	}
}

/// Forwards events to `tracing` when the feature is enabled; drops them otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;
impl EventSink for TracingSink {
	fn emit(&self, event: LogEvent) {
		#[cfg(feature = "tracing")]
		{
			let provider = event.provider.map(ProviderId::as_str);
			let context = ContextFields(&event.context);

			macro_rules! forward {
				($level:expr) => {
					tracing::event!(
						target: "address_autocomplete",
						$level,
						service = event.service,
						provider,
						code = event.code,
						stack = event.stack.as_deref(),
						context = %context,
						"{}",
						event.message
					)
				};
			}

			match event.level {
				EventLevel::Info => forward!(tracing::Level::INFO),
				EventLevel::Warn => forward!(tracing::Level::WARN),
				EventLevel::Error => forward!(tracing::Level::ERROR),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = event;
		}
	}
}

/// Sink that keeps every event in memory, for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemorySink(Arc<Mutex<Vec<LogEvent>>>);
impl MemorySink {
	/// Returns a snapshot of every recorded event.
	pub fn events(&self) -> Vec<LogEvent> {
		self.0.lock().clone()
	}

	/// Returns a snapshot of error-level events.
	pub fn errors(&self) -> Vec<LogEvent> {
		self.0.lock().iter().filter(|e| e.level == EventLevel::Error).cloned().collect()
	}
}
impl EventSink for MemorySink {
	fn emit(&self, event: LogEvent) {
		self.0.lock().push(event);
	}
}

#[cfg(feature = "tracing")]
struct ContextFields<'a>(&'a [(&'static str, String)]);
#[cfg(feature = "tracing")]
impl Display for ContextFields<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		for (idx, (key, value)) in self.0.iter().enumerate() {
			if idx > 0 {
				f.write_str(" ")?;
			}

			write!(f, "{key}={value:?}")?;
		}

		Ok(())
	}
}

fn capture_stack() -> Option<String> {
	let backtrace = Backtrace::capture();

	match backtrace.status() {
		BacktraceStatus::Captured => Some(backtrace.to_string()),
		_ => None,
	}
}
