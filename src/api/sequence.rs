use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out increasing tickets so only the newest in-flight request may
/// publish its result.
#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
	latest: Arc<AtomicU64>,
}

/// Issued by [`RequestSequence::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl RequestSequence {
	/// Sequence with no request started.
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts a request, superseding every earlier ticket.
	pub fn begin(&self) -> Ticket {
		Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
	}

	/// Whether no newer request began after `ticket`.
	pub fn is_current(&self, ticket: Ticket) -> bool {
		self.latest.load(Ordering::SeqCst) == ticket.0
	}
}
