/// Coalesces render requests into at most one outstanding frame.
///
/// Any number of `request`s between two frames leave one frame pending;
/// `begin_frame` is called from the display-refresh callback and answers
/// whether to draw. Once cancelled, nothing is scheduled or drawn again.
#[derive(Clone, Debug, Default)]
pub struct FrameScheduler {
	pending: bool,
	cancelled: bool,
}

impl FrameScheduler {
	/// A scheduler with nothing pending.
	pub fn new() -> Self {
		Self::default()
	}

	/// Marks a frame as wanted. Ignored after [`FrameScheduler::cancel`].
	pub fn request(&mut self) {
		self.pending |= !self.cancelled;
	}

	/// Consumes the pending frame. Returns `true` if it should be drawn.
	pub fn begin_frame(&mut self) -> bool {
		std::mem::replace(&mut self.pending, false) && !self.cancelled
	}

	/// Whether a frame was requested and not yet begun.
	pub fn is_pending(&self) -> bool {
		self.pending
	}

	/// Drops the pending frame and every later request.
	pub fn cancel(&mut self) {
		self.cancelled = true;
		self.pending = false;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn requests_within_one_frame_coalesce() {
		let mut frames = FrameScheduler::new();

		frames.request();
		frames.request();
		frames.request();
		assert!(frames.is_pending());
		assert!(frames.begin_frame());
		assert!(!frames.begin_frame());
	}

	#[test]
	fn next_request_after_draw_schedules_again() {
		let mut frames = FrameScheduler::new();
		frames.request();
		frames.begin_frame();
		assert!(!frames.is_pending());

		frames.request();
		assert!(frames.is_pending());
		assert!(frames.begin_frame());
	}

	#[test]
	fn cancelled_scheduler_never_draws() {
		let mut frames = FrameScheduler::new();
		frames.request();
		frames.cancel();

		assert!(!frames.begin_frame());
		frames.request();
		assert!(!frames.is_pending());
		assert!(!frames.begin_frame());
	}
}
