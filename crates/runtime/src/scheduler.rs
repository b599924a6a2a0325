use tracing::debug;

/// Handle for one "next paint" callback requested from the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(pub u64);

/// Host capability for deferring work to the next paint opportunity.
///
/// In a browser this is `requestAnimationFrame`/`cancelAnimationFrame`.
pub trait FrameRequester {
    fn request_frame(&mut self) -> FrameToken;
    fn cancel_frame(&mut self, token: FrameToken);
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ScheduleStats {
    pub requested: u64,
    pub cancelled: u64,
    pub fired: u64,
    /// Frames that fired for a token no longer held by the slot.
    pub stale: u64,
}

/// Single-slot deferred task register.
///
/// Scheduling cancels whatever is pending before installing the new task, so
/// at most one task is ever pending and a burst of requests collapses into the
/// last one.
#[derive(Debug)]
pub struct CoalescingScheduler<T> {
    pending: Option<(FrameToken, T)>,
    stats: ScheduleStats,
}

impl<T> Default for CoalescingScheduler<T> {
    fn default() -> Self {
        Self {
            pending: None,
            stats: ScheduleStats::default(),
        }
    }
}

impl<T> CoalescingScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<R>(&mut self, requester: &mut R, task: T) -> FrameToken
    where
        R: FrameRequester + ?Sized,
    {
        if let Some((old, _)) = self.pending.take() {
            requester.cancel_frame(old);
            self.stats.cancelled += 1;
            debug!(token = old.0, "cancelled pending frame task");
        }
        let token = requester.request_frame();
        self.pending = Some((token, task));
        self.stats.requested += 1;
        token
    }

    /// Claim the pending task when its frame arrives.
    ///
    /// Returns `None` for a token that was replaced or already fired.
    pub fn fire(&mut self, token: FrameToken) -> Option<T> {
        match &self.pending {
            Some((pending, _)) if *pending == token => {
                self.stats.fired += 1;
                self.pending.take().map(|(_, task)| task)
            }
            _ => {
                self.stats.stale += 1;
                None
            }
        }
    }

    /// Drop the pending task, if any, and cancel its frame.
    pub fn cancel<R>(&mut self, requester: &mut R) -> Option<T>
    where
        R: FrameRequester + ?Sized,
    {
        let (token, task) = self.pending.take()?;
        requester.cancel_frame(token);
        self.stats.cancelled += 1;
        Some(task)
    }

    pub fn pending_token(&self) -> Option<FrameToken> {
        self.pending.as_ref().map(|(token, _)| *token)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn stats(&self) -> ScheduleStats {
        self.stats
    }
}

/// Frame requester for hosts without a paint loop (CLI, tests).
///
/// Tokens are handed out in increasing order; `drain` yields the requests that
/// are still outstanding, oldest first, as a paint loop would deliver them.
#[derive(Debug, Default)]
pub struct ManualFrames {
    next: u64,
    outstanding: Vec<FrameToken>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outstanding(&self) -> &[FrameToken] {
        &self.outstanding
    }

    pub fn drain(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.outstanding)
    }
}

impl FrameRequester for ManualFrames {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next);
        self.next = self.next.wrapping_add(1);
        self.outstanding.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.outstanding.retain(|t| *t != token);
    }
}

#[cfg(test)]
mod tests {
    use super::{CoalescingScheduler, FrameToken, ManualFrames};

    #[test]
    fn burst_collapses_to_last_task() {
        let mut frames = ManualFrames::new();
        let mut sched = CoalescingScheduler::new();
        for i in 0..5 {
            sched.schedule(&mut frames, i);
        }

        let tokens = frames.drain();
        assert_eq!(tokens.len(), 1);
        assert_eq!(sched.fire(tokens[0]), Some(4));
        assert!(!sched.is_pending());

        let stats = sched.stats();
        assert_eq!(stats.requested, 5);
        assert_eq!(stats.cancelled, 4);
        assert_eq!(stats.fired, 1);
    }

    #[test]
    fn stale_token_is_ignored() {
        let mut frames = ManualFrames::new();
        let mut sched = CoalescingScheduler::new();
        let old = sched.schedule(&mut frames, "old");
        let new = sched.schedule(&mut frames, "new");

        assert_eq!(sched.fire(old), None);
        assert_eq!(sched.pending_token(), Some(new));
        assert_eq!(sched.fire(new), Some("new"));
        assert_eq!(sched.fire(new), None);
        assert_eq!(sched.stats().stale, 2);
    }

    #[test]
    fn cancel_releases_frame() {
        let mut frames = ManualFrames::new();
        let mut sched = CoalescingScheduler::new();
        sched.schedule(&mut frames, ());
        assert_eq!(frames.outstanding(), &[FrameToken(0)]);
        assert_eq!(sched.cancel(&mut frames), Some(()));
        assert!(frames.outstanding().is_empty());
        assert_eq!(sched.cancel(&mut frames), None);
    }
}
