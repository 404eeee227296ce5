//! Simulation-time expiry for temporary modifiers.
//!
//! The manager never touches stats itself: [`TimedModifierManager::advance`]
//! only reports which modifiers ran out, and the owning
//! [`crate::StatCollection`] removes them. Stat values therefore never depend on
//! the clock.

/// One scheduled removal.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledExpiry {
    pub stat_id: String,
    pub modifier_id: String,
    /// Simulation time (seconds) at which the modifier is removed.
    pub expires_at: f64,
}

/// Clock plus pending expiries.
#[derive(Clone, Debug, Default)]
pub struct TimedModifierManager {
    elapsed: f64,
    scheduled: Vec<ScheduledExpiry>,
}

impl TimedModifierManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds of simulation time advanced so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Schedules removal of `modifier_id` on `stat_id` after `duration` seconds.
    ///
    /// Scheduling the same modifier again replaces its previous expiry.
    pub fn schedule(&mut self, stat_id: &str, modifier_id: &str, duration: f64) {
        self.cancel(stat_id, modifier_id);
        let expires_at = self.elapsed + duration.max(0.0);
        tracing::trace!(
            "Modifier `{}` on `{}` expires at t={:.3}",
            modifier_id,
            stat_id,
            expires_at
        );
        self.scheduled.push(ScheduledExpiry {
            stat_id: stat_id.to_string(),
            modifier_id: modifier_id.to_string(),
            expires_at,
        });
    }

    /// Drops the pending expiry for one modifier, if any.
    pub fn cancel(&mut self, stat_id: &str, modifier_id: &str) -> bool {
        let before = self.scheduled.len();
        self.scheduled
            .retain(|entry| !(entry.stat_id == stat_id && entry.modifier_id == modifier_id));
        self.scheduled.len() != before
    }

    /// Drops every pending expiry on `stat_id`.
    pub fn cancel_stat(&mut self, stat_id: &str) {
        self.scheduled.retain(|entry| entry.stat_id != stat_id);
    }

    /// Seconds left before `modifier_id` on `stat_id` expires.
    pub fn remaining(&self, stat_id: &str, modifier_id: &str) -> Option<f64> {
        self.scheduled
            .iter()
            .find(|entry| entry.stat_id == stat_id && entry.modifier_id == modifier_id)
            .map(|entry| (entry.expires_at - self.elapsed).max(0.0))
    }

    /// Pending expiries in scheduling order.
    pub fn scheduled(&self) -> &[ScheduledExpiry] {
        &self.scheduled
    }

    pub fn len(&self) -> usize {
        self.scheduled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty()
    }

    /// Advances the clock by `delta` seconds and returns every expiry that is
    /// now due, earliest first.
    pub fn advance(&mut self, delta: f64) -> Vec<ScheduledExpiry> {
        if delta.is_nan() || delta < 0.0 {
            tracing::warn!("Ignoring invalid time step {}", delta);
        } else {
            self.elapsed += delta;
        }

        let now = self.elapsed;
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .scheduled
            .drain(..)
            .partition(|entry| entry.expires_at <= now);
        self.scheduled = pending;

        due.sort_by(|a, b| a.expires_at.total_cmp(&b.expires_at));
        due
    }

    pub fn clear(&mut self) {
        self.scheduled.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_returns_due_entries_in_expiry_order() {
        let mut timers = TimedModifierManager::new();
        timers.schedule("damage", "long", 5.0);
        timers.schedule("damage", "short", 1.0);
        timers.schedule("armor", "medium", 2.0);

        assert!(timers.advance(0.5).is_empty());

        let due = timers.advance(2.0);
        let ids: Vec<_> = due.iter().map(|entry| entry.modifier_id.as_str()).collect();
        assert_eq!(ids, vec!["short", "medium"]);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.elapsed(), 2.5);
        assert_eq!(timers.remaining("damage", "long"), Some(2.5));
    }

    #[test]
    fn expiry_is_inclusive_of_the_duration() {
        let mut timers = TimedModifierManager::new();
        timers.schedule("speed", "haste", 2.0);
        assert_eq!(timers.advance(2.0).len(), 1);
        assert!(timers.is_empty());
    }

    #[test]
    fn rescheduling_replaces_the_previous_expiry() {
        let mut timers = TimedModifierManager::new();
        timers.schedule("speed", "haste", 1.0);
        timers.advance(0.5);
        timers.schedule("speed", "haste", 1.0);

        assert_eq!(timers.len(), 1);
        assert!(timers.advance(0.75).is_empty());
        assert_eq!(timers.advance(0.25).len(), 1);
    }

    #[test]
    fn cancel_and_negative_steps() {
        let mut timers = TimedModifierManager::new();
        timers.schedule("speed", "haste", 1.0);
        timers.schedule("speed", "slow", 1.0);
        timers.schedule("armor", "shield", 1.0);

        assert!(timers.cancel("speed", "haste"));
        assert!(!timers.cancel("speed", "haste"));
        timers.cancel_stat("armor");
        assert_eq!(timers.len(), 1);

        assert!(timers.advance(-3.0).is_empty());
        assert_eq!(timers.elapsed(), 0.0);
        assert_eq!(timers.remaining("speed", "slow"), Some(1.0));
    }

    #[test]
    fn remaining_distinguishes_stats_sharing_a_modifier_id() {
        let mut timers = TimedModifierManager::new();
        timers.schedule("damage", "buff", 1.0);
        timers.schedule("armor", "buff", 3.0);

        assert_eq!(timers.remaining("damage", "buff"), Some(1.0));
        assert_eq!(timers.remaining("armor", "buff"), Some(3.0));
        assert_eq!(timers.remaining("speed", "buff"), None);
    }
}
