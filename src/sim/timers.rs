//! Deferred effects keyed by due time
//!
//! Due times are measured on the timer clock, which tracks delivered play
//! time and stands still while the game is paused. Pausing therefore
//! suspends every pending effect instead of merely delaying it.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::PowerupKind;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Deferred {
    /// Clear a timed powerup flag
    ExpirePowerup(PowerupKind),
    /// Drop a random powerup centered on `pos`
    DropPowerup { pos: Vec2 },
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: Duration,
    seq: u64,
    effect: Deferred,
}

#[derive(Debug, Clone, Default)]
pub struct Timers {
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Duration, effect: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled { due, seq, effect });
    }

    /// Schedule `effect`, cancelling any identical effect still pending
    pub fn reschedule(&mut self, due: Duration, effect: Deferred) {
        self.pending.retain(|s| s.effect != effect);
        self.schedule(due, effect);
    }

    /// Remove and return every effect due at or before `now`, earliest first
    pub fn take_due(&mut self, now: Duration) -> Vec<Deferred> {
        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|s| {
            if s.due <= now {
                due.push(s.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|s| (s.due, s.seq));
        due.into_iter().map(|s| s.effect).collect()
    }

    /// Due time of a pending effect
    pub fn due_of(&self, effect: &Deferred) -> Option<Duration> {
        self.pending
            .iter()
            .find(|s| &s.effect == effect)
            .map(|s| s.due)
    }

    pub fn pending_drops(&self) -> usize {
        self.pending
            .iter()
            .filter(|s| matches!(s.effect, Deferred::DropPowerup { .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_take_due_orders_by_time_then_insertion() {
        let mut timers = Timers::new();
        timers.schedule(ms(200), Deferred::DropPowerup { pos: Vec2::X });
        timers.schedule(ms(100), Deferred::ExpirePowerup(PowerupKind::Shield));
        timers.schedule(ms(100), Deferred::ExpirePowerup(PowerupKind::Spread));
        timers.schedule(ms(500), Deferred::ExpirePowerup(PowerupKind::RapidFire));

        let due = timers.take_due(ms(200));
        assert_eq!(
            due,
            vec![
                Deferred::ExpirePowerup(PowerupKind::Shield),
                Deferred::ExpirePowerup(PowerupKind::Spread),
                Deferred::DropPowerup { pos: Vec2::X },
            ]
        );
        assert_eq!(timers.len(), 1);
        assert!(timers.take_due(ms(499)).is_empty());
        assert_eq!(timers.take_due(ms(500)).len(), 1);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_reschedule_replaces_instead_of_stacking() {
        let mut timers = Timers::new();
        let expire = Deferred::ExpirePowerup(PowerupKind::RapidFire);
        timers.reschedule(ms(5000), expire);
        timers.reschedule(ms(8000), expire);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.due_of(&expire), Some(ms(8000)));
        assert!(timers.take_due(ms(5000)).is_empty());
    }

    #[test]
    fn test_pending_drops() {
        let mut timers = Timers::new();
        for i in 0..3 {
            timers.schedule(ms(i * 100), Deferred::DropPowerup { pos: Vec2::ZERO });
        }
        timers.schedule(ms(10), Deferred::ExpirePowerup(PowerupKind::Shield));
        assert_eq!(timers.pending_drops(), 3);
    }
}
