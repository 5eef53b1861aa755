/// Navigation gate: rejects navigation while a snap is settling in
use tracing::debug;

use crate::snap::SnapConfig;

/// Fire-once deadline standing in for a scheduled timeout
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LockoutTimer {
    deadline_ms: Option<f64>,
}

impl LockoutTimer {
    pub fn schedule(&mut self, deadline_ms: f64) {
        self.deadline_ms = Some(deadline_ms);
    }

    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn deadline_ms(&self) -> Option<f64> {
        self.deadline_ms
    }

    /// True exactly once, on the first poll at or after the deadline
    pub fn fire_if_due(&mut self, now_ms: f64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Open,
    Locked,
    /// Torn down; every request is rejected from here on
    Closed,
}

#[derive(Debug, Clone)]
pub struct NavigationGate {
    state: GateState,
    lockout_ms: f64,
    timer: LockoutTimer,
}

impl NavigationGate {
    pub fn new(lockout_ms: f64) -> Self {
        Self {
            state: GateState::Open,
            lockout_ms,
            timer: LockoutTimer::default(),
        }
    }

    /// Lock for as long as a full snap, settle delay included
    pub fn from_config(config: &SnapConfig) -> Self {
        Self::new(config.lockout_ms())
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn lockout_ms(&self) -> f64 {
        self.lockout_ms
    }

    pub fn timer(&self) -> &LockoutTimer {
        &self.timer
    }

    pub fn is_locked(&self) -> bool {
        self.state != GateState::Open
    }

    /// Run the scheduled clear if it is due
    pub fn poll(&mut self, now_ms: f64) {
        if self.timer.fire_if_due(now_ms) && self.state == GateState::Locked {
            self.state = GateState::Open;
            debug!(now_ms, "navigation gate reopened");
        }
    }

    /// Take the gate for one navigation, scheduling its release
    pub fn try_acquire(&mut self, now_ms: f64) -> bool {
        self.poll(now_ms);
        if self.state != GateState::Open {
            return false;
        }

        self.state = GateState::Locked;
        self.timer.schedule(now_ms + self.lockout_ms);
        debug!(now_ms, lockout_ms = self.lockout_ms, "navigation gate locked");
        true
    }

    /// Cancel any pending release and refuse further navigation
    pub fn close(&mut self) {
        self.timer.cancel();
        self.state = GateState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_once() {
        let mut timer = LockoutTimer::default();
        timer.schedule(100.0);
        assert!(!timer.fire_if_due(99.0));
        assert!(timer.fire_if_due(100.0));
        assert!(!timer.fire_if_due(200.0));
        assert!(!timer.is_pending());
    }

    #[test]
    fn test_second_request_inside_lockout_rejected() {
        let mut gate = NavigationGate::new(525.0);
        assert!(gate.try_acquire(1000.0));
        assert!(!gate.try_acquire(1000.5));
        assert!(!gate.try_acquire(1524.9));
        assert!(gate.try_acquire(1525.0));
    }

    #[test]
    fn test_lockout_derived_from_snap_config() {
        let config = SnapConfig {
            duration_ms: 400.0,
            settle_delay_ms: 40.0,
        };
        assert_eq!(NavigationGate::from_config(&config).lockout_ms(), 440.0);
    }

    #[test]
    fn test_close_cancels_pending_release() {
        let mut gate = NavigationGate::new(500.0);
        gate.try_acquire(0.0);
        gate.close();

        assert!(!gate.timer().is_pending());
        gate.poll(10_000.0);
        assert_eq!(gate.state(), GateState::Closed);
        assert!(!gate.try_acquire(10_000.0));
    }
}
