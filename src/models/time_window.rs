//! Time window type for time-constrained tours.

use serde::{Deserialize, Serialize};

/// A time window constraint for service at a customer.
///
/// Arrival may happen as early as `ready` (waiting is allowed) and no later
/// than `due`.
///
/// # Examples
///
/// ```
/// use eax_tsp::models::TimeWindow;
///
/// let tw = TimeWindow::new(100.0, 200.0).unwrap();
/// assert!(tw.contains(150.0));
/// assert!(!tw.contains(250.0));
/// assert_eq!(tw.waiting_time(80.0), 20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    ready: f64,
    due: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `ready > due` or either value is non-finite.
    pub fn new(ready: f64, due: f64) -> Option<Self> {
        if !ready.is_finite() || !due.is_finite() || ready > due {
            return None;
        }
        Some(Self { ready, due })
    }

    /// Earliest allowable arrival time.
    pub fn ready(&self) -> f64 {
        self.ready
    }

    /// Latest allowable arrival time.
    pub fn due(&self) -> f64 {
        self.due
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.ready && time <= self.due
    }

    /// Returns the waiting time if arriving at the given time.
    ///
    /// Zero if the arrival is within or after the window.
    pub fn waiting_time(&self, arrival: f64) -> f64 {
        if arrival < self.ready {
            self.ready - arrival
        } else {
            0.0
        }
    }

    /// Returns `true` if arriving at the given time violates this window.
    pub fn is_violated(&self, arrival: f64) -> bool {
        arrival > self.due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates() {
        assert!(TimeWindow::new(10.0, 5.0).is_none());
        assert!(TimeWindow::new(f64::NAN, 5.0).is_none());
        assert!(TimeWindow::new(0.0, f64::INFINITY).is_none());
        assert!(TimeWindow::new(5.0, 5.0).is_some());
    }

    #[test]
    fn test_contains_and_violation() {
        let tw = TimeWindow::new(10.0, 20.0).unwrap();
        assert!(tw.contains(10.0));
        assert!(tw.contains(20.0));
        assert!(!tw.contains(20.5));
        assert!(tw.is_violated(20.5));
        assert!(!tw.is_violated(15.0));
    }

    #[test]
    fn test_waiting_time() {
        let tw = TimeWindow::new(10.0, 20.0).unwrap();
        assert_eq!(tw.waiting_time(4.0), 6.0);
        assert_eq!(tw.waiting_time(12.0), 0.0);
        assert_eq!(tw.waiting_time(25.0), 0.0);
    }
}
