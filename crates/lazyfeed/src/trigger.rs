//! Sentinel visibility trigger.
//!
//! [`VisibilityTrigger`] models the observer watching the sentinel node:
//! the one platform resource a loader owns that needs explicit release.
//! The host feeds it visibility ratios; the trigger decides whether they
//! cross the configured threshold. Once disconnected it never fires again.

/// The visibility observer armed on a loader's sentinel.
#[derive(Clone, Debug)]
pub struct VisibilityTrigger {
    threshold: f64,
    lead_rows: u32,
    connected: bool,
}

impl VisibilityTrigger {
    /// Create a disconnected trigger.
    ///
    /// `threshold` is the sentinel visibility fraction that fires the
    /// trigger, clamped to `0.0..=1.0`. `lead_rows` is the advisory lead
    /// distance the host should configure its observer with, in rows
    /// ahead of the visible edge.
    pub fn new(threshold: f64, lead_rows: u32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            lead_rows,
            connected: false,
        }
    }

    /// Arm the trigger. Idempotent.
    pub fn connect(&mut self) {
        self.connected = true;
    }

    /// Release the trigger. Idempotent; a disconnected trigger ignores all
    /// visibility events.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Whether the trigger is armed.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// The configured visibility threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The advisory observer lead distance, in rows.
    pub fn lead_rows(&self) -> u32 {
        self.lead_rows
    }

    /// Whether a visibility event with the given ratio should fire.
    pub fn should_fire(&self, visible_ratio: f64) -> bool {
        self.connected && visible_ratio >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_never_fires() {
        let trigger = VisibilityTrigger::new(0.1, 10);
        assert!(!trigger.should_fire(1.0));
    }

    #[test]
    fn test_fires_at_threshold() {
        let mut trigger = VisibilityTrigger::new(0.5, 0);
        trigger.connect();
        assert!(!trigger.should_fire(0.49));
        assert!(trigger.should_fire(0.5));
        assert!(trigger.should_fire(1.0));
    }

    #[test]
    fn test_disconnect_idempotent() {
        let mut trigger = VisibilityTrigger::new(0.1, 10);
        trigger.connect();
        trigger.disconnect();
        trigger.disconnect();
        assert!(!trigger.is_connected());
        assert!(!trigger.should_fire(1.0));
    }

    #[test]
    fn test_threshold_clamped() {
        let trigger = VisibilityTrigger::new(3.0, 0);
        assert_eq!(trigger.threshold(), 1.0);
    }
}
