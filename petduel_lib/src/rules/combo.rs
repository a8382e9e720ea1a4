/// Combo counter of one side. Only the turn flow resets it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ComboState {
    count: u32,
}

impl ComboState {
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Counts one combo starter and returns the new count.
    pub fn register_starter(&mut self) -> u32 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    /// Whether going from `before` to `after` crosses `threshold`.
    pub fn crossed(before: u32, after: u32, threshold: u32) -> bool {
        threshold > 0 && before < threshold && after >= threshold
    }

    /// Whether a card that does not count towards the combo finds `count` at `threshold`.
    pub fn reached(count: u32, threshold: u32) -> bool {
        threshold > 0 && count >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_happens_once() {
        let mut combo = ComboState::default();
        let mut fired = 0;
        for _ in 0..5 {
            let before = combo.count();
            let after = combo.register_starter();
            if ComboState::crossed(before, after, 3) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert_eq!(combo.count(), 5);
    }

    #[test]
    fn zero_threshold_never_fires() {
        assert!(!ComboState::crossed(0, 1, 0));
        assert!(!ComboState::reached(4, 0));
    }

    #[test]
    fn finishers_fire_at_or_above_the_threshold() {
        assert!(!ComboState::reached(1, 2));
        assert!(ComboState::reached(2, 2));
        assert!(ComboState::reached(5, 2));
    }
}
