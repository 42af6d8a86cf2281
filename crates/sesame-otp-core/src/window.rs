//! Verification window for absorbing clock drift and network delay.

/// An ordered set of adjacent time steps (or counters) accepted during
/// verification.
///
/// The candidate ordering is the tie-break contract: the exact step first,
/// then steps further in the past, then the future. A fresh call with the
/// same initial step always reproduces the same sequence.
///
/// This type is pure windowing math; it owns no transport or other I/O.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerificationWindow {
    previous: u32,
    future: u32,
}

impl VerificationWindow {
    /// The window recommended in RFC 6238 §5.2 to accommodate network
    /// delay: one step in each direction.
    pub const RFC_NETWORK_DELAY: Self = Self {
        previous: 1,
        future: 1,
    };

    /// Create a window accepting `previous` steps back and `future` steps
    /// ahead of the initial step.
    #[must_use]
    pub const fn new(previous: u32, future: u32) -> Self {
        Self { previous, future }
    }

    /// All candidate steps for `initial_step`, in verification order:
    /// the initial step, then `initial_step − 1 ..= initial_step − previous`
    /// (stopping before a candidate would go negative), then
    /// `initial_step + 1 ..= initial_step + future`.
    pub fn candidates(&self, initial_step: u64) -> impl Iterator<Item = u64> {
        let past = (1..=u64::from(self.previous))
            .map_while(move |back| initial_step.checked_sub(back));
        let ahead = (1..=u64::from(self.future))
            .map_while(move |fwd| initial_step.checked_add(fwd));
        std::iter::once(initial_step).chain(past).chain(ahead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_yields_only_initial_step() {
        let window = VerificationWindow::default();
        let steps: Vec<u64> = window.candidates(100).collect();
        assert_eq!(steps, vec![100]);
    }

    #[test]
    fn rfc_delay_window_order() {
        let steps: Vec<u64> = VerificationWindow::RFC_NETWORK_DELAY
            .candidates(100)
            .collect();
        assert_eq!(steps, vec![100, 99, 101]);
    }

    #[test]
    fn past_stops_before_negative() {
        let steps: Vec<u64> = VerificationWindow::new(3, 0).candidates(2).collect();
        assert_eq!(steps, vec![2, 1, 0]);
    }

    #[test]
    fn past_at_step_zero() {
        let steps: Vec<u64> = VerificationWindow::new(2, 1).candidates(0).collect();
        assert_eq!(steps, vec![0, 1]);
    }

    #[test]
    fn wide_window_full_order() {
        let steps: Vec<u64> = VerificationWindow::new(2, 3).candidates(10).collect();
        assert_eq!(steps, vec![10, 9, 8, 11, 12, 13]);
    }

    #[test]
    fn sequence_is_restartable() {
        let window = VerificationWindow::new(1, 1);
        let first: Vec<u64> = window.candidates(42).collect();
        let second: Vec<u64> = window.candidates(42).collect();
        assert_eq!(first, second);
    }
}
