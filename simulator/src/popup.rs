//! Popup state with time-based expiration.

use std::time::Instant;

use crate::timing::POPUP_DURATION;

/// Active popup with the `Instant` it was triggered.
#[derive(Clone, Copy, Debug)]
pub enum Popup {
    /// "AVIONICS ON/OFF".
    Power(Instant),
    /// "CDI: NAV1/NAV2/GPS".
    Source(Instant),
}

impl Popup {
    #[inline]
    pub const fn start_time(&self) -> Instant {
        match self {
            Self::Power(t) | Self::Source(t) => *t,
        }
    }

    #[inline]
    pub fn is_expired(&self) -> bool { self.start_time().elapsed() >= POPUP_DURATION }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_popup_not_expired() {
        assert!(!Popup::Power(Instant::now()).is_expired());
    }

    #[test]
    fn test_old_popup_expired() {
        if let Some(start) = Instant::now().checked_sub(POPUP_DURATION) {
            assert!(Popup::Source(start).is_expired());
        }
    }
}
