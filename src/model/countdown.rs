/// Whole-second countdown owned by the attempt engine. The host delivers one
/// `tick` per wall-clock second while `is_armed` is true.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining_seconds: u32,
    armed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownTick {
    Disarmed,
    Running(u32),
    Expired,
}

impl Countdown {
    pub fn armed(seconds: u32) -> Self {
        let mut countdown = Self::default();
        countdown.arm(seconds);
        countdown
    }

    pub fn arm(&mut self, seconds: u32) {
        self.remaining_seconds = seconds;
        self.armed = true;
    }

    /// Stops delivery; the remaining time is kept for display.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn tick(&mut self) -> CountdownTick {
        if !self.armed {
            return CountdownTick::Disarmed;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.armed = false;
            CountdownTick::Expired
        } else {
            CountdownTick::Running(self.remaining_seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_expires_after_exact_tick_count() {
        let mut countdown = Countdown::armed(3);

        assert_eq!(countdown.tick(), CountdownTick::Running(2));
        assert_eq!(countdown.tick(), CountdownTick::Running(1));
        assert_eq!(countdown.tick(), CountdownTick::Expired);
        assert!(!countdown.is_armed());
        assert_eq!(countdown.tick(), CountdownTick::Disarmed);
    }

    #[test]
    fn test_disarmed_countdown_keeps_remaining_time() {
        let mut countdown = Countdown::armed(60);
        countdown.tick();
        countdown.disarm();

        assert_eq!(countdown.tick(), CountdownTick::Disarmed);
        assert_eq!(countdown.remaining_seconds(), 59);
    }

    #[test]
    fn test_default_countdown_is_disarmed() {
        let mut countdown = Countdown::default();
        assert_eq!(countdown.tick(), CountdownTick::Disarmed);
    }
}
