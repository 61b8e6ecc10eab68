use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Once,
    Repeating,
}

/// A scheduled task polled against the show clock.
///
/// A repeating timer fires as soon as it is started and then every `period`.
/// A one-shot timer fires once, `period` after being started, and disarms.
/// Polling fires at most once per call; a late poll does not queue up missed
/// firings, the next one is scheduled relative to the poll time.
#[derive(Clone, Debug)]
pub struct Timer {
    period: Duration,
    mode: Mode,
    due: Option<Duration>,
}

impl Timer {
    pub fn repeating(period: Duration) -> Self {
        Self {
            period,
            mode: Mode::Repeating,
            due: None,
        }
    }

    pub fn once(delay: Duration) -> Self {
        Self {
            period: delay,
            mode: Mode::Once,
            due: None,
        }
    }

    pub fn start(&mut self, now: Duration) {
        self.due = Some(match self.mode {
            Mode::Repeating => now,
            Mode::Once => now + self.period,
        });
    }

    pub fn stop(&mut self) {
        self.due = None;
    }

    pub fn is_running(&self) -> bool {
        self.due.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns true when the timer fired at `now`.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = match self.mode {
                    Mode::Repeating => Some(now + self.period),
                    Mode::Once => None,
                };
                true
            }
            _ => false,
        }
    }
}
