//! Focus timer state machine. Ephemeral per session, never persisted.

use std::time::{Duration, Instant};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// One-shot signal fired when a countdown reaches zero. Delivery is
/// best-effort: the caller decides what to do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    Completed,
}

/// Countdown timer with a single owned tick deadline. Arming the deadline
/// happens only in `start`; every transition out of the running state drops
/// it, so at most one live tick schedule exists at any time.
#[derive(Debug, Clone)]
pub struct FocusTimer {
    total_secs: u64,
    remaining_secs: u64,
    running: bool,
    next_tick: Option<Instant>,
    /// Title of the task being focused on, if entered from the task list
    pub focus_label: Option<String>,
}

impl FocusTimer {
    pub fn new(total_secs: u64) -> Self {
        Self {
            total_secs,
            remaining_secs: total_secs,
            running: false,
            next_tick: None,
            focus_label: None,
        }
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// start (paused -> running); ignored when nothing remains
    pub fn start(&mut self, now: Instant) {
        if self.running || self.remaining_secs == 0 {
            return;
        }
        self.running = true;
        self.next_tick = Some(now + TICK_INTERVAL);
    }

    /// pause (running -> paused); disarms the tick deadline
    pub fn pause(&mut self) {
        self.running = false;
        self.next_tick = None;
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.running {
            self.pause();
        } else {
            self.start(now);
        }
    }

    /// reset (any -> paused, remaining restored to the configured total)
    pub fn reset(&mut self) {
        self.running = false;
        self.next_tick = None;
        self.remaining_secs = self.total_secs;
    }

    /// preset-select (any -> paused, total and remaining set to the preset)
    pub fn apply_preset(&mut self, total_secs: u64) {
        self.running = false;
        self.next_tick = None;
        self.total_secs = total_secs;
        self.remaining_secs = total_secs;
    }

    /// Advance one second. Returns the completion signal when the countdown
    /// expires; expiry deactivates the timer.
    pub fn tick(&mut self) -> Option<TimerSignal> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.running = false;
            self.next_tick = None;
            return Some(TimerSignal::Completed);
        }
        None
    }

    /// Consume every whole second elapsed since the last poll. The event
    /// loop calls this on its own cadence; catching up after a slow frame
    /// keeps wall-clock accuracy.
    pub fn poll(&mut self, now: Instant) -> Option<TimerSignal> {
        let mut fired = None;
        while self.running {
            let Some(deadline) = self.next_tick else {
                break;
            };
            if now < deadline {
                break;
            }
            self.next_tick = Some(deadline + TICK_INTERVAL);
            if let Some(signal) = self.tick() {
                fired = Some(signal);
            }
        }
        fired
    }

    /// Elapsed share of the countdown, as a whole percentage for rendering
    pub fn progress_percent(&self) -> u16 {
        if self.total_secs == 0 {
            return 0;
        }
        let elapsed = self.total_secs - self.remaining_secs;
        ((elapsed * 100) / self.total_secs) as u16
    }

    /// mm:ss display of the remaining time
    pub fn format_remaining(&self) -> String {
        let mins = self.remaining_secs / 60;
        let secs = self.remaining_secs % 60;
        format!("{:02}:{:02}", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_pomodoro_completes_exactly_once_and_deactivates() {
        let mut timer = FocusTimer::new(1500);
        timer.start(Instant::now());

        let mut completions = 0;
        for _ in 0..1500 {
            if timer.tick() == Some(TimerSignal::Completed) {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(timer.remaining_secs(), 0);
        assert!(!timer.is_running());

        // Further ticks are inert once deactivated
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[test]
    fn tick_ignored_while_paused() {
        let mut timer = FocusTimer::new(60);
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_secs(), 60);
    }

    #[test]
    fn reset_restores_total_and_pauses() {
        let mut timer = FocusTimer::new(60);
        timer.start(Instant::now());
        timer.tick();
        timer.tick();
        assert_eq!(timer.remaining_secs(), 58);

        timer.reset();
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_secs(), 60);
        assert!(timer.next_tick.is_none());
    }

    #[test]
    fn preset_switch_disarms_the_tick_schedule() {
        let mut timer = FocusTimer::new(1500);
        timer.start(Instant::now());
        assert!(timer.next_tick.is_some());

        timer.apply_preset(300);
        assert!(timer.next_tick.is_none());
        assert!(!timer.is_running());
        assert_eq!(timer.total_secs(), 300);
        assert_eq!(timer.remaining_secs(), 300);
    }

    #[test]
    fn start_does_nothing_on_an_expired_countdown() {
        let mut timer = FocusTimer::new(1);
        timer.start(Instant::now());
        assert_eq!(timer.tick(), Some(TimerSignal::Completed));

        timer.start(Instant::now());
        assert!(!timer.is_running());
    }

    #[test]
    fn poll_consumes_whole_elapsed_seconds() {
        let start = Instant::now();
        let mut timer = FocusTimer::new(10);
        timer.start(start);

        assert_eq!(timer.poll(start + Duration::from_millis(500)), None);
        assert_eq!(timer.remaining_secs(), 10);

        assert_eq!(timer.poll(start + Duration::from_millis(3200)), None);
        assert_eq!(timer.remaining_secs(), 7);

        // A long stall drives the countdown to completion exactly once
        assert_eq!(
            timer.poll(start + Duration::from_secs(60)),
            Some(TimerSignal::Completed)
        );
        assert!(!timer.is_running());
    }

    #[test]
    fn progress_runs_from_zero_to_hundred() {
        let mut timer = FocusTimer::new(4);
        assert_eq!(timer.progress_percent(), 0);
        timer.start(Instant::now());
        timer.tick();
        assert_eq!(timer.progress_percent(), 25);
        timer.tick();
        assert_eq!(timer.progress_percent(), 50);
        timer.tick();
        timer.tick();
        assert_eq!(timer.progress_percent(), 100);
    }

    #[test]
    fn remaining_formats_as_clock() {
        let timer = FocusTimer::new(1500);
        assert_eq!(timer.format_remaining(), "25:00");
        let timer = FocusTimer::new(65);
        assert_eq!(timer.format_remaining(), "01:05");
    }
}
