use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent};

pub const CLOCK_INTERVAL: Duration = Duration::from_secs(1);

pub enum AppEvent {
    Key(KeyEvent),
    /// One second of countdown from the ticker with this id.
    ClockTick(u64),
    /// Input poll timed out; nothing happened.
    Idle,
    Resize(#[allow(dead_code)] u16, #[allow(dead_code)] u16),
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(poll_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();

        thread::spawn(move || {
            loop {
                if event::poll(poll_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => {
                            if input_tx.send(AppEvent::Key(key)).is_err() {
                                return;
                            }
                        }
                        Ok(Event::Resize(w, h)) => {
                            if input_tx.send(AppEvent::Resize(w, h)).is_err() {
                                return;
                            }
                        }
                        _ => {}
                    }
                } else if input_tx.send(AppEvent::Idle).is_err() {
                    return;
                }
            }
        });

        Self { rx, tx }
    }

    pub fn sender(&self) -> mpsc::Sender<AppEvent> {
        self.tx.clone()
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

/// Handle to a repeating tick thread. The thread checks the armed flag before every send,
/// and dropping the handle disarms it.
pub struct ClockTicker {
    id: u64,
    armed: Arc<AtomicBool>,
}

impl ClockTicker {
    pub fn spawn(tx: mpsc::Sender<AppEvent>, id: u64, interval: Duration) -> Self {
        let armed = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&armed);

        thread::spawn(move || {
            let mut next = Instant::now() + interval;
            loop {
                thread::sleep(next.saturating_duration_since(Instant::now()));
                next += interval;
                if !flag.load(Ordering::Acquire) {
                    return;
                }
                if tx.send(AppEvent::ClockTick(id)).is_err() {
                    return;
                }
            }
        });

        Self { id, armed }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    pub fn cancel(&self) {
        self.armed.store(false, Ordering::Release);
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Owns at most one live ticker. Each arm gets a fresh id, so a tick that was already in
/// the channel when its ticker was cancelled is recognised as stale and dropped.
pub struct ClockDriver {
    tx: mpsc::Sender<AppEvent>,
    interval: Duration,
    next_id: u64,
    active: Option<ClockTicker>,
}

impl ClockDriver {
    pub fn new(tx: mpsc::Sender<AppEvent>, interval: Duration) -> Self {
        Self {
            tx,
            interval,
            next_id: 0,
            active: None,
        }
    }

    pub fn arm(&mut self) {
        self.stop();
        self.next_id += 1;
        self.active = Some(ClockTicker::spawn(
            self.tx.clone(),
            self.next_id,
            self.interval,
        ));
    }

    pub fn stop(&mut self) {
        if let Some(ticker) = self.active.take() {
            ticker.cancel();
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.active.as_ref().is_some_and(ClockTicker::is_armed)
    }

    pub fn accepts(&self, id: u64) -> bool {
        self.active.as_ref().is_some_and(|t| t.is_armed() && t.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recv_tick(rx: &mpsc::Receiver<AppEvent>) -> Option<u64> {
        match rx.recv_timeout(Duration::from_millis(500)) {
            Ok(AppEvent::ClockTick(id)) => Some(id),
            _ => None,
        }
    }

    #[test]
    fn ticker_sends_tagged_ticks() {
        let (tx, rx) = mpsc::channel();
        let ticker = ClockTicker::spawn(tx, 7, Duration::from_millis(5));
        assert_eq!(recv_tick(&rx), Some(7));
        assert_eq!(recv_tick(&rx), Some(7));
        ticker.cancel();
    }

    #[test]
    fn cancelled_ticker_goes_quiet() {
        let (tx, rx) = mpsc::channel();
        let ticker = ClockTicker::spawn(tx, 1, Duration::from_millis(5));
        assert_eq!(recv_tick(&rx), Some(1));
        ticker.cancel();
        assert!(!ticker.is_armed());
        // Drain anything sent before the flag flipped, then expect silence.
        thread::sleep(Duration::from_millis(30));
        while rx.try_recv().is_ok() {}
        thread::sleep(Duration::from_millis(30));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn cancel_is_idempotent() {
        let (tx, _rx) = mpsc::channel();
        let ticker = ClockTicker::spawn(tx, 1, Duration::from_millis(50));
        ticker.cancel();
        ticker.cancel();
        assert!(!ticker.is_armed());
    }

    #[test]
    fn driver_rejects_ticks_from_previous_arm() {
        let (tx, rx) = mpsc::channel();
        let mut driver = ClockDriver::new(tx, Duration::from_millis(5));
        driver.arm();
        let first = recv_tick(&rx).unwrap();
        assert!(driver.accepts(first));

        driver.arm();
        assert!(!driver.accepts(first));
        assert!(driver.is_running());

        driver.stop();
        assert!(!driver.is_running());
        assert!(!driver.accepts(first + 1));
        driver.stop();
    }
}
