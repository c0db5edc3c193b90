//! Per-IP request admission.
//!
//! Each client address gets two fixed windows, a minute window and an hour
//! window. A request must fit in both. Windows reset in place when their
//! span elapses; a rejected request consumes nothing, so capacity is not
//! burned by callers hammering a closed gate.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{GenerateError, GenerateResult};

/// Window spans and caps. Defaults match production; tests shrink the
/// spans to keep wall-clock time down.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub minute_window: Duration,
    pub hour_window: Duration,
    pub minute_cap: u32,
    pub hour_cap: u32,
    /// Minimum gap between idle-entry sweeps.
    pub sweep_interval: Duration,
    /// Entries unseen for this long are evicted by the sweep.
    pub idle_eviction: Duration,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            minute_window: Duration::from_secs(60),
            hour_window: Duration::from_secs(3600),
            minute_cap: 60,
            hour_cap: 1000,
            sweep_interval: Duration::from_secs(600),
            idle_eviction: Duration::from_secs(3600),
        }
    }
}

#[derive(Debug)]
struct ClientWindow {
    minute_count: u32,
    minute_start: Instant,
    hour_count: u32,
    hour_start: Instant,
    last_seen: Instant,
}

impl ClientWindow {
    fn new(now: Instant) -> Self {
        Self {
            minute_count: 0,
            minute_start: now,
            hour_count: 0,
            hour_start: now,
            last_seen: now,
        }
    }
}

/// Sliding-window request limiter keyed by client IP.
pub struct IpWindowLimiter {
    clients: RwLock<HashMap<IpAddr, Arc<Mutex<ClientWindow>>>>,
    last_sweep: Mutex<Instant>,
    config: WindowConfig,
}

impl IpWindowLimiter {
    pub fn new(config: WindowConfig) -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            last_sweep: Mutex::new(Instant::now()),
            config,
        }
    }

    /// Admit or reject one request from `ip`.
    ///
    /// On admission both window counters advance. On rejection neither
    /// does, so the request costs the caller nothing.
    pub fn try_acquire(&self, ip: IpAddr) -> GenerateResult<()> {
        self.maybe_sweep();

        let now = Instant::now();
        let window = self.window_for(ip, now);
        let mut w = window.lock().unwrap_or_else(PoisonError::into_inner);

        if now.duration_since(w.minute_start) >= self.config.minute_window {
            w.minute_count = 0;
            w.minute_start = now;
        }
        if now.duration_since(w.hour_start) >= self.config.hour_window {
            w.hour_count = 0;
            w.hour_start = now;
        }
        w.last_seen = now;

        if w.minute_count >= self.config.minute_cap || w.hour_count >= self.config.hour_cap {
            debug!(
                ip = %ip,
                minute_count = w.minute_count,
                hour_count = w.hour_count,
                "Request rejected by IP window"
            );
            return Err(GenerateError::RateLimited);
        }

        w.minute_count += 1;
        w.hour_count += 1;
        Ok(())
    }

    /// Number of addresses currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn window_for(&self, ip: IpAddr, now: Instant) -> Arc<Mutex<ClientWindow>> {
        {
            let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(window) = clients.get(&ip) {
                return Arc::clone(window);
            }
        }

        let mut clients = self.clients.write().unwrap_or_else(PoisonError::into_inner);
        // Re-check under the write lock; another task may have raced us here.
        Arc::clone(
            clients
                .entry(ip)
                .or_insert_with(|| Arc::new(Mutex::new(ClientWindow::new(now)))),
        )
    }

    /// Evict long-idle entries, at most once per sweep interval.
    fn maybe_sweep(&self) {
        let now = Instant::now();
        {
            let mut last = self.last_sweep.lock().unwrap_or_else(PoisonError::into_inner);
            if now.duration_since(*last) < self.config.sweep_interval {
                return;
            }
            *last = now;
        }

        let mut clients = self.clients.write().unwrap_or_else(PoisonError::into_inner);
        let before = clients.len();
        clients.retain(|_, window| {
            let w = window.lock().unwrap_or_else(PoisonError::into_inner);
            now.duration_since(w.last_seen) < self.config.idle_eviction
        });
        let evicted = before - clients.len();
        if evicted > 0 {
            info!(evicted, remaining = clients.len(), "Swept idle rate limit entries");
        }
    }
}
