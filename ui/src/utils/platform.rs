//! Platform helpers
//!
//! Thin wrappers over the few browser APIs the form layer needs, with native
//! fallbacks so the headless logic runs under `cargo test`:
//! - wall-clock timestamps for "last saved" indicators
//! - timers for debounced autosave and toast expiry
//! - the blocking alert used for rejected file selections

use crate::console_warn;

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or_default()
    }
}

/// Suspend the current task for `ms` milliseconds.
pub async fn sleep_ms(ms: u32) {
    #[cfg(target_arch = "wasm32")]
    {
        gloo_timers::future::TimeoutFuture::new(ms).await;
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        tokio::time::sleep(std::time::Duration::from_millis(u64::from(ms))).await;
    }
}

/// Show a modal alert. Outside the browser the message is only logged.
pub fn show_blocking_alert(message: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            if window.alert_with_message(message).is_ok() {
                return;
            }
        }
    }

    console_warn!("[Alert] {}", message);
}

/// Render a millisecond timestamp as local `HH:MM:SS` for status lines.
pub fn format_time_of_day(timestamp_ms: f64) -> String {
    #[cfg(target_arch = "wasm32")]
    {
        let date = js_sys::Date::new(&timestamp_ms.into());
        format!(
            "{:02}:{:02}:{:02}",
            date.get_hours(),
            date.get_minutes(),
            date.get_seconds()
        )
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let secs = (timestamp_ms / 1000.0) as u64 % 86_400;
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
    }
}
