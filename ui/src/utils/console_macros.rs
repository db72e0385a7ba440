/// Macros for properly formatted console logging.
///
/// In the browser these wrap gloo_console and prefix every line with a
/// `js_sys::Date::now()` timestamp. On native targets (unit tests, tooling)
/// the same call sites go through `tracing`, so headless form logic never
/// touches JS bindings.
#[macro_export]
macro_rules! console_info {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        {
            gloo_console::info!(format!("[{}] {}", js_sys::Date::now(), format!($($arg)*)));
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            tracing::info!("{}", format!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! console_log {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        {
            gloo_console::log!(format!("[{}] {}", js_sys::Date::now(), format!($($arg)*)));
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            tracing::trace!("{}", format!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! console_warn {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        {
            gloo_console::warn!(format!("[{}] {}", js_sys::Date::now(), format!($($arg)*)));
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            tracing::warn!("{}", format!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! console_error {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        {
            gloo_console::error!(format!("[{}] {}", js_sys::Date::now(), format!($($arg)*)));
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            tracing::error!("{}", format!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! console_debug {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        {
            gloo_console::debug!(format!("[{}] {}", js_sys::Date::now(), format!($($arg)*)));
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            tracing::debug!("{}", format!($($arg)*));
        }
    }};
}
