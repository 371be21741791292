
/// Logs under an explicit component tag instead of the module path.
/// The `fern` dispatch renders the tag in the target slot:
/// [2025-04-25T16:32:10+02:00][INFO ][intake][pid=4568][tid=ThreadId(2)] message
///
/// ```rust
/// use log::Level;
/// relay::relay_log!(Level::Info, "intake", "Subscribed to {}", "ee/ce360/weatherapp");
/// ```
#[macro_export]
macro_rules! relay_log {
    ($level:expr, $component:expr, $fmt:expr $(, $($arg:tt)+)?) => {
        log::log!(target: $component, $level, $fmt $(, $($arg)+)?)
    };
}

/// Print an error with context and terminate the process.
#[macro_export]
macro_rules! fatal {
    ($ctx:expr, $($arg:tt)+) => {{
        eprintln!(
            "[{}][ERROR][{}] {}",
            chrono::Local::now().to_rfc3339(),
            $ctx,
            format!($($arg)+)
        );
        std::process::exit(1);
    }};
}
