/// `console_warn!("...")` reports client-side failures the page cannot show
/// itself: localStorage reads and writes that fail, JS bridge calls that
/// throw, and selector values that name no category. In the browser it writes
/// an `[arcade]`-prefixed `console.warn`; native builds forward to
/// `tracing::warn!` like the rest of the workspace.

#[cfg(target_family = "wasm")]
macro_rules! console_warn {
    ($($arg:tt)*) => {
        web_sys::console::warn_1(&format!("[arcade] {}", format_args!($($arg)*)).into())
    };
}

#[cfg(not(target_family = "wasm"))]
macro_rules! console_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "arcade_client", "{}", format_args!($($arg)*))
    };
}

pub(crate) use console_warn;
