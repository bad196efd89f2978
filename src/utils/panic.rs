use std::panic;

/// Routes panics through `tracing` so they end up in the same log stream as
/// everything else.
pub fn set_hook() {
    panic::set_hook(Box::new(|info| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("<non-string panic payload>");

        match info.location() {
            Some(location) => error!(
                "panicked at {}:{}: {}",
                location.file(),
                location.line(),
                payload
            ),
            None => error!("panicked: {}", payload),
        }
    }));
}
