use std::sync::Mutex;

static HELD: Mutex<Option<Vec<String>>> = Mutex::new(None);

/// Start holding warnings back. While holding is active, `buffered_warn!`
/// stores messages instead of writing them, so fetch noise from the
/// per-user loop cannot tear through the report table.
pub fn hold() {
    *HELD.lock().unwrap() = Some(Vec::new());
}

/// Stop holding and return everything collected, oldest first.
pub fn release() -> Vec<String> {
    HELD.lock().unwrap().take().unwrap_or_default()
}

/// Record one warning. Held messages are stored; otherwise the message
/// goes straight to stderr.
pub fn emit(msg: String) {
    let mut guard = HELD.lock().unwrap();
    if let Some(held) = guard.as_mut() {
        held.push(msg);
    } else {
        drop(guard);
        eprintln!("{}", msg);
    }
}

/// Like `eprintln!`, but routed through the warning hold when it is
/// active.
#[macro_export]
macro_rules! buffered_warn {
    ($($arg:tt)*) => {
        $crate::warnings::emit(format!($($arg)*))
    };
}
