//! Process-wide reader cap.
//!
//! The cap governs every `Gate` instance in the process, not just one.
//! `None` means unbounded. Lowering the cap never evicts current
//! readers — it only denies future admissions, so the predicate must
//! read it atomically alongside the Gate's own `readers` counter.

use once_cell::sync::Lazy;
use parking_lot::Mutex;

static READER_CAP: Lazy<Mutex<Option<u32>>> = Lazy::new(|| Mutex::new(None));

/// Sets the process-wide reader cap. `None` disables it.
pub fn set_reader_cap(cap: Option<u32>) {
    *READER_CAP.lock() = cap;
}

/// Returns the current process-wide reader cap, `None` if disabled.
pub fn get_reader_cap() -> Option<u32> {
    *READER_CAP.lock()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: READER_CAP is a process-wide static, and unit tests
    // in this binary run concurrently, so split assertions here would
    // race with each other.
    #[test]
    fn cap_set_and_clear_round_trip() {
        set_reader_cap(None);
        assert_eq!(get_reader_cap(), None);

        set_reader_cap(Some(5));
        assert_eq!(get_reader_cap(), Some(5));

        set_reader_cap(None);
        assert_eq!(get_reader_cap(), None);
    }
}
