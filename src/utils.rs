use std::path::Path;

/// Checks if a path exists
pub fn path_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists()
}

pub mod time {
    use chrono::{Local, NaiveDateTime};

    /// Timestamp format stored in the scan log
    pub const LOG_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    /// Timestamp format embedded in backup file names
    pub const BACKUP_FORMAT: &str = "%Y%m%d_%H%M%S";

    /// Source of "now" for scan timestamps and backup names
    pub trait Clock {
        fn now(&self) -> NaiveDateTime;
    }

    /// Local wall clock
    #[derive(Debug, Default, Clone, Copy)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> NaiveDateTime {
            Local::now().naive_local()
        }
    }

    /// `clock`'s current time as `YYYY-MM-DD HH:MM:SS`
    pub fn timestamp<C: Clock>(clock: &C) -> String {
        clock.now().format(LOG_FORMAT).to_string()
    }

    /// Current local time as `YYYY-MM-DD HH:MM:SS`
    pub fn get_current_time() -> String {
        timestamp(&SystemClock)
    }
}
