pub mod fs_atomic;
pub mod logging;

pub use fs_atomic::atomic_write_file;
pub use logging::{EventLog, Level};
