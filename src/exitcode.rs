//! Process exit codes, numbered after BSD sysexits.h

/// Command finished
pub const OK: i32 = 0;

/// Bad arguments or no subcommand
pub const USAGE: i32 = 64;

/// Tree file parsed but invalid, or rejected by layout
pub const DATAERR: i32 = 65;

/// Tree file missing or unreadable
pub const NOINPUT: i32 = 66;

/// Output could not be rendered
pub const SOFTWARE: i32 = 70;

/// Explore events could not be read
pub const IOERR: i32 = 74;

/// Settings file or environment override rejected
pub const CONFIG: i32 = 78;
