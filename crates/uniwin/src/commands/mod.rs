pub mod config;
pub mod dialog;
pub mod find;
pub mod init;
pub mod list;

/// Exits with an error on platforms without a window backend.
#[cfg(not(windows))]
pub fn unsupported() -> ! {
    eprintln!("Error: this command requires Windows.");
    std::process::exit(1);
}
