/// Filter used when the caller does not supply one.
pub const DEFAULT_FILTER: &str = "All files|*.*";

/// Converts a pipe-delimited filter (`"Images|*.png;*.jpg|All files|*.*"`)
/// into the null-delimited, double-null-terminated form the native file
/// dialogs expect.
pub fn native_filter(filter: &str) -> String {
    let mut native = filter.replace('|', "\0");
    if !native.ends_with('\0') {
        native.push('\0');
    }
    native.push('\0');
    native
}
