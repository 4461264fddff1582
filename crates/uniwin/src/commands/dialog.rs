#[cfg(windows)]
use uniwin_core::{WindowApi, dialog};

#[cfg(windows)]
pub fn open(filter: Option<&str>) {
    let api = uniwin_windows::Win32Api;
    let filter = dialog::native_filter(filter.unwrap_or(dialog::DEFAULT_FILTER));
    report(api.open_file_dialog(api.active_window(), &filter));
}

#[cfg(windows)]
pub fn save(filter: Option<&str>) {
    let api = uniwin_windows::Win32Api;
    let filter = dialog::native_filter(filter.unwrap_or(dialog::DEFAULT_FILTER));
    report(api.save_file_dialog(api.active_window(), &filter));
}

#[cfg(windows)]
fn report(path: Option<std::path::PathBuf>) {
    match path {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Cancelled.");
            std::process::exit(1);
        }
    }
}

#[cfg(not(windows))]
pub fn open(_filter: Option<&str>) {
    super::unsupported();
}

#[cfg(not(windows))]
pub fn save(_filter: Option<&str>) {
    super::unsupported();
}
