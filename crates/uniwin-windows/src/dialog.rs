use std::path::PathBuf;

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Controls::Dialogs::{
    GetOpenFileNameW, GetSaveFileNameW, OFN_EXPLORER, OFN_FILEMUSTEXIST, OFN_NOCHANGEDIR,
    OFN_OVERWRITEPROMPT, OFN_PATHMUSTEXIST, OPEN_FILENAME_FLAGS, OPENFILENAMEW,
};
use windows::core::{PCWSTR, PWSTR};

/// Longest path the dialogs return.
const MAX_PATH_CHARS: usize = 1024;

/// Shows the open-file dialog. `filter` is in native, null-delimited form.
pub fn open_file(owner: Option<HWND>, filter: &str) -> Option<PathBuf> {
    run(
        owner,
        filter,
        OFN_EXPLORER | OFN_FILEMUSTEXIST | OFN_PATHMUSTEXIST | OFN_NOCHANGEDIR,
        |ofn| unsafe { GetOpenFileNameW(ofn) }.as_bool(),
    )
}

/// Shows the save-file dialog. `filter` is in native, null-delimited form.
pub fn save_file(owner: Option<HWND>, filter: &str) -> Option<PathBuf> {
    run(
        owner,
        filter,
        OFN_EXPLORER | OFN_OVERWRITEPROMPT | OFN_PATHMUSTEXIST | OFN_NOCHANGEDIR,
        |ofn| unsafe { GetSaveFileNameW(ofn) }.as_bool(),
    )
}

fn run(
    owner: Option<HWND>,
    filter: &str,
    flags: OPEN_FILENAME_FLAGS,
    show: impl FnOnce(&mut OPENFILENAMEW) -> bool,
) -> Option<PathBuf> {
    // `filter` already carries its own terminators.
    let filter: Vec<u16> = filter.encode_utf16().collect();
    let mut file = vec![0u16; MAX_PATH_CHARS];

    let mut ofn = OPENFILENAMEW {
        lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
        hwndOwner: owner.unwrap_or_default(),
        lpstrFilter: PCWSTR(filter.as_ptr()),
        lpstrFile: PWSTR(file.as_mut_ptr()),
        nMaxFile: file.len() as u32,
        Flags: flags,
        ..Default::default()
    };

    // Cancel and failure both come back as false.
    if !show(&mut ofn) {
        return None;
    }

    let length = file.iter().position(|&c| c == 0).unwrap_or(file.len());
    (length > 0).then(|| PathBuf::from(String::from_utf16_lossy(&file[..length])))
}
