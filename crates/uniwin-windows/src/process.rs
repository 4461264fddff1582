use std::path::Path;

use uniwin_core::{WindowError, WindowResult};

use windows::Win32::Foundation::CloseHandle;
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
    QueryFullProcessImageNameW,
};
use windows::core::PWSTR;

/// Returns the executable name (without extension) of a process.
///
/// Uses `PROCESS_QUERY_LIMITED_INFORMATION`, the least-privilege access
/// right that allows reading the image path, so it also works for most
/// elevated processes.
pub fn process_name(pid: u32) -> WindowResult<String> {
    // SAFETY: OpenProcess either fails or returns a handle we close below.
    let handle = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) }
        .map_err(|e| WindowError::os("OpenProcess", e))?;

    let mut buffer = [0u16; 1024];
    let mut length = buffer.len() as u32;
    // SAFETY: buffer and length describe a valid writable region.
    let result = unsafe {
        QueryFullProcessImageNameW(
            handle,
            PROCESS_NAME_WIN32,
            PWSTR(buffer.as_mut_ptr()),
            &mut length,
        )
    };
    unsafe {
        let _ = CloseHandle(handle);
    }
    result.map_err(|e| WindowError::os("QueryFullProcessImageNameW", e))?;

    let path = String::from_utf16_lossy(&buffer[..length as usize]);
    Ok(Path::new(&path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default())
}
