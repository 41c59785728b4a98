//! Administrator elevation
//!
//! Input injected into a game running elevated is dropped unless the
//! injector runs elevated too. The binary checks this at startup and, if
//! needed, relaunches itself through the `runas` verb.

use windows::core::{HSTRING, PCWSTR, w};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Shell::{IsUserAnAdmin, ShellExecuteW};
use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

use super::PlatformError;

/// `ShellExecuteW` returns a value greater than this on success
const SHELL_EXECUTE_SUCCESS_THRESHOLD: isize = 32;

/// Whether the current process has administrator rights
pub fn is_elevated() -> bool {
    unsafe { IsUserAnAdmin() }.as_bool()
}

/// Starts a new elevated copy of this executable with the same arguments
///
/// The caller is expected to exit right after this returns `Ok`.
pub fn relaunch_elevated() -> Result<(), PlatformError> {
    let exe = std::env::current_exe().map_err(|e| PlatformError::ElevationFailed(e.to_string()))?;
    let args = join_arguments(std::env::args().skip(1));

    let file = HSTRING::from(exe.as_os_str());
    let parameters = HSTRING::from(args.as_str());

    let result = unsafe {
        ShellExecuteW(HWND(0), w!("runas"), &file, &parameters, PCWSTR::null(), SW_SHOWNORMAL)
    };

    if result.0 <= SHELL_EXECUTE_SUCCESS_THRESHOLD {
        return Err(PlatformError::ElevationFailed(format!(
            "ShellExecuteW returned {}",
            result.0
        )));
    }

    Ok(())
}

/// Rebuilds a command line from individual arguments
///
/// Arguments containing spaces or quotes are wrapped in quotes.
fn join_arguments<I: IntoIterator<Item = String>>(args: I) -> String {
    args.into_iter()
        .map(|arg| {
            if arg.is_empty() || arg.contains([' ', '\t', '"']) {
                format!("\"{}\"", arg.replace('"', "\\\""))
            } else {
                arg
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
