//! System tray presence
//!
//! A hidden window owns a notification-area icon whose menu has a single
//! "Exit" entry. The tray loop runs on the main thread and pumps messages
//! until Exit is chosen or the shared cancel token is set by the dispatcher.

use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use windows::core::w;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, POINT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Shell::{
    NIF_ICON, NIF_MESSAGE, NIF_TIP, NIM_ADD, NIM_DELETE, NOTIFYICONDATAW, Shell_NotifyIconW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreateIcon, CreatePopupMenu, CreateWindowExW, DefWindowProcW, DestroyIcon,
    DestroyMenu, DestroyWindow, DispatchMessageW, GetCursorPos, HICON, MF_STRING, MSG,
    PM_REMOVE, PeekMessageW, PostQuitMessage, RegisterClassW, SetForegroundWindow,
    TPM_RETURNCMD, TPM_RIGHTBUTTON, TrackPopupMenu, TranslateMessage, WM_APP, WM_DESTROY,
    WM_LBUTTONUP, WM_QUIT, WM_RBUTTONUP, WNDCLASSW, WS_OVERLAPPED,
};

use crate::app::cancel::CancelToken;
use crate::ui::icon::{IconError, tray_icon_image};

/// Message the shell sends for icon clicks
const WM_TRAY_CALLBACK: u32 = WM_APP + 1;

/// Menu command id of "Exit"
const ID_EXIT: usize = 1;

/// Identifier of our single icon
const TRAY_ICON_ID: u32 = 1;

/// How often the loop re-checks the cancel token between messages
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Tray errors
#[derive(Debug, thiserror::Error)]
pub enum TrayError {
    #[error("Failed to register tray window class")]
    WindowClassRegistrationFailed,

    #[error("Failed to create tray window")]
    WindowCreationFailed,

    #[error("Failed to create tray icon handle")]
    IconCreationFailed,

    #[error("Shell refused the notification icon")]
    NotifyIconFailed,

    #[error("Icon rendering failed: {0}")]
    Icon(#[from] IconError),
}

/// How the tray loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayExit {
    /// The user chose "Exit" from the menu
    ExitSelected,
    /// The cancel token was set elsewhere
    Cancelled,
}

/// Notification-area icon with an Exit menu
///
/// Removes the icon and destroys its window on drop.
pub struct Tray {
    hwnd: HWND,
    icon: HICON,
}

impl Tray {
    /// Creates the hidden window and adds the icon
    ///
    /// Must be called on the thread that will run [`Tray::run`].
    pub fn new(tooltip: &str) -> Result<Self, TrayError> {
        let class_name = w!("GdAutoSellTrayWindow");
        let hinstance =
            unsafe { GetModuleHandleW(None) }.map_err(|_| TrayError::WindowClassRegistrationFailed)?;

        let wc = WNDCLASSW {
            lpfnWndProc: Some(tray_window_proc),
            hInstance: hinstance.into(),
            lpszClassName: class_name,
            ..Default::default()
        };

        let class_atom = unsafe { RegisterClassW(&wc) };
        if class_atom == 0 {
            return Err(TrayError::WindowClassRegistrationFailed);
        }

        let hwnd = unsafe {
            CreateWindowExW(
                Default::default(),
                class_name,
                w!("AutoSell & Dismantle"),
                WS_OVERLAPPED,
                0, 0, 0, 0,
                None,
                None,
                hinstance,
                None,
            )
        };

        if hwnd.0 == 0 {
            return Err(TrayError::WindowCreationFailed);
        }

        let image = match tray_icon_image() {
            Ok(image) => image,
            Err(e) => {
                unsafe { DestroyWindow(hwnd).ok() };
                return Err(e.into());
            }
        };
        let icon = unsafe {
            CreateIcon(
                hinstance,
                image.width as i32,
                image.height as i32,
                1,
                32,
                image.and_mask.as_ptr(),
                image.bgra.as_ptr(),
            )
        };
        let icon = match icon {
            Ok(icon) => icon,
            Err(_) => {
                unsafe { DestroyWindow(hwnd).ok() };
                return Err(TrayError::IconCreationFailed);
            }
        };

        let tray = Self { hwnd, icon };

        let mut data = tray.notify_data();
        data.uFlags = NIF_ICON | NIF_MESSAGE | NIF_TIP;
        data.uCallbackMessage = WM_TRAY_CALLBACK;
        data.hIcon = icon;
        copy_tooltip(&mut data.szTip, tooltip);

        if !unsafe { Shell_NotifyIconW(NIM_ADD, &data) }.as_bool() {
            // Drop still destroys the window and icon
            return Err(TrayError::NotifyIconFailed);
        }

        debug!("tray icon added");
        Ok(tray)
    }

    /// Pumps window messages until Exit is chosen or `cancel` is set
    ///
    /// Choosing Exit sets `cancel` so the dispatcher stops too.
    pub fn run(&self, cancel: &CancelToken) -> TrayExit {
        let mut msg = MSG::default();

        loop {
            if cancel.is_cancelled() {
                return TrayExit::Cancelled;
            }

            while unsafe { PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE) }.as_bool() {
                if msg.message == WM_QUIT {
                    info!("Tray exit selected. Exiting...");
                    cancel.cancel();
                    return TrayExit::ExitSelected;
                }

                unsafe {
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            }

            thread::sleep(POLL_INTERVAL);
        }
    }

    fn notify_data(&self) -> NOTIFYICONDATAW {
        NOTIFYICONDATAW {
            cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
            hWnd: self.hwnd,
            uID: TRAY_ICON_ID,
            ..Default::default()
        }
    }
}

impl Drop for Tray {
    fn drop(&mut self) {
        let data = self.notify_data();
        unsafe {
            if !Shell_NotifyIconW(NIM_DELETE, &data).as_bool() {
                warn!("failed to remove tray icon");
            }
            DestroyIcon(self.icon).ok();
            DestroyWindow(self.hwnd).ok();
        }
    }
}

/// Copies `text` into a fixed NUL-terminated UTF-16 buffer, truncating
fn copy_tooltip(buffer: &mut [u16], text: &str) {
    let capacity = buffer.len().saturating_sub(1);
    let mut len = 0;
    for (slot, unit) in buffer.iter_mut().zip(text.encode_utf16().take(capacity)) {
        *slot = unit;
        len += 1;
    }
    if let Some(terminator) = buffer.get_mut(len) {
        *terminator = 0;
    }
}

/// Shows the popup menu at the cursor and quits the loop on Exit
unsafe fn show_menu(hwnd: HWND) {
    let Ok(menu) = (unsafe { CreatePopupMenu() }) else {
        warn!("failed to create tray menu");
        return;
    };

    unsafe {
        if AppendMenuW(menu, MF_STRING, ID_EXIT, w!("Exit")).is_ok() {
            let mut cursor = POINT::default();
            let _ = GetCursorPos(&mut cursor);

            // The menu only dismisses on outside clicks if our window is in front
            let _ = SetForegroundWindow(hwnd);
            let command = TrackPopupMenu(
                menu,
                TPM_RETURNCMD | TPM_RIGHTBUTTON,
                cursor.x,
                cursor.y,
                0,
                hwnd,
                None,
            );

            if command.0 as usize == ID_EXIT {
                PostQuitMessage(0);
            }
        }

        DestroyMenu(menu).ok();
    }
}

unsafe extern "system" fn tray_window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_TRAY_CALLBACK => {
            let event = (lparam.0 as u32) & 0xFFFF;
            if event == WM_RBUTTONUP || event == WM_LBUTTONUP {
                unsafe { show_menu(hwnd) };
            }
            LRESULT(0)
        }
        WM_DESTROY => LRESULT(0),
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}
