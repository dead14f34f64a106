use windows::{
    Win32::Foundation::*,
    Win32::Graphics::Gdi::*,
    Win32::System::LibraryLoader::GetModuleHandleW,
    Win32::System::Threading::Sleep,
    Win32::UI::Shell::*,
    Win32::UI::WindowsAndMessaging::*,
    core::*,
};

use anyhow::{Result, anyhow};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::state::{NotificationEvent, get_global_state};

const TRAY_MESSAGE_ID: u32 = WM_APP + 1;

const CMD_SHOW_WINDOW: u16 = 1010;
const CMD_EXIT: u16 = 1000;

pub struct TrayIcon {
    nid: NOTIFYICONDATAW,
    should_exit: Arc<AtomicBool>,
}

impl TrayIcon {
    /// Create new tray icon
    pub fn new(should_exit: Arc<AtomicBool>) -> Result<Self> {
        let window_class = w!("KeywheelWindowClass");
        let instance = unsafe { GetModuleHandleW(None)? };

        let window_icon = unsafe { LoadIconW::<PCWSTR>(None, IDI_APPLICATION)? };

        let wc = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(Self::window_procedure),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: instance.into(),
            hIcon: window_icon,
            hCursor: unsafe { LoadCursorW::<PCWSTR>(None, IDC_ARROW)? },
            hbrBackground: unsafe { GetSysColorBrush(SYS_COLOR_INDEX(COLOR_WINDOW.0 + 1)) },
            lpszMenuName: PCWSTR::null(),
            lpszClassName: window_class,
        };

        let atom = unsafe { RegisterClassW(&wc) };
        if atom == 0 {
            return Err(Error::new(E_FAIL, "Failed to register window class").into());
        }

        // Create a hidden message window
        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                window_class,
                w!("Keywheel"),
                WS_OVERLAPPEDWINDOW,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                None,
                None,
                Some(instance.into()),
                None,
            )
        }?;

        let mut nid = NOTIFYICONDATAW {
            cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
            hWnd: hwnd,
            uID: 1,
            uFlags: NIF_ICON | NIF_MESSAGE | NIF_TIP | NIF_SHOWTIP,
            uCallbackMessage: TRAY_MESSAGE_ID,
            hIcon: window_icon,
            ..Default::default()
        };

        Self::set_tooltip(&mut nid, "Keywheel");

        let _ = unsafe { Shell_NotifyIconW(NIM_ADD, &nid) };

        Ok(Self { nid, should_exit })
    }

    /// Set tooltip text for tray icon
    fn set_tooltip(nid: &mut NOTIFYICONDATAW, tooltip: &str) {
        let tip_wide: Vec<u16> = tooltip.encode_utf16().chain(std::iter::once(0)).collect();
        let copy_len = tip_wide.len().min(nid.szTip.len());
        nid.szTip[..copy_len].copy_from_slice(&tip_wide[..copy_len]);
    }

    /// Show a balloon notification from the tray icon
    fn show_notification(
        &mut self,
        title: &str,
        message: &str,
        icon_type: NOTIFY_ICON_INFOTIP_FLAGS,
    ) -> Result<()> {
        let original_flags = self.nid.uFlags;

        self.nid.uFlags = NIF_ICON | NIF_MESSAGE | NIF_TIP | NIF_SHOWTIP | NIF_INFO;
        self.nid.dwInfoFlags = icon_type | NIIF_NOSOUND;

        Self::set_notification_text(&mut self.nid, title, message);
        self.nid.Anonymous = NOTIFYICONDATAW_0 { uTimeout: 5000 }; // 5 seconds

        let result = unsafe { Shell_NotifyIconW(NIM_MODIFY, &self.nid) };
        self.nid.uFlags = original_flags;

        if !result.as_bool() {
            return Err(anyhow!("Failed to show notification"));
        }
        Ok(())
    }

    /// Set the title and message text of the notification
    fn set_notification_text(nid: &mut NOTIFYICONDATAW, title: &str, message: &str) {
        let title_wide: Vec<u16> = title.encode_utf16().chain(std::iter::once(0)).collect();
        let title_len = title_wide.len().min(nid.szInfoTitle.len());
        nid.szInfoTitle[..title_len].copy_from_slice(&title_wide[..title_len]);

        let message_wide: Vec<u16> = message.encode_utf16().chain(std::iter::once(0)).collect();
        let message_len = message_wide.len().min(nid.szInfo.len());
        nid.szInfo[..message_len].copy_from_slice(&message_wide[..message_len]);
    }

    pub fn show_info(&mut self, title: &str, message: &str) -> Result<()> {
        self.show_notification(title, message, NIIF_INFO)
    }

    pub fn show_warning(&mut self, title: &str, message: &str) -> Result<()> {
        self.show_notification(title, message, NIIF_WARNING)
    }

    pub fn show_error(&mut self, title: &str, message: &str) -> Result<()> {
        self.show_notification(title, message, NIIF_ERROR)
    }

    /// Runs the tray message loop, draining notification events as they come.
    pub fn run_message_loop(&mut self) -> Result<()> {
        let state = get_global_state().ok_or(anyhow!("Failed to get app state"))?;
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        state.set_notification_sender(event_tx);

        let mut msg = MSG::default();
        while !self.should_exit() {
            if let Ok(event) = event_rx.try_recv() {
                match event {
                    NotificationEvent::Info(message) => {
                        let _ = self.show_info("Keywheel", &message);
                    }
                    NotificationEvent::Warning(message) => {
                        let _ = self.show_warning("Keywheel", &message);
                    }
                    NotificationEvent::Error(message) => {
                        let _ = self.show_error("Keywheel", &message);
                    }
                }
            }

            unsafe {
                let has_message = PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool();

                if has_message {
                    if msg.message == WM_QUIT {
                        break;
                    }
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                } else {
                    // Take a short sleep when there is no message to avoid high CPU usage
                    Sleep(10);
                }
            }
        }

        Ok(())
    }

    /// Window procedure
    #[allow(non_snake_case)]
    extern "system" fn window_procedure(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        match msg {
            TRAY_MESSAGE_ID => Self::handle_tray_message(hwnd, lparam),
            WM_DESTROY => Self::handle_destroy(),
            WM_COMMAND => Self::handle_command(wparam),
            _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
        }
    }

    fn handle_tray_message(hwnd: HWND, lparam: LPARAM) -> LRESULT {
        match lparam.0 as u32 {
            WM_RBUTTONUP => {
                let _ = Self::show_context_menu(hwnd);
            }
            WM_LBUTTONDBLCLK => {
                if let Some(state) = get_global_state() {
                    state.request_show_window();
                }
            }
            _ => {}
        }
        LRESULT(0)
    }

    fn handle_destroy() -> LRESULT {
        unsafe {
            PostQuitMessage(0);
        }
        LRESULT(0)
    }

    /// Handle menu command
    fn handle_command(wparam: WPARAM) -> LRESULT {
        if let Some(state) = get_global_state() {
            match Self::loword(wparam.0 as u32) {
                CMD_SHOW_WINDOW => {
                    state.request_show_window();
                }
                CMD_EXIT => {
                    state.exit();
                }
                _ => {}
            }
        }
        LRESULT(0)
    }

    /// Show context menu
    fn show_context_menu(hwnd: HWND) -> Result<()> {
        unsafe {
            let menu = CreatePopupMenu()?;

            AppendMenuW(menu, MF_STRING, CMD_SHOW_WINDOW as usize, w!("Show Window"))?;
            AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null())?;
            AppendMenuW(menu, MF_STRING, CMD_EXIT as usize, w!("Exit"))?;

            let mut pos = POINT::default();
            GetCursorPos(&mut pos)?;

            // Set window to front desk and display the menu
            let _ = SetForegroundWindow(hwnd);
            let _ = TrackPopupMenu(
                menu,
                TPM_LEFTALIGN | TPM_LEFTBUTTON | TPM_BOTTOMALIGN,
                pos.x,
                pos.y,
                Some(0),
                hwnd,
                None,
            );

            let _ = DestroyMenu(menu);
        }
        Ok(())
    }

    /// Extract the lower 16 bits of the 32-bit value
    fn loword(value: u32) -> u16 {
        (value & 0xFFFF) as u16
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit.load(Ordering::Relaxed)
    }
}

impl Drop for TrayIcon {
    fn drop(&mut self) {
        unsafe {
            let _ = Shell_NotifyIconW(NIM_DELETE, &self.nid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loword_extraction() {
        assert_eq!(TrayIcon::loword(0x12345678), 0x5678);
        assert_eq!(TrayIcon::loword(0xABCDEF01), 0xEF01);
        assert_eq!(TrayIcon::loword(0x0000FFFF), 0xFFFF);
        assert_eq!(TrayIcon::loword(0x12340000), 0x0000);
    }

    #[test]
    fn test_tray_message_id() {
        assert!(TRAY_MESSAGE_ID > WM_APP);
        assert_eq!(TRAY_MESSAGE_ID, WM_APP + 1);
    }
}
