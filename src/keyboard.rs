//! System-wide keyboard hook, running on a dedicated thread.

use std::sync::Arc;
use std::thread;

use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageA, GetMessageA, HHOOK, KBDLLHOOKSTRUCT, MSG, PM_NOREMOVE,
    PeekMessageA, SetWindowsHookExA, TranslateMessage, UnhookWindowsHookEx, WH_KEYBOARD_LL,
    WM_USER,
};

use crate::state::{self, AppState, NotificationEvent, SIMULATED_EVENT_MARKER};

unsafe impl Send for KeyboardHook {}

pub struct KeyboardHook {
    state: Arc<AppState>,
    hook_handle: HHOOK,
}

impl KeyboardHook {
    pub fn new(state: Arc<AppState>) -> anyhow::Result<Self> {
        unsafe {
            let hook = SetWindowsHookExA(WH_KEYBOARD_LL, Some(Self::keyboard_proc), None, 0)?;

            if hook.0.is_null() {
                anyhow::bail!("Failed to install keyboard hook");
            }

            Ok(Self {
                state,
                hook_handle: hook,
            })
        }
    }

    /// Creates the thread's message queue and records the thread id so stop
    /// requests can reach the loop.
    ///
    /// Must run on the hook thread, and must complete before the hook is
    /// reported active: a Stop issued against an unregistered thread id
    /// posts nothing and would leave the hook orphaned.
    pub fn register_stop_target(&self) {
        // Force create message queue so PostThreadMessageA can reach us
        unsafe {
            let mut msg = MSG::default();
            let _ = PeekMessageA(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);
        }

        self.state
            .set_hook_thread_id(unsafe { GetCurrentThreadId() });
    }

    /// Runs the hook thread's message loop until WM_QUIT arrives, then
    /// uninstalls the hook.
    pub fn run_message_loop(self) -> anyhow::Result<()> {
        unsafe {
            let mut msg = MSG::default();
            loop {
                let result = GetMessageA(&mut msg, None, 0, 0);

                if result.0 == 0 || result.0 == -1 {
                    break;
                }

                let _ = TranslateMessage(&msg);
                DispatchMessageA(&msg);
            }
            let _ = UnhookWindowsHookEx(self.hook_handle);
        }

        self.state.clear_hook_thread_id();

        Ok(())
    }

    unsafe extern "system" fn keyboard_proc(
        code: i32,
        w_param: WPARAM,
        l_param: LPARAM,
    ) -> LRESULT {
        if code < 0 {
            return unsafe { CallNextHookEx(None, code, w_param, l_param) };
        }

        let kb_struct = unsafe { &*(l_param.0 as *const KBDLLHOOKSTRUCT) };

        // Skip self-injected events and never swallow anything: the keystroke
        // always continues down the hook chain unchanged.
        if kb_struct.dwExtraInfo != SIMULATED_EVENT_MARKER
            && let Some(state) = state::get_global_state()
        {
            state.handle_key_event(w_param.0 as u32, kb_struct.vkCode);
        }

        unsafe { CallNextHookEx(None, code, w_param, l_param) }
    }
}

impl Drop for KeyboardHook {
    fn drop(&mut self) {
        unsafe {
            let _ = UnhookWindowsHookEx(self.hook_handle);
        }
    }
}

/// Spawns a fresh hook thread and activates emulation once the hook is in.
///
/// Install failure is reported and leaves emulation inactive; it is not
/// retried and never aborts the process.
pub fn spawn_hook_thread(state: Arc<AppState>) {
    let spawned = thread::Builder::new()
        .name("keyboard_hook".to_string())
        .spawn(move || match KeyboardHook::new(state.clone()) {
            Ok(hook) => {
                // Register first: once active is observable, Stop must
                // already have a thread id to post WM_QUIT to.
                hook.register_stop_target();
                state.set_active(true);
                state.notify(NotificationEvent::Info("Scroll emulation started".to_string()));
                tracing::info!("keyboard hook installed");

                if let Err(e) = hook.run_message_loop() {
                    tracing::warn!("hook message loop ended with error: {e:#}");
                }

                state.set_active(false);
                tracing::info!("keyboard hook released");
            }
            Err(e) => {
                tracing::error!("failed to install keyboard hook: {e:#}");
                state.notify(NotificationEvent::Error(format!(
                    "Could not install keyboard hook: {e}"
                )));
            }
        });

    if let Err(e) = spawned {
        tracing::error!("failed to spawn hook thread: {e}");
    }
}
