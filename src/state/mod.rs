//! Application state management.

pub mod handlers;
pub mod simulation;
pub mod types;

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};

use crossbeam_channel::Sender;
use scc::{AtomicShared, Guard, Shared, Tag};

use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{PostThreadMessageA, WM_QUIT};

use crate::config::AppConfig;
use crate::keys;

pub use types::*;

pub const MIN_SCROLL_SPEED: u32 = 1;
pub const MAX_SCROLL_SPEED: u32 = 10;

static GLOBAL_STATE: OnceLock<Arc<AppState>> = OnceLock::new();

pub struct AppState {
    show_tray_icon: AtomicBool,
    show_notifications: AtomicBool,
    pub should_exit: Arc<AtomicBool>,
    is_active: AtomicBool,
    show_window_requested: AtomicBool,
    scroll_speed: AtomicU32,
    // Mutated only by the hook dispatch path; read by combo evaluation.
    pub(crate) pressed_keys: scc::HashSet<u32>,
    up_keys: AtomicShared<Vec<u32>>,
    down_keys: AtomicShared<Vec<u32>>,
    // Thread id of the live hook message loop, 0 when no hook is installed.
    hook_thread_id: AtomicU32,
    notification_sender: OnceLock<Sender<NotificationEvent>>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let up_keys = Self::parse_combo_names(&config.scroll_up_keys)?;
        let down_keys = Self::parse_combo_names(&config.scroll_down_keys)?;

        if !(MIN_SCROLL_SPEED..=MAX_SCROLL_SPEED).contains(&config.scroll_speed) {
            anyhow::bail!(
                "Invalid scroll_speed {}: must be between {} and {}",
                config.scroll_speed,
                MIN_SCROLL_SPEED,
                MAX_SCROLL_SPEED
            );
        }

        Ok(Self {
            show_tray_icon: AtomicBool::new(config.show_tray_icon),
            show_notifications: AtomicBool::new(config.show_notifications),
            should_exit: Arc::new(AtomicBool::new(false)),
            is_active: AtomicBool::new(false),
            show_window_requested: AtomicBool::new(false),
            scroll_speed: AtomicU32::new(config.scroll_speed),
            pressed_keys: scc::HashSet::new(),
            up_keys: AtomicShared::from(Shared::new(up_keys)),
            down_keys: AtomicShared::from(Shared::new(down_keys)),
            hook_thread_id: AtomicU32::new(0),
            notification_sender: OnceLock::new(),
        })
    }

    fn parse_combo_names(names: &[String]) -> anyhow::Result<Vec<u32>> {
        let mut vks = Vec::with_capacity(names.len());
        for name in names {
            let vk = keys::key_name_to_vk(name)
                .ok_or_else(|| anyhow::anyhow!("Invalid key name: {}", name))?;
            if !vks.contains(&vk) {
                vks.push(vk);
            }
        }
        Ok(vks)
    }

    /// Snapshot of the combo for one side, in first-press order.
    pub fn combo_keys(&self, side: ComboSide) -> Vec<u32> {
        let guard = Guard::new();
        self.combo_slot(side)
            .load(Ordering::Acquire, &guard)
            .as_ref()
            .cloned()
            .unwrap_or_default()
    }

    /// Replaces the combo for one side. An empty list disables that direction.
    pub fn set_combo(&self, side: ComboSide, vks: Vec<u32>) {
        let _ = self
            .combo_slot(side)
            .swap((Some(Shared::new(vks)), Tag::None), Ordering::Release);
    }

    pub fn clear_combo(&self, side: ComboSide) {
        self.set_combo(side, Vec::new());
    }

    /// Replaces both sides at once (preset selection).
    pub fn apply_preset(&self, up: Vec<u32>, down: Vec<u32>) {
        self.set_combo(ComboSide::Up, up);
        self.set_combo(ComboSide::Down, down);
    }

    #[inline]
    fn combo_slot(&self, side: ComboSide) -> &AtomicShared<Vec<u32>> {
        match side {
            ComboSide::Up => &self.up_keys,
            ComboSide::Down => &self.down_keys,
        }
    }

    #[inline(always)]
    pub fn scroll_speed(&self) -> u32 {
        self.scroll_speed.load(Ordering::Relaxed)
    }

    /// Sets the scroll speed. Out-of-range values are rejected and leave the
    /// current speed unchanged.
    pub fn set_scroll_speed(&self, speed: u32) -> anyhow::Result<()> {
        if !(MIN_SCROLL_SPEED..=MAX_SCROLL_SPEED).contains(&speed) {
            anyhow::bail!(
                "Invalid scroll speed {}: must be between {} and {}",
                speed,
                MIN_SCROLL_SPEED,
                MAX_SCROLL_SPEED
            );
        }
        self.scroll_speed.store(speed, Ordering::Relaxed);
        Ok(())
    }

    /// Checks that activation is allowed with the current combos.
    ///
    /// With both sides empty a hook would intercept every keystroke and never
    /// emit anything, so activation is refused before any hook is installed.
    pub fn validate_activation(&self) -> anyhow::Result<()> {
        if self.combo_keys(ComboSide::Up).is_empty() && self.combo_keys(ComboSide::Down).is_empty()
        {
            anyhow::bail!("Both scroll combos are empty. Record at least one key combination.");
        }
        Ok(())
    }

    #[inline(always)]
    pub fn is_active(&self) -> bool {
        self.is_active.load(Ordering::Relaxed)
    }

    pub fn set_active(&self, active: bool) {
        self.is_active.store(active, Ordering::Relaxed);
        // Both transitions start from an empty set: keys the hook inserted
        // while a previous stop was in flight must not count as held later.
        self.pressed_keys.clear_sync();
    }

    /// Records the hook thread's id so Stop/exit can reach its message loop.
    pub fn set_hook_thread_id(&self, thread_id: u32) {
        self.hook_thread_id.store(thread_id, Ordering::Release);
    }

    pub fn clear_hook_thread_id(&self) {
        self.hook_thread_id.store(0, Ordering::Release);
    }

    #[inline(always)]
    pub fn hook_is_installed(&self) -> bool {
        self.hook_thread_id.load(Ordering::Acquire) != 0
    }

    /// Asks the hook thread's message loop to quit, which uninstalls the hook.
    ///
    /// The thread id is taken exactly once, so repeated calls (Stop followed
    /// by exit, or exit from several paths) are no-ops after the first.
    pub fn request_hook_stop(&self) {
        let thread_id = self.hook_thread_id.swap(0, Ordering::AcqRel);
        if thread_id != 0 {
            unsafe {
                let _ = PostThreadMessageA(thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
            }
        }
    }

    /// Signals the application to exit and releases the hook.
    pub fn exit(&self) {
        self.should_exit.store(true, Ordering::Relaxed);
        self.set_active(false);
        self.request_hook_stop();
    }

    #[inline(always)]
    pub fn should_exit(&self) -> bool {
        self.should_exit.load(Ordering::Relaxed)
    }

    pub fn show_tray_icon(&self) -> bool {
        self.show_tray_icon.load(Ordering::Relaxed)
    }

    pub fn show_notifications(&self) -> bool {
        self.show_notifications.load(Ordering::Relaxed)
    }

    /// Requests the main window to be shown (from the tray thread).
    pub fn request_show_window(&self) {
        self.show_window_requested.store(true, Ordering::Relaxed);
    }

    /// Checks and clears the show window request flag.
    pub fn check_and_clear_show_window_request(&self) -> bool {
        self.show_window_requested.swap(false, Ordering::Relaxed)
    }

    /// Sets the notification event sender.
    pub fn set_notification_sender(&self, sender: Sender<NotificationEvent>) {
        let _ = self.notification_sender.set(sender);
    }

    /// Sends a notification to the tray thread, if notifications are enabled.
    pub fn notify(&self, event: NotificationEvent) {
        if !self.show_notifications() {
            return;
        }
        if let Some(sender) = self.notification_sender.get() {
            let _ = sender.send(event);
        }
    }
}

pub fn set_global_state(state: Arc<AppState>) -> Result<(), Arc<AppState>> {
    GLOBAL_STATE.set(state)
}

pub fn get_global_state() -> Option<&'static Arc<AppState>> {
    GLOBAL_STATE.get()
}
