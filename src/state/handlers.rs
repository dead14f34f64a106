//! Hook event dispatch: pressed-key bookkeeping and combo evaluation.

use smallvec::SmallVec;

use windows::Win32::UI::WindowsAndMessaging::{
    WM_KEYDOWN, WM_KEYUP, WM_SYSKEYDOWN, WM_SYSKEYUP,
};

use super::AppState;
use crate::keys::{self, WHEEL_DELTA};

/// Decides whether a wheel event should be emitted, and with what delta.
///
/// `up` is checked before `down`: when both combos are satisfied at once only
/// the up event fires. An empty combo never matches, so an empty side means
/// that direction is disabled. Order within a combo is irrelevant, and extra
/// held keys beyond the combo do not prevent a match.
#[inline]
pub fn scroll_emission(up: &[u32], down: &[u32], pressed: &[u32], speed: u32) -> Option<i32> {
    if combo_satisfied(up, pressed) {
        Some(speed as i32 * WHEEL_DELTA)
    } else if combo_satisfied(down, pressed) {
        Some(-(speed as i32) * WHEEL_DELTA)
    } else {
        None
    }
}

#[inline(always)]
fn combo_satisfied(combo: &[u32], pressed: &[u32]) -> bool {
    !combo.is_empty() && combo.iter().all(|vk| pressed.contains(vk))
}

impl AppState {
    /// Handles one raw keyboard event from the hook callback.
    ///
    /// Never blocks and never asks the hook to swallow the event; the
    /// callback always passes the keystroke down the chain. Every key-down,
    /// including OS auto-repeat, re-evaluates the combos, so holding a combo
    /// scrolls continuously at the keyboard repeat rate.
    pub fn handle_key_event(&self, event_type: u32, vk_code: u32) {
        match event_type {
            t if t == WM_KEYDOWN || t == WM_SYSKEYDOWN => self.handle_key_down(vk_code),
            t if t == WM_KEYUP || t == WM_SYSKEYUP => self.handle_key_up(vk_code),
            _ => {}
        }
    }

    #[inline]
    fn handle_key_down(&self, vk_code: u32) {
        // Insert is idempotent; auto-repeat downs leave the set unchanged.
        let _ = self.pressed_keys.insert_sync(vk_code);

        // Side-specific modifiers also satisfy combos configured with the
        // generic CTRL/SHIFT/ALT codes.
        if let Some(generic) = keys::generic_modifier_alias(vk_code) {
            let _ = self.pressed_keys.insert_sync(generic);
        }

        let mut pressed: SmallVec<[u32; 16]> = SmallVec::new();
        self.pressed_keys.iter_sync(|&k| {
            pressed.push(k);
            true
        });

        let up = self.combo_keys(super::ComboSide::Up);
        let down = self.combo_keys(super::ComboSide::Down);

        if let Some(wheel_delta) = scroll_emission(&up, &down, &pressed, self.scroll_speed())
            && self.is_active()
        {
            self.simulate_scroll(wheel_delta);
        }
    }

    #[inline]
    fn handle_key_up(&self, vk_code: u32) {
        // Remove is a no-op when the key was never tracked (e.g. held across
        // hook install).
        let _ = self.pressed_keys.remove_sync(&vk_code);

        // The generic modifier stays pressed until both sides are released.
        if let Some(generic) = keys::generic_modifier_alias(vk_code)
            && let Some(sibling) = keys::sibling_modifier(vk_code)
            && !self.pressed_keys.contains_sync(&sibling)
        {
            let _ = self.pressed_keys.remove_sync(&generic);
        }
    }
}
