//! Virtual-key code naming and parsing.
//!
//! Display names are what the GUI shows while recording and in the combo
//! labels; parsing is used for the key names in `Config.toml`.

/// One wheel notch, as defined by the platform (`WHEEL_DELTA`).
pub const WHEEL_DELTA: i32 = 120;

pub const VK_RETURN: u32 = 0x0D;
pub const VK_ESCAPE: u32 = 0x1B;
pub const VK_PAUSE: u32 = 0x13;
pub const VK_CAPITAL: u32 = 0x14;
pub const VK_INSERT: u32 = 0x2D;
pub const VK_SCROLL: u32 = 0x91;
pub const VK_OEM_4: u32 = 0xDB; // [{
pub const VK_OEM_6: u32 = 0xDD; // ]}

/// Converts a virtual-key code to the label shown to the user.
///
/// Left/right modifiers are kept distinct, lock keys get their common names,
/// and OEM punctuation keys are named by their US-layout symbol. Anything
/// unrecognized falls back to a hex rendering.
pub fn display_name(vk: u32) -> String {
    match vk {
        // A-Z and 0-9 map straight to their character
        0x30..=0x39 | 0x41..=0x5A => char::from_u32(vk).unwrap().to_string(),
        0x60..=0x69 => format!("Numpad{}", vk - 0x60),
        0x70..=0x87 => format!("F{}", vk - 0x70 + 1),
        // Modifiers
        0xA0 => "LShift".to_string(),
        0xA1 => "RShift".to_string(),
        0xA2 => "LCtrl".to_string(),
        0xA3 => "RCtrl".to_string(),
        0xA4 => "LAlt".to_string(),
        0xA5 => "RAlt".to_string(),
        0x10 => "Shift".to_string(),
        0x11 => "Ctrl".to_string(),
        0x12 => "Alt".to_string(),
        0x5B => "LWin".to_string(),
        0x5C => "RWin".to_string(),
        // Lock and rarely-used keys (the recommended combo keys)
        0x91 => "ScrollLock".to_string(),
        0x13 => "Pause".to_string(),
        0x14 => "CapsLock".to_string(),
        0x90 => "NumLock".to_string(),
        0x2C => "PrintScreen".to_string(),
        // Navigation
        0x20 => "Space".to_string(),
        0x0D => "Enter".to_string(),
        0x09 => "Tab".to_string(),
        0x1B => "Esc".to_string(),
        0x08 => "Backspace".to_string(),
        0x2E => "Delete".to_string(),
        0x2D => "Insert".to_string(),
        0x24 => "Home".to_string(),
        0x23 => "End".to_string(),
        0x21 => "PageUp".to_string(),
        0x22 => "PageDown".to_string(),
        0x26 => "Up".to_string(),
        0x28 => "Down".to_string(),
        0x25 => "Left".to_string(),
        0x27 => "Right".to_string(),
        // OEM punctuation, named by symbol
        0xBA => ";".to_string(),
        0xBB => "=".to_string(),
        0xBC => ",".to_string(),
        0xBD => "-".to_string(),
        0xBE => ".".to_string(),
        0xBF => "/".to_string(),
        0xC0 => "`".to_string(),
        0xDB => "[".to_string(),
        0xDC => "\\".to_string(),
        0xDD => "]".to_string(),
        0xDE => "'".to_string(),
        _ => format!("VK_{:02X}", vk),
    }
}

/// Parses a key name from the configuration file into a virtual-key code.
pub fn key_name_to_vk(key_name: &str) -> Option<u32> {
    let key = key_name.trim().to_uppercase();

    if key.len() == 1
        && let Some(c) = key.chars().next()
    {
        if c.is_ascii_alphanumeric() {
            return Some(c as u32);
        }
        // Punctuation spellings match the display names
        return match c {
            ';' => Some(0xBA),
            '=' => Some(0xBB),
            ',' => Some(0xBC),
            '-' => Some(0xBD),
            '.' => Some(0xBE),
            '/' => Some(0xBF),
            '`' => Some(0xC0),
            '[' => Some(0xDB),
            '\\' => Some(0xDC),
            ']' => Some(0xDD),
            '\'' => Some(0xDE),
            _ => None,
        };
    }

    // F1-F24
    if let Some(rest) = key.strip_prefix('F')
        && let Ok(num) = rest.parse::<u32>()
        && (1..=24).contains(&num)
    {
        return Some(0x70 + num - 1);
    }

    // Numpad digits
    if let Some(rest) = key.strip_prefix("NUMPAD")
        && let Ok(num) = rest.parse::<u32>()
        && num <= 9
    {
        return Some(0x60 + num);
    }

    match key.as_str() {
        "ESC" | "ESCAPE" => Some(0x1B),
        "ENTER" | "RETURN" => Some(0x0D),
        "TAB" => Some(0x09),
        "SPACE" => Some(0x20),
        "BACKSPACE" | "BACK" => Some(0x08),
        "DELETE" => Some(0x2E),
        "INSERT" => Some(0x2D),
        "HOME" => Some(0x24),
        "END" => Some(0x23),
        "PAGEUP" => Some(0x21),
        "PAGEDOWN" => Some(0x22),
        "UP" => Some(0x26),
        "DOWN" => Some(0x28),
        "LEFT" => Some(0x25),
        "RIGHT" => Some(0x27),
        "SHIFT" => Some(0x10),
        "CTRL" => Some(0x11),
        "ALT" => Some(0x12),
        "LSHIFT" => Some(0xA0),
        "RSHIFT" => Some(0xA1),
        "LCTRL" => Some(0xA2),
        "RCTRL" => Some(0xA3),
        "LALT" => Some(0xA4),
        "RALT" => Some(0xA5),
        "LWIN" => Some(0x5B),
        "RWIN" => Some(0x5C),
        "CAPSLOCK" | "CAPITAL" => Some(0x14),
        "NUMLOCK" => Some(0x90),
        "SCROLL" | "SCROLLLOCK" => Some(0x91),
        "PAUSE" => Some(0x13),
        "PRINTSCREEN" | "SNAPSHOT" => Some(0x2C),
        _ => None,
    }
}

/// Joins key display names with " + " in the given order.
pub fn join_display_names(vks: &[u32]) -> String {
    let mut out = String::with_capacity(vks.len() * 8);
    for (i, &vk) in vks.iter().enumerate() {
        if i > 0 {
            out.push_str(" + ");
        }
        out.push_str(&display_name(vk));
    }
    out
}

/// Maps a side-specific modifier vk to its generic counterpart.
///
/// The low-level hook reports LCTRL/RCTRL etc., while combos may be
/// configured with the generic CTRL/SHIFT/ALT codes; the generic alias is
/// mirrored into the pressed set so both spellings match.
#[inline(always)]
pub fn generic_modifier_alias(vk: u32) -> Option<u32> {
    match vk {
        0xA0 | 0xA1 => Some(0x10),
        0xA2 | 0xA3 => Some(0x11),
        0xA4 | 0xA5 => Some(0x12),
        _ => None,
    }
}

/// Returns the opposite-side modifier for a side-specific modifier vk.
#[inline(always)]
pub fn sibling_modifier(vk: u32) -> Option<u32> {
    match vk {
        0xA0 => Some(0xA1),
        0xA1 => Some(0xA0),
        0xA2 => Some(0xA3),
        0xA3 => Some(0xA2),
        0xA4 => Some(0xA5),
        0xA5 => Some(0xA4),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_modifiers_are_side_specific() {
        assert_eq!(display_name(0xA2), "LCtrl");
        assert_eq!(display_name(0xA3), "RCtrl");
        assert_eq!(display_name(0xA0), "LShift");
        assert_eq!(display_name(0xA1), "RShift");
        assert_eq!(display_name(0xA4), "LAlt");
        assert_eq!(display_name(0xA5), "RAlt");
    }

    #[test]
    fn test_display_name_lock_keys() {
        assert_eq!(display_name(VK_SCROLL), "ScrollLock");
        assert_eq!(display_name(VK_PAUSE), "Pause");
        assert_eq!(display_name(VK_CAPITAL), "CapsLock");
    }

    #[test]
    fn test_display_name_punctuation_by_symbol() {
        assert_eq!(display_name(VK_OEM_4), "[");
        assert_eq!(display_name(VK_OEM_6), "]");
        assert_eq!(display_name(0xBD), "-");
        assert_eq!(display_name(0xBB), "=");
    }

    #[test]
    fn test_display_name_fallback_is_hex() {
        assert_eq!(display_name(0xE8), "VK_E8");
        assert_eq!(display_name(0x07), "VK_07");
    }

    #[test]
    fn test_key_name_round_trip() {
        for name in ["A", "9", "F12", "NUMPAD4", "SCROLL", "PAUSE", "LCTRL"] {
            let vk = key_name_to_vk(name).expect("known key name must parse");
            assert!(key_name_to_vk(&display_name(vk)).is_some());
        }
    }

    #[test]
    fn test_key_name_to_vk_case_insensitive() {
        assert_eq!(key_name_to_vk("scroll"), Some(VK_SCROLL));
        assert_eq!(key_name_to_vk("ScrollLock"), Some(VK_SCROLL));
        assert_eq!(key_name_to_vk("pause"), Some(VK_PAUSE));
        assert_eq!(key_name_to_vk("a"), Some(0x41));
    }

    #[test]
    fn test_key_name_to_vk_symbols() {
        assert_eq!(key_name_to_vk("["), Some(VK_OEM_4));
        assert_eq!(key_name_to_vk("]"), Some(VK_OEM_6));
    }

    #[test]
    fn test_key_name_to_vk_rejects_unknown() {
        assert_eq!(key_name_to_vk("NOTAKEY"), None);
        assert_eq!(key_name_to_vk(""), None);
        assert_eq!(key_name_to_vk("F99"), None);
    }

    #[test]
    fn test_join_display_names_preserves_order() {
        assert_eq!(join_display_names(&[0xA2, 0x41]), "LCtrl + A");
        assert_eq!(join_display_names(&[]), "");
        assert_eq!(join_display_names(&[VK_SCROLL]), "ScrollLock");
    }

    #[test]
    fn test_generic_modifier_alias() {
        assert_eq!(generic_modifier_alias(0xA2), Some(0x11));
        assert_eq!(generic_modifier_alias(0xA1), Some(0x10));
        assert_eq!(generic_modifier_alias(0xA5), Some(0x12));
        assert_eq!(generic_modifier_alias(0x41), None);
    }

    #[test]
    fn test_sibling_modifier() {
        assert_eq!(sibling_modifier(0xA2), Some(0xA3));
        assert_eq!(sibling_modifier(0xA3), Some(0xA2));
        assert_eq!(sibling_modifier(0x41), None);
    }
}
