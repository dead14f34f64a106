//! GUI utility functions.

use eframe::egui;
use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;

/// Polls every recordable virtual-key code and returns the ones held down,
/// in a fixed scan order.
///
/// Scanning `GetAsyncKeyState` instead of reading egui key events keeps
/// left/right modifier identity (egui collapses both Ctrl keys into one).
pub fn poll_pressed_vks() -> Vec<u32> {
    const EXTRA_VK_CODES: &[u32] = &[
        // Modifiers, side-specific
        0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0x5B, 0x5C,
        // Navigation and editing
        0x20, 0x0D, 0x09, 0x1B, 0x08, 0x2E, 0x2D, 0x24, 0x23, 0x21, 0x22, 0x26, 0x28, 0x25, 0x27,
        // Lock and special keys
        0x14, 0x90, 0x91, 0x13, 0x2C,
        // OEM punctuation
        0xBA, 0xBB, 0xBC, 0xBD, 0xBE, 0xBF, 0xC0, 0xDB, 0xDC, 0xDD, 0xDE,
    ];

    let mut pressed_keys = Vec::with_capacity(16);

    unsafe {
        for vk in 0x30u32..=0x5A {
            if GetAsyncKeyState(vk as i32) < 0 {
                pressed_keys.push(vk);
            }
        }

        // Numpad and function keys
        for vk in 0x60u32..=0x87 {
            if GetAsyncKeyState(vk as i32) < 0 {
                pressed_keys.push(vk);
            }
        }

        for &vk in EXTRA_VK_CODES {
            if GetAsyncKeyState(vk as i32) < 0 {
                pressed_keys.push(vk);
            }
        }
    }

    pressed_keys
}

/// Loads embedded application icon.
pub fn create_icon() -> egui::IconData {
    const ICON_BYTES: &[u8] = include_bytes!("../../resources/keywheel.ico");

    let icon_dir = ico::IconDir::read(std::io::Cursor::new(ICON_BYTES))
        .expect("Failed to parse embedded icon");

    let entry = icon_dir
        .entries()
        .iter()
        .filter(|e| e.width() >= 32)
        .max_by_key(|e| e.width())
        .or_else(|| icon_dir.entries().first())
        .expect("No icon entries found");

    let image = entry.decode().expect("Failed to decode icon");
    let rgba_data = image.rgba_data().to_vec();

    egui::IconData {
        rgba: rgba_data,
        width: image.width(),
        height: image.height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_icon_basic() {
        let icon = create_icon();

        assert!(icon.width > 0, "Icon width should be positive");
        assert!(icon.height > 0, "Icon height should be positive");
        assert_eq!(
            icon.rgba.len(),
            (icon.width * icon.height * 4) as usize,
            "RGBA data size should match width * height * 4"
        );
    }
}
