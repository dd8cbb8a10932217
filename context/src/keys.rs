// SPDX-License-Identifier: Apache-2.0

//! The 194-entry key code table (spec.md §3, §9), following the W3C UI
//! Events `code` enumeration. This is a generated array, not a method per
//! key: `KEY_NAMES[code as usize]` gives the code's canonical name, and
//! the `codes` submodule gives each entry a named `u8` constant for
//! callers that want to write `keys::codes::KEY_W` instead of a literal.

/// Canonical W3C UI Events code names, indexed by key code (0..193).
pub const KEY_NAMES: [&str; 194] = [
    "Unidentified",
    "Backquote",
    "Backslash",
    "BracketLeft",
    "BracketRight",
    "Comma",
    "Digit0",
    "Digit1",
    "Digit2",
    "Digit3",
    "Digit4",
    "Digit5",
    "Digit6",
    "Digit7",
    "Digit8",
    "Digit9",
    "Equal",
    "IntlBackslash",
    "IntlRo",
    "IntlYen",
    "KeyA",
    "KeyB",
    "KeyC",
    "KeyD",
    "KeyE",
    "KeyF",
    "KeyG",
    "KeyH",
    "KeyI",
    "KeyJ",
    "KeyK",
    "KeyL",
    "KeyM",
    "KeyN",
    "KeyO",
    "KeyP",
    "KeyQ",
    "KeyR",
    "KeyS",
    "KeyT",
    "KeyU",
    "KeyV",
    "KeyW",
    "KeyX",
    "KeyY",
    "KeyZ",
    "Minus",
    "Period",
    "Quote",
    "Semicolon",
    "Slash",
    "AltLeft",
    "AltRight",
    "Backspace",
    "CapsLock",
    "ContextMenu",
    "ControlLeft",
    "ControlRight",
    "Enter",
    "MetaLeft",
    "MetaRight",
    "ShiftLeft",
    "ShiftRight",
    "Space",
    "Tab",
    "Convert",
    "KanaMode",
    "Lang1",
    "Lang2",
    "Lang3",
    "Lang4",
    "Lang5",
    "NonConvert",
    "Delete",
    "End",
    "Help",
    "Home",
    "Insert",
    "PageDown",
    "PageUp",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowUp",
    "NumLock",
    "Numpad0",
    "Numpad1",
    "Numpad2",
    "Numpad3",
    "Numpad4",
    "Numpad5",
    "Numpad6",
    "Numpad7",
    "Numpad8",
    "Numpad9",
    "NumpadAdd",
    "NumpadBackspace",
    "NumpadClear",
    "NumpadClearEntry",
    "NumpadComma",
    "NumpadDecimal",
    "NumpadDivide",
    "NumpadEnter",
    "NumpadEqual",
    "NumpadHash",
    "NumpadMemoryAdd",
    "NumpadMemoryClear",
    "NumpadMemoryRecall",
    "NumpadMemoryStore",
    "NumpadMemorySubtract",
    "NumpadMultiply",
    "NumpadParenLeft",
    "NumpadParenRight",
    "NumpadStar",
    "NumpadSubtract",
    "Escape",
    "F1",
    "F2",
    "F3",
    "F4",
    "F5",
    "F6",
    "F7",
    "F8",
    "F9",
    "F10",
    "F11",
    "F12",
    "F13",
    "F14",
    "F15",
    "F16",
    "F17",
    "F18",
    "F19",
    "F20",
    "F21",
    "F22",
    "F23",
    "F24",
    "Fn",
    "FnLock",
    "PrintScreen",
    "ScrollLock",
    "Pause",
    "BrowserBack",
    "BrowserFavorites",
    "BrowserForward",
    "BrowserHome",
    "BrowserRefresh",
    "BrowserSearch",
    "BrowserStop",
    "Eject",
    "LaunchApp1",
    "LaunchApp2",
    "LaunchMail",
    "MediaPlayPause",
    "MediaSelect",
    "MediaStop",
    "MediaTrackNext",
    "MediaTrackPrevious",
    "Power",
    "Sleep",
    "AudioVolumeDown",
    "AudioVolumeMute",
    "AudioVolumeUp",
    "WakeUp",
    "Hyper",
    "Super",
    "Turbo",
    "Abort",
    "Resume",
    "Suspend",
    "Again",
    "Copy",
    "Cut",
    "Find",
    "Open",
    "Paste",
    "Props",
    "Select",
    "Undo",
    "Hiragana",
    "Katakana",
    "BrightnessDown",
    "BrightnessUp",
    "MailForward",
    "MailReply",
    "MailSend",
    "MediaFastForward",
    "MediaPause",
    "MediaPlay",
    "MediaRecord",
    "MediaRewind",
];

const _: () = assert!(KEY_NAMES.len() == 194);

/// Named `u8` constants for the key codes used in tests and in the
/// engine's own event-emission helpers. Not every entry in `KEY_NAMES`
/// gets a constant here — only the ones a caller is likely to spell out.
pub mod codes {
    macro_rules! code_const {
        ($name:ident, $code_name:literal) => {
            pub const $name: u8 = {
                let mut i = 0;
                let mut found = 0usize;
                let mut matched = false;
                while i < super::KEY_NAMES.len() {
                    if konst_eq(super::KEY_NAMES[i], $code_name) {
                        found = i;
                        matched = true;
                        break;
                    }
                    i += 1;
                }
                assert!(matched, "unknown key code name");
                found as u8
            };
        };
    }

    const fn konst_eq(a: &str, b: &str) -> bool {
        let a = a.as_bytes();
        let b = b.as_bytes();
        if a.len() != b.len() {
            return false;
        }
        let mut i = 0;
        while i < a.len() {
            if a[i] != b[i] {
                return false;
            }
            i += 1;
        }
        true
    }

    code_const!(KEY_A, "KeyA");
    code_const!(KEY_W, "KeyW");
    code_const!(KEY_S, "KeyS");
    code_const!(KEY_D, "KeyD");
    code_const!(SPACE, "Space");
    code_const!(ENTER, "Enter");
    code_const!(ESCAPE, "Escape");
    code_const!(ARROW_UP, "ArrowUp");
    code_const!(ARROW_DOWN, "ArrowDown");
    code_const!(ARROW_LEFT, "ArrowLeft");
    code_const!(ARROW_RIGHT, "ArrowRight");
    code_const!(SHIFT_LEFT, "ShiftLeft");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_194_entries() {
        assert_eq!(KEY_NAMES.len(), 194);
    }

    #[test]
    fn named_constants_resolve_to_the_right_slot() {
        assert_eq!(KEY_NAMES[codes::KEY_W as usize], "KeyW");
        assert_eq!(KEY_NAMES[codes::SPACE as usize], "Space");
    }
}
