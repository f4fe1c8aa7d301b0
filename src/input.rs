use anyhow::{Result, bail};
use raylib::prelude::*;

use crate::config::ControlSettings;

/// Everything the presenter can be asked to do from keyboard or gamepad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextSlide,
    PreviousSlide,
    OpenSource,
    StartTimer,
    PauseTimer,
    ResetTimer,
}

const GAMEPAD: i32 = 0;

const KEY_NAMES: &[(&str, KeyboardKey)] = &[
    ("RIGHT", KeyboardKey::KEY_RIGHT),
    ("LEFT", KeyboardKey::KEY_LEFT),
    ("UP", KeyboardKey::KEY_UP),
    ("DOWN", KeyboardKey::KEY_DOWN),
    ("ENTER", KeyboardKey::KEY_ENTER),
    ("KP_ENTER", KeyboardKey::KEY_KP_ENTER),
    ("SPACE", KeyboardKey::KEY_SPACE),
    ("TAB", KeyboardKey::KEY_TAB),
    ("BACKSPACE", KeyboardKey::KEY_BACKSPACE),
    ("PAGE_UP", KeyboardKey::KEY_PAGE_UP),
    ("PAGE_DOWN", KeyboardKey::KEY_PAGE_DOWN),
    ("HOME", KeyboardKey::KEY_HOME),
    ("END", KeyboardKey::KEY_END),
    ("A", KeyboardKey::KEY_A),
    ("B", KeyboardKey::KEY_B),
    ("C", KeyboardKey::KEY_C),
    ("D", KeyboardKey::KEY_D),
    ("E", KeyboardKey::KEY_E),
    ("F", KeyboardKey::KEY_F),
    ("G", KeyboardKey::KEY_G),
    ("H", KeyboardKey::KEY_H),
    ("I", KeyboardKey::KEY_I),
    ("J", KeyboardKey::KEY_J),
    ("K", KeyboardKey::KEY_K),
    ("L", KeyboardKey::KEY_L),
    ("M", KeyboardKey::KEY_M),
    ("N", KeyboardKey::KEY_N),
    ("O", KeyboardKey::KEY_O),
    ("P", KeyboardKey::KEY_P),
    ("Q", KeyboardKey::KEY_Q),
    ("R", KeyboardKey::KEY_R),
    ("S", KeyboardKey::KEY_S),
    ("T", KeyboardKey::KEY_T),
    ("U", KeyboardKey::KEY_U),
    ("V", KeyboardKey::KEY_V),
    ("W", KeyboardKey::KEY_W),
    ("X", KeyboardKey::KEY_X),
    ("Y", KeyboardKey::KEY_Y),
    ("Z", KeyboardKey::KEY_Z),
    ("F1", KeyboardKey::KEY_F1),
    ("F2", KeyboardKey::KEY_F2),
    ("F3", KeyboardKey::KEY_F3),
    ("F4", KeyboardKey::KEY_F4),
    ("F5", KeyboardKey::KEY_F5),
    ("F6", KeyboardKey::KEY_F6),
    ("F7", KeyboardKey::KEY_F7),
    ("F8", KeyboardKey::KEY_F8),
    ("F9", KeyboardKey::KEY_F9),
    ("F10", KeyboardKey::KEY_F10),
    ("F11", KeyboardKey::KEY_F11),
    ("F12", KeyboardKey::KEY_F12),
];

const BUTTON_NAMES: &[(&str, GamepadButton)] = &[
    ("RIGHT_FACE_DOWN", GamepadButton::GAMEPAD_BUTTON_RIGHT_FACE_DOWN),
    ("RIGHT_FACE_LEFT", GamepadButton::GAMEPAD_BUTTON_RIGHT_FACE_LEFT),
    ("RIGHT_FACE_RIGHT", GamepadButton::GAMEPAD_BUTTON_RIGHT_FACE_RIGHT),
    ("RIGHT_FACE_UP", GamepadButton::GAMEPAD_BUTTON_RIGHT_FACE_UP),
    ("LEFT_FACE_DOWN", GamepadButton::GAMEPAD_BUTTON_LEFT_FACE_DOWN),
    ("LEFT_FACE_LEFT", GamepadButton::GAMEPAD_BUTTON_LEFT_FACE_LEFT),
    ("LEFT_FACE_RIGHT", GamepadButton::GAMEPAD_BUTTON_LEFT_FACE_RIGHT),
    ("LEFT_FACE_UP", GamepadButton::GAMEPAD_BUTTON_LEFT_FACE_UP),
    ("LEFT_TRIGGER_1", GamepadButton::GAMEPAD_BUTTON_LEFT_TRIGGER_1),
    ("LEFT_TRIGGER_2", GamepadButton::GAMEPAD_BUTTON_LEFT_TRIGGER_2),
    ("RIGHT_TRIGGER_1", GamepadButton::GAMEPAD_BUTTON_RIGHT_TRIGGER_1),
    ("RIGHT_TRIGGER_2", GamepadButton::GAMEPAD_BUTTON_RIGHT_TRIGGER_2),
    ("MIDDLE_LEFT", GamepadButton::GAMEPAD_BUTTON_MIDDLE_LEFT),
    ("MIDDLE_RIGHT", GamepadButton::GAMEPAD_BUTTON_MIDDLE_RIGHT),
    ("LEFT_THUMB", GamepadButton::GAMEPAD_BUTTON_LEFT_THUMB),
    ("RIGHT_THUMB", GamepadButton::GAMEPAD_BUTTON_RIGHT_THUMB),
];

pub fn parse_key(name: &str) -> Option<KeyboardKey> {
    KEY_NAMES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name.trim()))
        .map(|(_, key)| *key)
}

pub fn parse_button(name: &str) -> Option<GamepadButton> {
    BUTTON_NAMES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name.trim()))
        .map(|(_, button)| *button)
}

/// Maps pressed keys and buttons to actions, one action per press.
pub struct InputRouter {
    keys: Vec<(KeyboardKey, Action)>,
    buttons: Vec<(GamepadButton, Action)>,
}

impl InputRouter {
    /// Empty names leave an action unbound; unknown names are rejected.
    pub fn from_config(controls: &ControlSettings) -> Result<Self> {
        let keys = &controls.keys;
        let pad = &controls.gamepad;

        let mut router = Self {
            keys: Vec::new(),
            buttons: Vec::new(),
        };
        for (name, action) in [
            (&keys.next, Action::NextSlide),
            (&keys.previous, Action::PreviousSlide),
            (&keys.open_source, Action::OpenSource),
            (&keys.start_timer, Action::StartTimer),
            (&keys.pause_timer, Action::PauseTimer),
            (&keys.reset_timer, Action::ResetTimer),
        ] {
            if name.trim().is_empty() {
                continue;
            }
            match parse_key(name) {
                Some(key) => router.keys.push((key, action)),
                None => bail!("unknown key {name:?} bound to {action:?}"),
            }
        }
        for (name, action) in [
            (&pad.next, Action::NextSlide),
            (&pad.previous, Action::PreviousSlide),
            (&pad.open_source, Action::OpenSource),
        ] {
            if name.trim().is_empty() {
                continue;
            }
            match parse_button(name) {
                Some(button) => router.buttons.push((button, action)),
                None => bail!("unknown gamepad button {name:?} bound to {action:?}"),
            }
        }
        Ok(router)
    }

    pub fn poll(&self, rl: &RaylibHandle) -> Vec<Action> {
        let mut actions: Vec<Action> = self
            .keys
            .iter()
            .filter(|(key, _)| rl.is_key_pressed(*key))
            .map(|(_, action)| *action)
            .collect();

        if rl.is_gamepad_available(GAMEPAD) {
            actions.extend(
                self.buttons
                    .iter()
                    .filter(|(button, _)| rl.is_gamepad_button_pressed(GAMEPAD, *button))
                    .map(|(_, action)| *action),
            );
        }
        actions
    }

    /// Gamepad buttons that close the source prompt. The prompt takes the
    /// keyboard for typing, so only the button that opened it backs out.
    pub fn dialog_cancel_buttons(&self) -> impl Iterator<Item = GamepadButton> + '_ {
        self.buttons
            .iter()
            .filter(|(_, action)| *action == Action::OpenSource)
            .map(|(button, _)| *button)
    }

    pub fn dialog_cancel_pressed(&self, rl: &RaylibHandle) -> bool {
        rl.is_gamepad_available(GAMEPAD)
            && self
                .dialog_cancel_buttons()
                .any(|button| rl.is_gamepad_button_pressed(GAMEPAD, button))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GamepadBindings, KeyBindings};

    #[test]
    fn default_bindings_parse() {
        let router = InputRouter::from_config(&ControlSettings::default()).unwrap();
        assert_eq!(router.keys.len(), 6);
        assert_eq!(router.buttons.len(), 3);
        assert!(router.keys.contains(&(KeyboardKey::KEY_RIGHT, Action::NextSlide)));
        assert!(
            router
                .buttons
                .contains(&(GamepadButton::GAMEPAD_BUTTON_RIGHT_FACE_RIGHT, Action::OpenSource))
        );
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(parse_key("page_down"), Some(KeyboardKey::KEY_PAGE_DOWN));
        assert_eq!(parse_button(" left_trigger_1 "), Some(GamepadButton::GAMEPAD_BUTTON_LEFT_TRIGGER_1));
    }

    #[test]
    fn blank_binding_leaves_action_unbound() {
        let controls = ControlSettings {
            keys: KeyBindings {
                reset_timer: String::new(),
                ..KeyBindings::default()
            },
            gamepad: GamepadBindings {
                open_source: String::new(),
                ..GamepadBindings::default()
            },
        };
        let router = InputRouter::from_config(&controls).unwrap();
        assert_eq!(router.keys.len(), 5);
        assert_eq!(router.buttons.len(), 2);
        assert_eq!(router.dialog_cancel_buttons().count(), 0);
    }

    #[test]
    fn open_source_button_cancels_the_prompt() {
        let router = InputRouter::from_config(&ControlSettings::default()).unwrap();
        let cancel: Vec<_> = router.dialog_cancel_buttons().collect();
        assert_eq!(cancel, [GamepadButton::GAMEPAD_BUTTON_RIGHT_FACE_RIGHT]);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let controls = ControlSettings {
            keys: KeyBindings {
                next: "HYPER".into(),
                ..KeyBindings::default()
            },
            ..ControlSettings::default()
        };
        assert!(InputRouter::from_config(&controls).is_err());
    }
}
