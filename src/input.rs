use eframe::egui;

/// User commands the app responds to, from keys or toolbar clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StepBackward,
    StepForward,
    RecordCut,
    OpenFile,
    Quit,
}

/// A single key binding in the dispatch table.
pub struct Binding {
    pub key: egui::Key,
    pub ctrl: bool,
    pub command: Command,
}

/// The full keymap. `[` and `]` step a frame, `s` records a cut; Ctrl+O and
/// Ctrl+Q mirror the File menu accelerators.
pub const KEY_BINDINGS: &[Binding] = &[
    Binding {
        key: egui::Key::OpenBracket,
        ctrl: false,
        command: Command::StepBackward,
    },
    Binding {
        key: egui::Key::CloseBracket,
        ctrl: false,
        command: Command::StepForward,
    },
    Binding {
        key: egui::Key::S,
        ctrl: false,
        command: Command::RecordCut,
    },
    Binding {
        key: egui::Key::O,
        ctrl: true,
        command: Command::OpenFile,
    },
    Binding {
        key: egui::Key::Q,
        ctrl: true,
        command: Command::Quit,
    },
];

/// Resolve a key press against the table. Modifier state must match exactly
/// so Ctrl+S is not read as a plain `s`.
pub fn command_for(key: egui::Key, ctrl: bool) -> Option<Command> {
    KEY_BINDINGS
        .iter()
        .find(|binding| binding.key == key && binding.ctrl == ctrl)
        .map(|binding| binding.command)
}

/// Collect the commands bound to keys pressed this frame.
pub fn pressed_commands(ctx: &egui::Context) -> Vec<Command> {
    ctx.input(|input| {
        input
            .events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => command_for(*key, modifiers.ctrl),
                _ => None,
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::Key;

    #[test]
    fn bracket_keys_step_frames() {
        assert_eq!(command_for(Key::OpenBracket, false), Some(Command::StepBackward));
        assert_eq!(command_for(Key::CloseBracket, false), Some(Command::StepForward));
    }

    #[test]
    fn s_records_a_cut() {
        assert_eq!(command_for(Key::S, false), Some(Command::RecordCut));
        assert_eq!(command_for(Key::S, true), None);
    }

    #[test]
    fn ctrl_accelerators_need_ctrl() {
        assert_eq!(command_for(Key::O, true), Some(Command::OpenFile));
        assert_eq!(command_for(Key::O, false), None);
        assert_eq!(command_for(Key::Q, true), Some(Command::Quit));
    }

    #[test]
    fn unbound_keys_resolve_to_nothing() {
        assert_eq!(command_for(Key::A, false), None);
        assert_eq!(command_for(Key::Space, false), None);
    }
}
