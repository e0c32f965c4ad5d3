/// Keyboard → command translation.
///
/// Moves are discrete: each arrow press (or terminal auto-repeat) becomes
/// one `Command::Move`. The stride keys are sticky toggles for the next
/// horizontal move only:
///
///   ┌──────┬────────────┬──────────────────────────────────────┐
///   │ Key  │ Stride     │ Notes                                │
///   ├──────┼────────────┼──────────────────────────────────────┤
///   │ j    │ Jump       │ toggling one clears the other two    │
///   │ c    │ Careful    │                                      │
///   │ r    │ RunJump    │ Ctrl-R restarts the campaign instead │
///   └──────┴────────────┴──────────────────────────────────────┘
///
/// Any move resets the toggle, whether or not it was horizontal.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::{Command, MoveDir, Stride};

/// What a key asks the game loop to do.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Input {
    Command(Command),
    Quit,
}

pub struct InputState {
    stride: Stride,
    /// Inputs decoded during the most recent `drain_events()`.
    pending: Vec<Input>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            stride: Stride::Walk,
            pending: Vec::with_capacity(8),
        }
    }

    /// The stride the next horizontal move will use.
    pub fn stride(&self) -> Stride {
        self.stride
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame; returns the decoded inputs in arrival order.
    pub fn drain_events(&mut self) -> Vec<Input> {
        self.pending.clear();
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if let Some(input) = self.map_key(key) {
                    self.pending.push(input);
                }
            }
        }
        std::mem::take(&mut self.pending)
    }

    /// Decode one key event, updating the stride toggle.
    pub fn map_key(&mut self, key: KeyEvent) -> Option<Input> {
        let repeat = match key.kind {
            KeyEventKind::Press => false,
            KeyEventKind::Repeat => true,
            KeyEventKind::Release => return None,
        };
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        if let Some(dir) = arrow(key.code) {
            let stride = std::mem::take(&mut self.stride);
            return Some(Input::Command(Command::Move { dir, stride }));
        }
        // Only arrows auto-repeat; holding a toggle key would flip it back and forth.
        if repeat {
            return None;
        }

        let cmd = match key.code {
            KeyCode::Esc => return Some(Input::Quit),
            KeyCode::Char('c') | KeyCode::Char('C') if ctrl => return Some(Input::Quit),
            KeyCode::Char('a') | KeyCode::Char('A') if ctrl => Command::RestartLevel,
            KeyCode::Char('r') | KeyCode::Char('R') if ctrl => Command::RestartCampaign,
            KeyCode::Char('j') => return self.toggle(Stride::Jump),
            KeyCode::Char('c') => return self.toggle(Stride::Careful),
            KeyCode::Char('r') => return self.toggle(Stride::RunJump),
            KeyCode::Char('s') => Command::Strike,
            KeyCode::Char('k') => Command::CheatKillGuard,
            KeyCode::Enter | KeyCode::Char(' ') => Command::ShowStats,
            KeyCode::Char('L') => Command::CheatNextLevel,
            KeyCode::Char('l') if shift => Command::CheatNextLevel,
            KeyCode::Char('T') => Command::CheatExtraLife,
            KeyCode::Char('t') if shift => Command::CheatExtraLife,
            KeyCode::Char('W') => Command::CheatFloat,
            KeyCode::Char('w') if shift => Command::CheatFloat,
            _ => return None,
        };
        Some(Input::Command(cmd))
    }

    fn toggle(&mut self, stride: Stride) -> Option<Input> {
        self.stride = if self.stride == stride { Stride::Walk } else { stride };
        None
    }
}

fn arrow(code: KeyCode) -> Option<MoveDir> {
    match code {
        KeyCode::Left => Some(MoveDir::Left),
        KeyCode::Right => Some(MoveDir::Right),
        KeyCode::Up => Some(MoveDir::Up),
        KeyCode::Down => Some(MoveDir::Down),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn moved(dir: MoveDir, stride: Stride) -> Option<Input> {
        Some(Input::Command(Command::Move { dir, stride }))
    }

    #[test]
    fn plain_arrow_walks() {
        let mut input = InputState::new();
        assert_eq!(input.map_key(press(KeyCode::Left)), moved(MoveDir::Left, Stride::Walk));
    }

    #[test]
    fn toggle_applies_to_the_next_move_only() {
        let mut input = InputState::new();
        assert_eq!(input.map_key(press(KeyCode::Char('j'))), None);
        assert_eq!(input.stride(), Stride::Jump);
        assert_eq!(input.map_key(press(KeyCode::Right)), moved(MoveDir::Right, Stride::Jump));
        assert_eq!(input.map_key(press(KeyCode::Right)), moved(MoveDir::Right, Stride::Walk));
    }

    #[test]
    fn toggles_are_exclusive_and_flip_off() {
        let mut input = InputState::new();
        input.map_key(press(KeyCode::Char('c')));
        input.map_key(press(KeyCode::Char('r')));
        assert_eq!(input.stride(), Stride::RunJump);
        input.map_key(press(KeyCode::Char('r')));
        assert_eq!(input.stride(), Stride::Walk);
    }

    #[test]
    fn vertical_moves_also_reset_the_toggle() {
        let mut input = InputState::new();
        input.map_key(press(KeyCode::Char('c')));
        input.map_key(press(KeyCode::Up));
        assert_eq!(input.stride(), Stride::Walk);
    }

    #[test]
    fn control_chords() {
        let mut input = InputState::new();
        let ctrl = KeyModifiers::CONTROL;
        assert_eq!(
            input.map_key(with(KeyCode::Char('a'), ctrl)),
            Some(Input::Command(Command::RestartLevel))
        );
        assert_eq!(
            input.map_key(with(KeyCode::Char('r'), ctrl)),
            Some(Input::Command(Command::RestartCampaign))
        );
        assert_eq!(input.stride(), Stride::Walk, "ctrl-r is not the run-jump toggle");
        assert_eq!(input.map_key(with(KeyCode::Char('c'), ctrl)), Some(Input::Quit));
        assert_eq!(input.map_key(press(KeyCode::Esc)), Some(Input::Quit));
    }

    #[test]
    fn shifted_cheats() {
        let mut input = InputState::new();
        let shift = KeyModifiers::SHIFT;
        assert_eq!(
            input.map_key(with(KeyCode::Char('L'), shift)),
            Some(Input::Command(Command::CheatNextLevel))
        );
        assert_eq!(
            input.map_key(with(KeyCode::Char('t'), shift)),
            Some(Input::Command(Command::CheatExtraLife))
        );
        assert_eq!(input.map_key(press(KeyCode::Char('W'))), Some(Input::Command(Command::CheatFloat)));
        assert_eq!(input.map_key(press(KeyCode::Char('l'))), None);
    }

    #[test]
    fn repeats_move_but_do_not_toggle() {
        let mut input = InputState::new();
        let mut repeat = press(KeyCode::Char('j'));
        repeat.kind = KeyEventKind::Repeat;
        assert_eq!(input.map_key(repeat), None);
        assert_eq!(input.stride(), Stride::Walk);

        let mut held = press(KeyCode::Down);
        held.kind = KeyEventKind::Repeat;
        assert_eq!(input.map_key(held), moved(MoveDir::Down, Stride::Walk));

        let mut release = press(KeyCode::Down);
        release.kind = KeyEventKind::Release;
        assert_eq!(input.map_key(release), None);
    }
}
