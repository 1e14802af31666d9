#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Fire,
    Restart,
    Debug,
}

const ACTION_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    pub const ALL: [InputAction; ACTION_COUNT] = [
        InputAction::Left,
        InputAction::Right,
        InputAction::Up,
        InputAction::Down,
        InputAction::Jump,
        InputAction::Fire,
        InputAction::Restart,
        InputAction::Debug,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::Left => 0,
            InputAction::Right => 1,
            InputAction::Up => 2,
            InputAction::Down => 3,
            InputAction::Jump => 4,
            InputAction::Fire => 5,
            InputAction::Restart => 6,
            InputAction::Debug => 7,
        }
    }
}

/// Button state for one tick, as seen by entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Control {
    states: ActionStates,
}

impl Control {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.states.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.states.set(action, is_down);
        self
    }
}

/// Rising-edge detector. Holding a button fires once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Toggle {
    was_down: bool,
}

impl Toggle {
    pub fn toggle(&mut self, is_down: bool) -> bool {
        let pressed = is_down && !self.was_down;
        self.was_down = is_down;
        pressed
    }
}
