use engine::{Control, InputAction};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ScriptError {
    #[error("step {step}: unknown action `{name}`")]
    UnknownAction { step: usize, name: String },
    #[error("step {step}: invalid tick count `{raw}`")]
    InvalidCount { step: usize, raw: String },
}

/// Held buttons replayed tick by tick. Written as `right+jump*20,idle*5`;
/// a step without `*n` lasts one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct InputScript {
    steps: Vec<(Control, u64)>,
}

impl InputScript {
    pub(crate) fn parse(raw: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        for (step, entry) in raw.split(',').map(str::trim).enumerate() {
            if entry.is_empty() {
                continue;
            }
            let (buttons, count) = match entry.split_once('*') {
                Some((buttons, count)) => {
                    let count = count.trim().parse::<u64>().map_err(|_| {
                        ScriptError::InvalidCount {
                            step,
                            raw: count.to_string(),
                        }
                    })?;
                    (buttons, count)
                }
                None => (entry, 1),
            };
            let mut control = Control::empty();
            for name in buttons.split('+').map(str::trim) {
                if name.is_empty() || name == "idle" {
                    continue;
                }
                let action = action_named(name).ok_or_else(|| ScriptError::UnknownAction {
                    step,
                    name: name.to_string(),
                })?;
                control = control.with_action_down(action, true);
            }
            steps.push((control, count));
        }
        Ok(Self { steps })
    }

    /// Buttons held on `tick`; nothing once the script has run out.
    pub(crate) fn control_at(&self, tick: u64) -> Control {
        let mut start = 0;
        for (control, count) in &self.steps {
            if tick < start + count {
                return *control;
            }
            start += count;
        }
        Control::empty()
    }

    pub(crate) fn len_ticks(&self) -> u64 {
        self.steps.iter().map(|(_, count)| count).sum()
    }
}

fn action_named(name: &str) -> Option<InputAction> {
    let action = match name {
        "left" => InputAction::Left,
        "right" => InputAction::Right,
        "up" => InputAction::Up,
        "down" => InputAction::Down,
        "jump" => InputAction::Jump,
        "fire" => InputAction::Fire,
        "restart" => InputAction::Restart,
        "debug" => InputAction::Debug,
        _ => return None,
    };
    Some(action)
}
