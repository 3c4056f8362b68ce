//! Modal axis and feed state carried between commands.

use crate::toolpath::Parameters;

/// Last values seen for X, Y, Z and F, in toolpath units.
///
/// `None` means the value has never been set during this run, so the first
/// occurrence of any axis is always emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModalState {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub feed: Option<f64>,
}

impl ModalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracked value for a modal code (`X`, `Y`, `Z` or `F`)
    pub fn get(&self, code: char) -> Option<f64> {
        match code {
            'X' => self.x,
            'Y' => self.y,
            'Z' => self.z,
            'F' => self.feed,
            _ => None,
        }
    }

    /// True when `value` is exactly what was last seen for `code`.
    pub fn is_unchanged(&self, code: char, value: f64) -> bool {
        self.get(code) == Some(value)
    }

    /// Take the raw X/Y/Z/F values present in a processed command.
    pub fn refresh(&mut self, parameters: &Parameters) {
        for (&code, &value) in parameters {
            match code {
                'X' => self.x = Some(value),
                'Y' => self.y = Some(value),
                'Z' => self.z = Some(value),
                'F' => self.feed = Some(value),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolpath::Command;

    #[test]
    fn starts_untracked() {
        let state = ModalState::new();
        assert_eq!(state.get('X'), None);
        assert!(!state.is_unchanged('X', 0.0));
        assert!(!state.is_unchanged('F', 0.0));
    }

    #[test]
    fn refresh_only_touches_present_modal_codes() {
        let mut state = ModalState::new();
        state.refresh(&Command::new("G0").param('X', 1.0).param('Z', 5.0).parameters);
        state.refresh(&Command::new("G1").param('Y', 2.0).param('S', 900.0).parameters);

        assert_eq!(
            state,
            ModalState {
                x: Some(1.0),
                y: Some(2.0),
                z: Some(5.0),
                feed: None,
            }
        );
        assert!(state.is_unchanged('X', 1.0));
        assert!(!state.is_unchanged('S', 900.0));
    }
}
