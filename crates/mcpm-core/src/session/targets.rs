use super::KeyInput;
use crate::client::TargetHost;
use crate::types::ConfigScope;

/// Checkbox list over every known host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPicker {
    options: Vec<TargetOption>,
    cursor: usize,
    scope: ConfigScope,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOption {
    pub host: TargetHost,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerAction {
    Continue,
    Confirm,
}

impl TargetPicker {
    pub fn new(preselected: &[TargetHost], scope: ConfigScope) -> Self {
        let options = TargetHost::ALL
            .into_iter()
            .map(|host| TargetOption {
                host,
                selected: preselected.contains(&host),
            })
            .collect();
        Self {
            options,
            cursor: 0,
            scope,
        }
    }

    pub fn options(&self) -> &[TargetOption] {
        &self.options
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scope(&self) -> ConfigScope {
        self.scope
    }

    /// Row label, e.g. "Claude Code (Current Dir)".
    pub fn label(&self, option: &TargetOption) -> String {
        format!("{} ({})", option.host.display_name(), self.scope.label())
    }

    /// Checked hosts in registry order.
    pub fn selected(&self) -> Vec<TargetHost> {
        self.options
            .iter()
            .filter(|option| option.selected)
            .map(|option| option.host)
            .collect()
    }

    pub fn handle_key(&mut self, key: KeyInput) -> PickerAction {
        match key {
            KeyInput::Up | KeyInput::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyInput::Down | KeyInput::Char('j') => {
                if self.cursor + 1 < self.options.len() {
                    self.cursor += 1;
                }
            }
            KeyInput::Char(' ') => {
                if let Some(option) = self.options.get_mut(self.cursor) {
                    option.selected = !option.selected;
                }
            }
            KeyInput::Enter => return PickerAction::Confirm,
            _ => {}
        }
        PickerAction::Continue
    }
}
