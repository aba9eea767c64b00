use super::KeyInput;

/// One text slot per required environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretForm {
    fields: Vec<SecretField>,
    focus: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Continue,
    Submit,
}

impl SecretForm {
    /// Slots in declaration order; repeated names share one slot.
    pub fn new(names: &[String]) -> Self {
        let mut fields: Vec<SecretField> = Vec::with_capacity(names.len());
        for name in names {
            if !fields.iter().any(|field| &field.name == name) {
                fields.push(SecretField {
                    name: name.clone(),
                    value: String::new(),
                });
            }
        }
        Self { fields, focus: 0 }
    }

    pub fn fields(&self) -> &[SecretField] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    pub fn handle_key(&mut self, key: KeyInput) -> FormAction {
        let len = self.fields.len();
        if len == 0 {
            return FormAction::Submit;
        }
        match key {
            KeyInput::Char(c) => self.fields[self.focus].value.push(c),
            KeyInput::Backspace => {
                self.fields[self.focus].value.pop();
            }
            KeyInput::Tab | KeyInput::Down => self.focus = (self.focus + 1) % len,
            KeyInput::BackTab | KeyInput::Up => self.focus = (self.focus + len - 1) % len,
            KeyInput::Enter => {
                if self.focus + 1 == len {
                    return FormAction::Submit;
                }
                self.focus += 1;
            }
        }
        FormAction::Continue
    }

    pub fn into_values(self) -> Vec<(String, String)> {
        self.fields
            .into_iter()
            .map(|field| (field.name, field.value))
            .collect()
    }
}
