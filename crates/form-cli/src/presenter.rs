use std::io::Write;

use form_spec::{Control, ControlKind, FormPayload, Keyboard};

/// Prints prompts and notices for the fill loop.
///
/// Everything goes to the wrapped writer (stderr in the binary) so the
/// submitted values are the only thing on stdout.
pub struct FieldPresenter<W: Write> {
    out: W,
    header_printed: bool,
}

impl<W: Write> FieldPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_printed: false,
        }
    }

    pub fn show_header(&mut self, payload: &FormPayload) -> std::io::Result<()> {
        if self.header_printed {
            return Ok(());
        }
        writeln!(
            self.out,
            "{} field(s); press enter to keep the current value, type 'exit' to abort.",
            payload.controls.len()
        )?;
        self.header_printed = true;
        Ok(())
    }

    pub fn show_prompt(
        &mut self,
        index: usize,
        total: usize,
        control: &Control,
    ) -> std::io::Result<()> {
        let mut line = format!("{}/{} {}", index, total, control.label);
        if let Some(hint) = input_hint(control) {
            line.push(' ');
            line.push_str(&hint);
        }
        if !control.value.is_empty() {
            line.push_str(&format!(" [{}]", control.display_value()));
        } else if control.placeholder != control.label {
            line.push_str(&format!(" <{}>", control.placeholder));
        }
        writeln!(self.out, "{}", line)?;
        if let ControlKind::Picker { options, selected } = &control.kind {
            for (position, option) in options.iter().enumerate() {
                let marker = if *selected == Some(position) { "*" } else { " " };
                writeln!(self.out, "  {} {}. {}", marker, position + 1, option.label)?;
            }
        }
        write!(self.out, "> ")?;
        self.out.flush()
    }

    pub fn show_input_error(&mut self, message: &str) -> std::io::Result<()> {
        writeln!(self.out, "Invalid input: {}", message)
    }

    pub fn show_submit(&mut self, label: &str) -> std::io::Result<()> {
        writeln!(self.out, "{} ✅", label)
    }
}

fn input_hint(control: &Control) -> Option<String> {
    match &control.kind {
        ControlKind::TextInput {
            keyboard: Keyboard::Numeric,
            ..
        } => Some("(number)".to_string()),
        ControlKind::TextInput { masked: true, .. } => Some("(hidden)".to_string()),
        ControlKind::TextInput { .. } => None,
        ControlKind::MultiLineInput { .. } => Some("(use \\n for line breaks)".to_string()),
        ControlKind::Picker { options, .. } if !options.is_empty() => {
            Some(format!("(value, label, or 1-{})", options.len()))
        }
        ControlKind::Picker { .. } => Some("(no options)".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_spec::{
        FieldDescriptor, FieldType, FieldValue, SelectOption, StaticTheme, render_field,
    };

    fn prompt_for(field: &FieldDescriptor, value: &FieldValue) -> String {
        let control = render_field(&StaticTheme::default(), field, value);
        let mut buffer = Vec::new();
        FieldPresenter::new(&mut buffer)
            .show_prompt(2, 5, &control)
            .expect("write");
        String::from_utf8(buffer).expect("utf8")
    }

    #[test]
    fn prompt_masks_password_values() {
        let field = FieldDescriptor::new("password", "Password", FieldType::Password);
        let output = prompt_for(&field, &FieldValue::from("abc"));
        assert!(output.starts_with("2/5 Password (hidden) [***]"));
        assert!(!output.contains("abc"));
    }

    #[test]
    fn prompt_lists_select_options_with_marker() {
        let field = FieldDescriptor::new("level", "Level", FieldType::Select).with_options([
            SelectOption::new("junior", "Junior"),
            SelectOption::new("senior", "Senior"),
        ]);
        let output = prompt_for(&field, &FieldValue::from("senior"));
        assert!(output.contains("(value, label, or 1-2)"));
        assert!(output.contains("    1. Junior"));
        assert!(output.contains("  * 2. Senior"));
    }

    #[test]
    fn prompt_shows_distinct_placeholder() {
        let field = FieldDescriptor::new("email", "Email", FieldType::Text)
            .with_placeholder("you@example.com");
        let output = prompt_for(&field, &FieldValue::default());
        assert!(output.starts_with("2/5 Email <you@example.com>"));
    }
}
