use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Command title followed by aligned `Label: value` rows
#[derive(Debug, Clone)]
pub struct CommandHeader {
    icon: Icon,
    title: String,
    rows: Vec<(String, String)>,
}

impl CommandHeader {
    pub fn new(icon: Icon, title: impl Into<String>) -> Self {
        Self {
            icon,
            title: title.into(),
            rows: Vec::new(),
        }
    }

    pub fn add(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.rows.push((label.into(), value.into()));
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let title = ColoredText::info(self.title.as_str())
            .bold()
            .render(supports_color);
        let mut out = format!(
            "{} {}\n",
            self.icon.colored(supports_color, supports_unicode),
            title
        );

        let width = self.rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, value) in &self.rows {
            let label = ColoredText::dim(format!("{:<width$}", format!("{label}:"), width = width + 1))
                .render(supports_color);
            out.push_str(&format!("  {} {}\n", label, value));
        }
        out
    }
}
