//! Progress cards.
//!
//! Commands may report human-readable progress to a `CardSink`. The sink is
//! write-only: nothing is read back, and omitting it never changes what a
//! command stores.

/// Write-only progress sink handed to commands.
pub trait CardSink: Send {
    fn title(&mut self, title: &str);
    fn line(&mut self, label: &str, value: &str);
}

/// Accumulates a plain-text card.
#[derive(Debug, Default, Clone)]
pub struct TextCard {
    sections: Vec<(String, Vec<(String, String)>)>,
}

impl TextCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (title, lines) in &self.sections {
            out.push_str(title);
            out.push('\n');
            for (label, value) in lines {
                out.push_str(&format!("  {}: {}\n", label, value));
            }
        }
        out
    }
}

impl CardSink for TextCard {
    fn title(&mut self, title: &str) {
        self.sections.push((title.to_string(), Vec::new()));
    }

    fn line(&mut self, label: &str, value: &str) {
        if self.sections.is_empty() {
            self.sections.push((String::new(), Vec::new()));
        }
        if let Some((_, lines)) = self.sections.last_mut() {
            lines.push((label.to_string(), value.to_string()));
        }
    }
}

/// Forwards card output to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingCard;

impl CardSink for TracingCard {
    fn title(&mut self, title: &str) {
        tracing::info!(card = title, "Command started");
    }

    fn line(&mut self, label: &str, value: &str) {
        tracing::info!("{}: {}", label, value);
    }
}
