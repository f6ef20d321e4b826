use super::{Controls, View};

/// Formats views into plain text, for terminals and logs.
pub struct ViewFormatter;

impl ViewFormatter {
    /// Format a view as a multi-line description of what is on screen.
    pub fn format_view(view: &View<'_>) -> String {
        let mut lines = Vec::new();

        match view {
            View::Start { funnel } => {
                lines.push(format!("[{}]", funnel));
                lines.push("  > Start".to_string());
            }
            View::Blank => lines.push("...".to_string()),
            View::Video {
                node_id,
                url,
                overlay,
                muted,
                progress,
                needs_manual_play,
                controls,
            } => {
                let sound = if *muted { "muted" } else { "sound on" };
                lines.push(format!(
                    "[video {}] {} ({}, {}%)",
                    node_id,
                    url.unwrap_or("no source"),
                    sound,
                    Self::format_percent(*progress)
                ));
                if let Some(text) = overlay {
                    lines.push(format!("  \"{}\"", text));
                }
                if *needs_manual_play {
                    lines.push("  > Play".to_string());
                }
                if let Some(controls) = controls {
                    lines.extend(Self::format_controls(controls));
                }
            }
            View::LeadCapture {
                node_id,
                title,
                description,
                fields,
                submit_text,
            } => {
                lines.push(format!(
                    "[form {}] {}",
                    node_id,
                    title.unwrap_or("Your details")
                ));
                if let Some(text) = description {
                    lines.push(format!("  {}", text));
                }
                for field in fields.iter() {
                    let marker = if field.required { "*" } else { "" };
                    lines.push(format!(
                        "  {}{} ({}): ____",
                        field.label, marker, field.input_type
                    ));
                }
                lines.push(format!("  > {}", submit_text));
            }
            View::End {
                node_id,
                title,
                message,
            } => {
                lines.push(format!("[end {}] ✓ {}", node_id, title.unwrap_or("Done")));
                if let Some(text) = message {
                    lines.push(format!("  {}", text));
                }
            }
        }

        lines.join("\n")
    }

    fn format_controls(controls: &Controls<'_>) -> Vec<String> {
        match controls {
            Controls::Button { label, .. } => vec![format!("  > {}", label)],
            Controls::YesNo => vec!["  > Yes   > No".to_string()],
            Controls::Text { value, can_submit } | Controls::Email { value, can_submit } => {
                let submit = if *can_submit { "> Send" } else { "(send disabled)" };
                vec![format!("  [{}] {}", value, submit)]
            }
            Controls::Rating { selected } => {
                let stars: String = (1..=5)
                    .map(|n| if Some(n) <= *selected { '★' } else { '☆' })
                    .collect();
                vec![format!("  {}", stars)]
            }
            Controls::MultipleChoice { options } => options
                .iter()
                .enumerate()
                .map(|(i, option)| format!("  {}) {}", i, option.label))
                .collect(),
        }
    }

    /// Format a percentage, dropping the fraction when it is whole.
    fn format_percent(value: f64) -> String {
        if value.fract() == 0.0 {
            format!("{}", value as i64)
        } else {
            format!("{:.1}", value)
        }
    }
}
