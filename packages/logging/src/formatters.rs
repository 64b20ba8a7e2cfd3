use crate::{Direction, FlattenLog, FormattedString, LogFormatter, LogInfo, Loglevel, WithColor};
use termcolor::{Color, ColorSpec};

const TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";
const LABEL_WIDTH: usize = 6;

fn label_color(label: &str) -> ColorSpec {
    let mut spec = ColorSpec::new();
    match label {
        "DRIVER" => spec.set_fg(Some(Color::Yellow)),
        "CNTRLR" => spec.set_fg(Some(Color::Green)),
        "NODE" => spec.set_fg(Some(Color::Cyan)),
        _ => spec.set_fg(Some(Color::White)),
    };
    spec.set_bold(true);
    spec
}

fn level_color(level: Loglevel) -> Option<ColorSpec> {
    let mut spec = ColorSpec::new();
    match level {
        Loglevel::Error => spec.set_fg(Some(Color::Red)),
        Loglevel::Warn => spec.set_fg(Some(Color::Yellow)),
        _ => return None,
    };
    Some(spec)
}

fn direction_arrow(direction: Direction) -> &'static str {
    match direction {
        Direction::Inbound => "« ",
        Direction::Outbound => "» ",
        Direction::None => "  ",
    }
}

/// Formats log entries into aligned, colored console columns:
/// `timestamp LABEL « message`
#[derive(Default)]
pub struct ConsoleFormatter;

impl LogFormatter for ConsoleFormatter {
    fn format_log(&self, log: &LogInfo, level: Loglevel) -> Vec<FormattedString> {
        let mut ret: Vec<FormattedString> = Vec::new();

        let timestamp = log.timestamp.format(TIMESTAMP_FORMAT).to_string();
        let prefix_width = timestamp.len() + 1 + LABEL_WIDTH + 1;

        ret.push(format!("{} ", timestamp).into());
        ret.push(
            format!("{:LABEL_WIDTH$} ", log.label).with_color(label_color(log.label)),
        );

        let lines = log.payload.flatten_log();
        let message_color = level_color(level);
        let mut first = true;
        for line in lines {
            let mut text = String::new();
            if first {
                first = false;
            } else {
                text.push('\n');
                text.push_str(&" ".repeat(prefix_width));
            }
            text.push_str(direction_arrow(log.direction));
            if let Some(tag) = &log.secondary_tag {
                text.push_str(&format!("[{}] ", tag));
            }
            text.push_str(&line);
            ret.push(match &message_color {
                Some(color) => text.with_color(color.clone()),
                None => text.into(),
            });
        }
        ret.push("\n".into());

        ret
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::LogPayloadText;

    #[test]
    fn test_format_contains_label_and_message() {
        let log = LogInfo::builder()
            .label("DRIVER")
            .payload(LogPayloadText::new("hello world").into())
            .build();
        let formatted = ConsoleFormatter.format_log(&log, Loglevel::Info);
        let text: String = formatted.iter().map(|f| f.string.as_ref()).collect();
        assert!(text.contains("DRIVER"));
        assert!(text.contains("hello world"));
    }
}
