//! Colorful console output for lingdb.
//!
//! Provides a custom `tracing` layer that formats query and dataset events
//! with colors on stderr, leaving stdout free for results.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (datasets loaded, query start/end)
//! - **WARN**: Data problems (missing datapoints, duplicate names)
//! - **DEBUG**: Individual query steps

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Filter used when neither `RUST_LOG` nor the caller provides a usable one.
pub const DEFAULT_FILTER: &str = "lingdb=info";

/// Initializes console output with `filter` as the default directive set.
///
/// Safe to call multiple times - only the first call has effect.
/// `RUST_LOG` overrides `filter` when set.
pub fn init(filter: &str) {
    INIT.get_or_init(|| {
        EPOCH.get_or_init(Instant::now);

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(filter))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(LingDbConsoleLayer)
            .try_init();
    });
}

fn elapsed_secs() -> f64 {
    EPOCH
        .get()
        .map(|epoch| epoch.elapsed().as_secs_f64())
        .unwrap_or(0.0)
}

/// A tracing layer that formats lingdb events with colors.
pub struct LingDbConsoleLayer;

impl<S: Subscriber> Layer<S> for LingDbConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("lingdb") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stderr(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    fields: Vec<(&'static str, FieldValue)>,
}

#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Count(u64),
    Flag(bool),
    Text(String),
}

impl FieldValue {
    fn render(&self) -> String {
        match self {
            FieldValue::Count(n) => n.to_formatted_string(&Locale::en),
            FieldValue::Flag(b) => b.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

impl EventVisitor {
    fn count(&self, name: &str) -> u64 {
        self.fields
            .iter()
            .find_map(|(field, value)| match value {
                FieldValue::Count(n) if *field == name => Some(*n),
                _ => None,
            })
            .unwrap_or(0)
    }

    fn text(&self, name: &str) -> Option<String> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.render())
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        self.record_str(field, &s);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.push((field.name(), FieldValue::Count(value)));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.push((field.name(), FieldValue::Flag(value)));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            name => self.fields.push((name, FieldValue::Text(value.to_string()))),
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "query_start" => format_query_start(v),
        "query_end" => format_query_end(v),
        "query_step" => format_query_step(v, level),
        "dataset_loaded" => format_dataset_loaded(v),
        _ if level <= Level::WARN => format_problem(v, level),
        _ if level == Level::INFO => format_generic(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_query_start(v: &EventVisitor) -> String {
    format!(
        "{} {} Query │ {} steps │ {} languages",
        format_elapsed(),
        "▶".bright_green().bold(),
        v.count("steps").to_formatted_string(&Locale::en).bright_yellow(),
        v.count("languages")
            .to_formatted_string(&Locale::en)
            .bright_yellow(),
    )
}

fn format_query_end(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} Query complete │ {} languages │ {} contexts",
        format_elapsed(),
        "■".bright_cyan().bold(),
        v.count("languages")
            .to_formatted_string(&Locale::en)
            .bright_magenta()
            .bold(),
        v.count("contexts").to_formatted_string(&Locale::en).white(),
    );

    let no_data = v.count("no_data");
    if no_data > 0 {
        output.push_str(&format!(
            " │ {} without data",
            no_data.to_formatted_string(&Locale::en).yellow()
        ));
    }

    output
}

fn format_query_step(v: &EventVisitor, level: Level) -> String {
    if level != Level::DEBUG {
        return String::new();
    }

    let name = v.text("step_name").unwrap_or_else(|| "?".to_string());
    let kind = v.text("kind").unwrap_or_default();

    format!(
        "{} {} Step {:>3} │ {:<20} │ {:<14} │ {} languages",
        format_elapsed(),
        "·".bright_black(),
        v.count("step").to_formatted_string(&Locale::en).bright_black(),
        name.white().bold(),
        kind.bright_black(),
        v.count("languages").to_formatted_string(&Locale::en),
    )
}

fn format_dataset_loaded(v: &EventVisitor) -> String {
    let dataset = v.text("dataset").unwrap_or_else(|| "?".to_string());

    format!(
        "{} {} Dataset {} │ {} languages",
        format_elapsed(),
        "✓".bright_green(),
        dataset.white().bold(),
        v.count("languages")
            .to_formatted_string(&Locale::en)
            .bright_yellow(),
    )
}

fn format_problem(v: &EventVisitor, level: Level) -> String {
    let icon = if level == Level::ERROR {
        "✗".bright_red().bold().to_string()
    } else {
        "!".yellow().bold().to_string()
    };
    let headline = v
        .event
        .clone()
        .or_else(|| v.message.clone())
        .unwrap_or_default();

    format!(
        "{} {} {}{}",
        format_elapsed(),
        icon,
        headline.yellow(),
        format_fields(v)
    )
}

fn format_generic(v: &EventVisitor) -> String {
    let headline = v
        .event
        .clone()
        .or_else(|| v.message.clone())
        .unwrap_or_default();

    format!(
        "{} {} {}{}",
        format_elapsed(),
        "›".bright_blue(),
        headline.white(),
        format_fields(v)
    )
}

fn format_fields(v: &EventVisitor) -> String {
    v.fields
        .iter()
        .map(|(name, value)| format!(" │ {}={}", name.bright_black(), value.render()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(event: &str, fields: Vec<(&'static str, FieldValue)>) -> EventVisitor {
        EventVisitor {
            event: Some(event.to_string()),
            message: None,
            fields,
        }
    }

    #[test]
    fn test_query_end_formats_counts() {
        let v = visitor(
            "query_end",
            vec![
                ("languages", FieldValue::Count(1234)),
                ("contexts", FieldValue::Count(2)),
                ("no_data", FieldValue::Count(3)),
            ],
        );
        let output = format_event(&v, Level::INFO);
        assert!(output.contains("Query complete"));
        assert!(output.contains("1,234"));
        assert!(output.contains("without data"));
    }

    #[test]
    fn test_query_step_only_at_debug() {
        let v = visitor("query_step", vec![("step_name", FieldValue::Text("Get".into()))]);
        assert!(format_event(&v, Level::INFO).is_empty());
        assert!(format_event(&v, Level::DEBUG).contains("Get"));
    }

    #[test]
    fn test_warnings_list_fields() {
        let v = visitor(
            "missing_datapoint",
            vec![
                ("language", FieldValue::Text("English".into())),
                ("step", FieldValue::Count(0)),
            ],
        );
        let output = format_event(&v, Level::WARN);
        assert!(output.contains("missing_datapoint"));
        assert!(output.contains("English"));
    }

    #[test]
    fn test_unknown_debug_events_are_silent() {
        let v = visitor("property_query", vec![]);
        assert!(format_event(&v, Level::DEBUG).is_empty());
    }

    #[test]
    fn test_init_is_idempotent() {
        init("lingdb=debug");
        init("lingdb=trace");
    }
}
