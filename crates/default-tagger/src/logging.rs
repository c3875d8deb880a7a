//! Line-oriented log output
//!
//! Every event is rendered as one line on stdout:
//!
//! ```text
//! INFO:EC2:us-east-1: Tag on vpc-0123,subnet-0456
//! ```
//!
//! The `service` and `region` fields of an event become the second and
//! third segments. Events without them (setup, summary) omit the segment.
//! Remaining fields are appended as `key=value`.

use anyhow::Result;
use std::fmt::{self, Debug};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Filter used when `RUST_LOG` is unset: INFO, with AWS SDK internals
/// capped at WARN
pub const DEFAULT_LOG_FILTER: &str =
    "info,aws_config=warn,aws_smithy_runtime=warn,aws_sdk_ec2=warn,aws_sdk_rds=warn,aws_sdk_sts=warn";

/// Install the global subscriber.
///
/// `RUST_LOG` replaces [`DEFAULT_LOG_FILTER`] entirely when set.
pub fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .event_format(RegionLineFormat)
        .try_init()
        .map_err(anyhow::Error::msg)
}

/// Event formatter producing `LEVEL:SERVICE:region: message` lines
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionLineFormat;

impl<S, N> FormatEvent<S, N> for RegionLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = LineFields::default();
        event.record(&mut fields);
        writeln!(writer, "{}", render_line(event.metadata().level(), &fields))
    }
}

/// Fields of one event, split into the parts of a log line
#[derive(Debug, Default)]
struct LineFields {
    message: String,
    service: Option<String>,
    region: Option<String>,
    extra: Vec<(&'static str, String)>,
}

impl LineFields {
    fn record(&mut self, name: &'static str, value: String) {
        match name {
            "message" => self.message = value,
            "service" => self.service = Some(value),
            "region" => self.region = Some(value),
            _ => self.extra.push((name, value)),
        }
    }
}

impl Visit for LineFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.record(field.name(), format!("{value:?}"));
    }
}

fn render_line(level: &Level, fields: &LineFields) -> String {
    let mut line = level.to_string();
    if let Some(service) = &fields.service {
        line.push(':');
        line.push_str(service);
    }
    if let Some(region) = &fields.region {
        line.push(':');
        line.push_str(region);
    }
    line.push_str(": ");
    line.push_str(&fields.message);
    for (key, value) in &fields.extra {
        line.push_str(&format!(" {key}={value}"));
    }
    line
}
