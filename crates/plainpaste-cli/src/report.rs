//! Report rendering.
//!
//! Text reports are minijinja templates. Values are styled through a
//! `style` filter backed by a [`ReportTheme`]; JSON reports serialize the
//! same data with `serde_json`.

use std::collections::HashMap;
use std::io::Write;

use console::Style;
use minijinja::{context, Environment, Value};
use plainpaste::{ColorMode, PasteOutcome};
use serde::Serialize;

const STRIP_TEMPLATE: &str = r#"{{ output }}
{% if show_changes %}

{{ "Changes" | style("header") }}
{% for change in changes %}
  {{ "-" | style("bullet") }} {{ change }}
{% endfor %}
{% endif %}
"#;

const NAME_TEMPLATE: &str = r#"{{ name | style("value") | nl }}"#;

/// Named console styles available to templates.
#[derive(Debug, Clone, Default)]
pub struct ReportTheme {
    styles: HashMap<&'static str, Style>,
}

impl ReportTheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, name: &'static str, style: Style) -> Self {
        self.styles.insert(name, style);
        self
    }

    /// Applies the named style. Unknown names leave the value as is.
    pub fn apply(&self, name: &str, value: &str, color: bool) -> String {
        match self.styles.get(name) {
            Some(style) if color => style.clone().force_styling(true).apply_to(value).to_string(),
            _ => value.to_string(),
        }
    }
}

fn report_theme() -> ReportTheme {
    ReportTheme::new()
        .add("header", Style::new().bold().cyan())
        .add("bullet", Style::new().dim())
        .add("value", Style::new().green())
}

/// Renders text reports.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new(color: bool) -> Result<Self, minijinja::Error> {
        let theme = report_theme();
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_filter("nl", |value: Value| -> String { format!("{}\n", value) });
        env.add_filter("style", move |value: Value, name: String| -> String {
            theme.apply(&name, &value.to_string(), color)
        });
        env.add_template("strip.txt", STRIP_TEMPLATE)?;
        env.add_template("name.txt", NAME_TEMPLATE)?;
        Ok(Self { env })
    }

    /// `output` is what the surface shows: markup, or the (cased) text.
    pub fn strip(&self, output: &str, outcome: &PasteOutcome) -> Result<String, minijinja::Error> {
        self.env.get_template("strip.txt")?.render(context! {
            output => output,
            changes => &outcome.changes,
            show_changes => outcome.show_changes(),
        })
    }

    pub fn name(&self, name: &str) -> Result<String, minijinja::Error> {
        self.env
            .get_template("name.txt")?
            .render(context! { name => name })
    }
}

/// JSON shape of a `strip` run.
#[derive(Debug, Serialize)]
pub struct StripReport<'a> {
    pub mode: ColorMode,
    #[serde(flatten)]
    pub outcome: &'a PasteOutcome,
    pub show_changes: bool,
}

impl<'a> StripReport<'a> {
    pub fn new(mode: ColorMode, outcome: &'a PasteOutcome) -> Self {
        Self {
            mode,
            outcome,
            show_changes: outcome.show_changes(),
        }
    }
}

/// JSON shape of a `name` run.
#[derive(Debug, Serialize)]
pub struct NameReport<'a> {
    pub input: &'a str,
    pub name: String,
}

/// JSON shape of a `sanitize` run.
#[derive(Debug, Serialize)]
pub struct SanitizeReport {
    pub markup: String,
}

/// Pretty-prints `value` followed by a newline.
pub fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
