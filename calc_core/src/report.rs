//! # PDF Report Module
//!
//! Generates PDF reports from sizing calculations using Typst.
//!
//! ## Architecture
//!
//! - Typst templates are embedded as string constants
//! - Data is injected via placeholder replacement before compilation
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! Two reports are available: a dedicated UPS report with engineering
//! recommendations, and a generic report that tabulates the inputs and
//! results of any calculator.
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::calculations::ups::UpsInput;
//! use calc_core::report::render_ups_pdf;
//! use calc_core::settings::ReportSettings;
//!
//! let input = UpsInput { it_load_kw: 100.0, runtime_min: 10.0, ..UpsInput::default() };
//! let pdf_bytes = render_ups_pdf(&input, &ReportSettings::default()).unwrap();
//! std::fs::write("ups_report.pdf", pdf_bytes).unwrap();
//! ```

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::ups::{size_ups, UpsInput};
use crate::calculations::{CalculationItem, CalculationOutput};
use crate::errors::{CalcError, CalcResult};
use crate::settings::ReportSettings;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Available fonts
    fonts: Vec<Font>,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    /// Fonts bundled with typst-assets
    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// PDF Templates
// ============================================================================

/// Page setup and title block shared by all reports
const PAGE_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2.5cm, bottom: 2.5cm, left: 2cm, right: 2cm),
  header: align(right)[
    #text(size: 9pt, fill: gray)[{{TITLE}}]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[Job: {{JOB_ID}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 11pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[{{HEADING}}]
  ]
]

#v(8pt)

#table(
  columns: (auto, 1fr),
  stroke: none,
  row-gutter: 4pt,
  [Engineer:], [{{ENGINEER}}],
  [Job ID:], [{{JOB_ID}}],
  [Date:], [{{DATE}}],
)

#v(8pt)
#line(length: 100%, stroke: 0.5pt)
"##;

/// UPS report body
const UPS_TEMPLATE: &str = r##"
== Input Parameters

#table(
  columns: (1fr, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right),
  table.header([*Parameter*], [*Value*]),
  [IT Load], [{{IT_LOAD}} kW],
  [Runtime], [{{RUNTIME}} min],
  [Redundancy Level], [{{REDUNDANCY}}],
  [Power Factor], [{{POWER_FACTOR}}],
  [Growth Margin], [{{GROWTH}} %],
  [Safety Margin], [{{SAFETY}} %],
)

#v(12pt)

== Calculation Results

#table(
  columns: (1fr, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right),
  table.header([*Quantity*], [*Value*]),
  [Configuration], [{{CONFIGURATION}}],
  [Design Load], [{{DESIGN_LOAD}} kVA],
  [UPS Capacity (per unit)], [{{UNIT_KW}} kW / {{UNIT_KVA}} kVA],
  [Installed Units], [{{UNITS}}],
  [Battery Capacity], [{{BATTERY_AH}} Ah],
  [Heat Dissipation], [{{HEAT_BTU}} BTU/h],
)

#v(12pt)

== Engineering Recommendations

+ Each UPS system must be at least {{UNIT_KW}} kW capacity.
+ Battery array must provide at least {{BATTERY_AH}} Ah capacity.
+ Recommended topology: {{CONFIGURATION}}.
"##;

// ============================================================================
// UPS Report
// ============================================================================

/// Build the Typst source for a UPS report.
pub fn ups_report_source(input: &UpsInput, settings: &ReportSettings) -> CalcResult<String> {
    let sizing = size_ups(input)?;
    let configuration = sizing.redundancy.configuration();

    let mut source = page_header(settings, "UPS Calculator Report");
    source.push_str(
        &UPS_TEMPLATE
            .replace("{{IT_LOAD}}", &format_number(input.it_load_kw))
            .replace("{{RUNTIME}}", &format_number(input.runtime_min))
            .replace("{{REDUNDANCY}}", &escape_typst(input.redundancy_level.code()))
            .replace("{{POWER_FACTOR}}", &format_number(input.power_factor))
            .replace("{{GROWTH}}", &format_number(input.growth_margin))
            .replace("{{SAFETY}}", &format_number(input.safety_margin))
            .replace("{{CONFIGURATION}}", &escape_typst(configuration))
            .replace("{{DESIGN_LOAD}}", &format!("{:.2}", sizing.design_load_kva))
            .replace("{{UNIT_KW}}", &format!("{:.2}", sizing.unit_rating))
            .replace("{{UNIT_KVA}}", &format!("{:.2}", sizing.unit_rating / input.power_factor))
            .replace("{{UNITS}}", &sizing.units_total.to_string())
            .replace("{{BATTERY_AH}}", &format!("{:.2}", sizing.battery_ah))
            .replace("{{HEAT_BTU}}", &format!("{:.0}", sizing.heat_btu_h)),
    );
    Ok(source)
}

/// Render a UPS report to PDF bytes.
///
/// The figures come from the same [`size_ups`] computation that backs
/// [`crate::calculations::ups::calculate`].
pub fn render_ups_pdf(input: &UpsInput, settings: &ReportSettings) -> CalcResult<Vec<u8>> {
    let source = ups_report_source(input, settings)?;
    tracing::info!(it_load_kw = input.it_load_kw, "rendering UPS report");
    compile_pdf(source)
}

// ============================================================================
// Generic Calculation Report
// ============================================================================

/// Build the Typst source for any calculation.
pub fn calculation_report_source(
    item: &CalculationItem,
    output: &CalculationOutput,
    settings: &ReportSettings,
) -> CalcResult<String> {
    let mut source = page_header(settings, item.display_name());

    source.push_str("\n== Input Parameters\n");
    let inputs: Vec<(String, String)> = flatten_record(item)?
        .into_iter()
        .filter(|(key, _)| key != "type")
        .collect();
    source.push_str(&key_value_table("Parameter", &inputs));

    source.push_str("\n#v(12pt)\n\n== Results\n");
    if let Some(configuration) = output.configuration() {
        source.push_str(&format!("\nConfiguration: *{}*\n", escape_typst(configuration)));
    }
    source.push_str(&key_value_table("Quantity", &flatten_record(output)?));

    if output.exceeds_catalog() {
        source.push_str(
            "\n#v(8pt)\n#block(fill: rgb(\"#f8d7da\"), inset: 8pt, radius: 4pt)[\
             Requirement exceeds the largest standard rating; the maximum was selected.]\n",
        );
    }
    Ok(source)
}

/// Render a report for any calculation to PDF bytes.
pub fn render_calculation_pdf(
    item: &CalculationItem,
    output: &CalculationOutput,
    settings: &ReportSettings,
) -> CalcResult<Vec<u8>> {
    let source = calculation_report_source(item, output, settings)?;
    tracing::info!(calc_type = item.calc_type(), "rendering calculation report");
    compile_pdf(source)
}

// ============================================================================
// Helpers
// ============================================================================

fn page_header(settings: &ReportSettings, heading: &str) -> String {
    let date = Utc::now().format("%Y-%m-%d").to_string();
    PAGE_TEMPLATE
        .replace("{{TITLE}}", &escape_typst(&settings.title))
        .replace("{{HEADING}}", &escape_typst(heading))
        .replace("{{ENGINEER}}", &escape_typst(&settings.engineer))
        .replace("{{JOB_ID}}", &escape_typst(&settings.job_id))
        .replace("{{DATE}}", &date)
}

/// Compile Typst source and render it to PDF.
fn compile_pdf(source: String) -> CalcResult<Vec<u8>> {
    let world = PdfWorld::new(source);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::report(format!("Typst compilation failed: {}", error_msgs.join("; ")))
    })?;

    typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::report(format!("PDF rendering failed: {}", error_msgs.join("; ")))
    })
}

/// Flatten a serializable record into `(label, value)` rows.
///
/// Nested arrays and objects use dotted/indexed paths (`loads[0].name`).
fn flatten_record<T: Serialize>(record: &T) -> CalcResult<Vec<(String, String)>> {
    let value = serde_json::to_value(record)?;
    let mut rows = Vec::new();
    flatten_value("", &value, &mut rows);
    Ok(rows)
}

fn flatten_value(path: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                flatten_value(&child_path, child, rows);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_value(&format!("{}[{}]", path, index), child, rows);
            }
        }
        Value::Bool(flag) => rows.push((path.to_string(), if *flag { "Yes" } else { "No" }.to_string())),
        Value::Number(number) => {
            let text = number.as_f64().map(format_number).unwrap_or_else(|| number.to_string());
            rows.push((path.to_string(), text));
        }
        Value::String(text) => rows.push((path.to_string(), text.clone())),
        Value::Null => rows.push((path.to_string(), "-".to_string())),
    }
}

fn key_value_table(header: &str, rows: &[(String, String)]) -> String {
    let body: Vec<String> = rows
        .iter()
        .map(|(key, value)| format!("  [{}], [{}],", escape_typst(key), escape_typst(value)))
        .collect();
    format!(
        "\n#table(\n  columns: (1fr, auto),\n  inset: 8pt,\n  stroke: 0.5pt,\n  align: (left, right),\n  \
         table.header([*{}*], [*Value*]),\n{}\n)\n",
        header,
        body.join("\n")
    )
}

/// Whole numbers without a fractional part, everything else as-is
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::transformer::{TransformerInput, TransformerLoad};
    use crate::calculations::ups::UpsRedundancy;
    use crate::settings::EngineSettings;

    fn test_ups() -> UpsInput {
        UpsInput {
            it_load_kw: 100.0,
            runtime_min: 10.0,
            redundancy_level: UpsRedundancy::TwoN,
            ..UpsInput::default()
        }
    }

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("loads[0].demand_kw"), "loads\\[0\\].demand\\_kw");
        assert_eq!(escape_typst("#1 <A>"), "\\#1 \\<A\\>");
    }

    #[test]
    fn test_ups_source_matches_sizing() {
        let source = ups_report_source(&test_ups(), &ReportSettings::default()).unwrap();
        assert!(source.contains("Dual Path (A+B)"));
        assert!(source.contains("146.67 kW"));
        assert!(source.contains("55.35 Ah"));
        assert!(source.contains("500427 BTU/h"));
        assert!(!source.contains("{{"));
    }

    #[test]
    fn test_ups_source_rejects_invalid_input() {
        let input = UpsInput { power_factor: 0.0, ..test_ups() };
        assert!(ups_report_source(&input, &ReportSettings::default()).is_err());
    }

    #[test]
    fn test_header_fields_escaped() {
        let settings = ReportSettings {
            engineer: "J. Doe #1".to_string(),
            job_id: "JOB_42".to_string(),
            ..ReportSettings::default()
        };
        let source = ups_report_source(&test_ups(), &settings).unwrap();
        assert!(source.contains("J. Doe \\#1"));
        assert!(source.contains("JOB\\_42"));
    }

    #[test]
    fn test_flatten_nested_breakdown() {
        let input = TransformerInput {
            loads: vec![TransformerLoad::new("Pumps", 40.0)],
            growth_pct: 20.0,
        };
        let rows = flatten_record(&input).unwrap();
        assert!(rows.contains(&("loads[0].name".to_string(), "Pumps".to_string())));
        assert!(rows.contains(&("loads[0].kw".to_string(), "40".to_string())));
        assert!(rows.contains(&("growth_pct".to_string(), "20".to_string())));
    }

    #[test]
    fn test_generic_source() {
        let item = CalculationItem::Transformer(TransformerInput {
            loads: vec![TransformerLoad::new("Campus", 5000.0)],
            growth_pct: 0.0,
        });
        let output = item.run(&EngineSettings::default()).unwrap();
        let source = calculation_report_source(&item, &output, &ReportSettings::default()).unwrap();
        assert!(source.contains("Transformer Sizing"));
        assert!(source.contains("[selected\\_kva], [3150]"));
        assert!(source.contains("exceeds the largest standard rating"));
        assert!(!source.contains("[type]"));
    }

    #[test]
    fn test_pdf_generation() {
        let pdf = render_ups_pdf(&test_ups(), &ReportSettings::default());

        // Should succeed
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }
}
