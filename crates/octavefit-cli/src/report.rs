//! Human-readable output: the verbose fit report and the instrument table.

use anyhow::{Context, Result};
use octavefit::{midi_to_display, FitReport, Instrument};
use owo_colors::OwoColorize;
use prettytable::{format, Cell, Row, Table};

/// Applies colors only when enabled
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub color: bool,
}

impl Palette {
    fn label(&self, text: &str) -> String {
        if self.color {
            text.bright_cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn good(&self, text: &str) -> String {
        if self.color {
            text.bright_green().to_string()
        } else {
            text.to_string()
        }
    }

    fn bad(&self, text: &str) -> String {
        if self.color {
            text.bright_red().to_string()
        } else {
            text.to_string()
        }
    }

    fn strong(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn header(&self, text: &str) -> Cell {
        if self.color {
            Cell::new(text).style_spec("Fb")
        } else {
            Cell::new(text)
        }
    }
}

fn render_table(table: &Table) -> Result<String> {
    let mut output = Vec::new();
    table.print(&mut output)?;
    String::from_utf8(output).context("Failed to convert table to string")
}

fn range_text(low: i32, high: i32) -> String {
    format!(
        "{}..{} ({}-{})",
        midi_to_display(low),
        midi_to_display(high),
        low,
        high
    )
}

/// The full report for one fitted source.
pub fn render_fit(source: &str, report: &FitReport, palette: Palette) -> Result<String> {
    let profile = report.instrument.profile();
    let best = &report.best;
    let (written_low, written_high) = best.written_range;
    let mut out = String::new();

    out.push_str(&format!("{} {}\n", palette.label("Source:"), source));
    out.push_str(&format!(
        "{} {} ({})\n",
        palette.label("Instrument:"),
        report.instrument.description(),
        report.instrument
    ));
    out.push_str(&format!(
        "{} {}, transpose {:+}\n",
        palette.label("Sounding range:"),
        range_text(profile.low, profile.high),
        profile.transpose
    ));
    out.push_str(&format!(
        "{} {}\n",
        palette.label("Written range:"),
        range_text(written_low, written_high)
    ));

    match (report.notes.iter().min(), report.notes.iter().max()) {
        (Some(&low), Some(&high)) => out.push_str(&format!(
            "{} {} spanning {}\n",
            palette.label("Notes:"),
            report.notes.len(),
            range_text(low, high)
        )),
        _ => out.push_str(&format!("{} none\n", palette.label("Notes:"))),
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.add_row(Row::new(vec![
        palette.header(""),
        palette.header("SHIFT"),
        palette.header("IN RANGE"),
        palette.header("OUT"),
        palette.header("DISTANCE"),
    ]));
    for candidate in &best.candidates {
        let marker = if candidate.shift == best.shift { "*" } else { "" };
        table.add_row(Row::new(vec![
            Cell::new(marker),
            Cell::new(&format!("{:+}", candidate.shift)).style_spec("r"),
            Cell::new(&candidate.in_range.to_string()).style_spec("r"),
            Cell::new(&candidate.out_of_range.to_string()).style_spec("r"),
            Cell::new(&candidate.distance.to_string()).style_spec("r"),
        ]));
    }
    out.push('\n');
    out.push_str(&render_table(&table)?);
    out.push('\n');

    let in_range = format!("{}/{}", best.in_range, report.notes.len());
    out.push_str(&format!(
        "{} {}, {} in range, distance {}\n",
        palette.label("Decision:"),
        best.decision(),
        if best.out_of_range == 0 {
            palette.good(&in_range)
        } else {
            palette.bad(&in_range)
        },
        best.distance
    ));

    let outside: Vec<String> = best
        .written
        .iter()
        .filter(|&&w| w < written_low || w > written_high)
        .map(|&w| midi_to_display(w))
        .collect();
    if !outside.is_empty() {
        out.push_str(&format!(
            "{} {}\n",
            palette.label("Still outside (written):"),
            palette.bad(&outside.join(" "))
        ));
    }

    out.push_str(&format!(
        "{} {}\n",
        palette.label("Command:"),
        palette.strong(&report.command)
    ));

    Ok(out)
}

/// Table of every supported instrument.
pub fn render_instruments(palette: Palette) -> Result<String> {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.add_row(Row::new(vec![
        palette.header("NAME"),
        palette.header("INSTRUMENT"),
        palette.header("SOUNDING"),
        palette.header("TRANSPOSE"),
        palette.header("WRITTEN"),
    ]));

    for instrument in Instrument::ALL {
        let profile = instrument.profile();
        let (written_low, written_high) = profile.written_range();
        table.add_row(Row::new(vec![
            Cell::new(instrument.name()),
            Cell::new(instrument.description()),
            Cell::new(&range_text(profile.low, profile.high)),
            Cell::new(&format!("{:+}", profile.transpose)).style_spec("r"),
            Cell::new(&range_text(written_low, written_high)),
        ]));
    }

    render_table(&table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: Palette = Palette { color: false };

    #[test]
    fn test_fit_report_plain() {
        let notes = vec![65, 60, 60, 62, 64, 72, 74, 76, 84, 86, 88, 96, 98, 100, 108];
        let report = octavefit::fit(notes, Instrument::EbClarinet, 1).unwrap();
        let text = render_fit("default", &report, PLAIN).unwrap();

        assert!(text.contains("Clarinet in E-flat (eb-clarinet)"));
        assert!(text.contains("F2..C6 (41-84), transpose +9"));
        assert!(text.contains("shift down 1 octave, 12/15 in range, distance 18"));
        assert!(text.contains("Command: \\transpose c a,"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_fit_report_no_notes() {
        let report = octavefit::fit(Vec::new(), Instrument::Trumpet, 1).unwrap();
        let text = render_fit("stdin", &report, PLAIN).unwrap();
        assert!(text.contains("Notes: none"));
        assert!(!text.contains("Still outside"));
    }

    #[test]
    fn test_instrument_table_lists_all() {
        let text = render_instruments(PLAIN).unwrap();
        for instrument in Instrument::ALL {
            assert!(text.contains(instrument.name()));
        }
    }
}
