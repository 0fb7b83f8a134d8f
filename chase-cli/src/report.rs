//! Plain-text report rendering.

use chase_core::{AggregateNode, NodeKind, Report};
use crossterm::style::{Color, Stylize, style};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Category,
    Transaction,
    Subtotal,
    Total,
    Average,
}

impl Tone {
    fn color(self) -> Color {
        match self {
            Tone::Category => Color::AnsiValue(61),
            Tone::Transaction | Tone::Average => Color::DarkGreen,
            Tone::Subtotal => Color::DarkCyan,
            Tone::Total => Color::DarkYellow,
        }
    }
}

/// Colors lines unless disabled.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn paint(&self, tone: Tone, text: &str) -> String {
        if self.color {
            style(text).with(tone.color()).to_string()
        } else {
            text.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextOptions {
    pub totals_only: bool,
    pub averages_only: bool,
    pub detail: bool,
}

/// `--- Groceries` padded on the left to 80 columns.
pub fn banner(category: &str) -> String {
    format!("{:->80}", format!(" {category}"))
}

fn write_leaves<W: Write>(out: &mut W, node: &AggregateNode, painter: Painter) -> io::Result<()> {
    for leaf in &node.children {
        if let NodeKind::Transaction { date } = leaf.kind {
            let line = format!("{:>10} {} {}", leaf.total, date.format("%Y-%m-%d"), leaf.key);
            writeln!(out, "{}", painter.paint(Tone::Transaction, &line))?;
        }
    }
    Ok(())
}

/// Category banners, merchant subtotals and category totals.
pub fn write_category_report<W: Write>(
    out: &mut W,
    report: &Report,
    opts: TextOptions,
    painter: Painter,
) -> io::Result<()> {
    for category in report.categories() {
        if !opts.totals_only {
            writeln!(out, "{}", painter.paint(Tone::Category, &banner(&category.key)))?;
            for merchant in &category.children {
                if opts.detail {
                    write_leaves(out, merchant, painter)?;
                }
                let line = format!("{:>10} {:>10} {}", merchant.total, merchant.count, merchant.key);
                writeln!(out, "{}", painter.paint(Tone::Subtotal, &line))?;
            }
        }
        let line = format!(
            "{:>10} {:>10} Total {}",
            category.total, category.count, category.key
        );
        writeln!(out, "{}", painter.paint(Tone::Total, &line))?;
    }
    Ok(())
}

/// Chronological month totals and averages per category.
pub fn write_monthly_report<W: Write>(
    out: &mut W,
    report: &Report,
    opts: TextOptions,
    painter: Painter,
) -> io::Result<()> {
    let span = report.summary.span_months;
    for category in report.categories() {
        let Some(series) = report.monthly_for(&category.key) else {
            continue;
        };
        let name = &category.key;

        if !opts.averages_only {
            writeln!(out, "{}", painter.paint(Tone::Category, &banner(name)))?;
            for (ym, total) in &series.months {
                let line = format!("{ym} {total:>10}");
                writeln!(out, "{}", painter.paint(Tone::Subtotal, &line))?;
                if opts.detail {
                    if let Some(month) = category.child(&ym.to_string()) {
                        write_leaves(out, month, painter)?;
                    }
                }
            }
            let line = format!("{:>18}   Total {name} over {span} months", category.total);
            writeln!(out, "{}", painter.paint(Tone::Total, &line))?;
        }

        if let Some(avg) = series.average_over_span {
            let line = format!("{avg:>18} Average {name} over {span} months span");
            writeln!(out, "{}", painter.paint(Tone::Average, &line))?;
        }

        if !opts.averages_only {
            let line = format!(
                "{:>18} Average {name} over {} months with data",
                series.average_with_data,
                series.months.len()
            );
            writeln!(out, "{}", painter.paint(Tone::Average, &line))?;
        }
    }
    Ok(())
}
