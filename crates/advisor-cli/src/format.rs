//! Terminal formatting for view blocks
//!
//! The view model decides *what* to show; this module only decides how it
//! looks in a terminal: a tone marker on each heading and comfy-table for
//! tabular bodies.

use advisor_core::classify::ColorHint;
use advisor_core::render::{BlockBody, ViewBlock};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use std::fmt::Write;

fn tone_marker(tone: ColorHint) -> &'static str {
    match tone {
        ColorHint::Positive => "🟢",
        ColorHint::Caution => "🟡",
        ColorHint::Negative => "🔴",
        ColorHint::Neutral => "⚪",
        ColorHint::Informational => "🔵",
    }
}

/// Format a full set of blocks, separated by blank lines.
pub fn format_blocks(blocks: &[ViewBlock]) -> String {
    let mut output = String::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        format_block(&mut output, block);
    }
    output
}

fn format_block(output: &mut String, block: &ViewBlock) {
    let _ = writeln!(output, "{} {}", tone_marker(block.tone), block.heading);
    match &block.body {
        BlockBody::Lines(lines) => {
            for line in lines {
                let _ = writeln!(output, "  {line}");
            }
        }
        BlockBody::Table { headers, rows } => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(headers.clone());
            for row in rows {
                table.add_row(row.clone());
            }
            let _ = writeln!(output, "{table}");
        }
    }
    if let Some(note) = &block.note {
        let _ = writeln!(output, "  {note}");
    }
}
