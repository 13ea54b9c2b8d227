use colored::Colorize;
use pdftoc_core::{format_toc, Detection};

use crate::prelude::{eprintln, *};

/// Render the statistics and decisions behind a detection run.
pub fn render(detection: &Detection) -> String {
    let mut out = String::new();

    out.push_str(&f!("{}\n", "Font sizes".bold().cyan()));
    let mut sizes = new_table();
    sizes.add_row(prettytable::row![
        "Size".bold().cyan(),
        "Chars".bold().cyan(),
        ""
    ]);
    for (size, count) in &detection.histogram {
        let marker = if Some(*size) == detection.body_size {
            "body".green().to_string()
        } else {
            String::new()
        };
        sizes.add_row(prettytable::row![f!("{:.2}", size), count, marker]);
    }
    out.push_str(&sizes.to_string());

    out.push_str(&f!("\n{}\n", "Recurring header/footer texts".bold().cyan()));
    if detection.recurring.is_empty() {
        out.push_str(&f!("{}\n", "none".bright_black()));
    }
    for text in &detection.recurring {
        out.push_str(&f!("  {}\n", text.yellow()));
    }

    out.push_str(&f!("\n{}\n", "Levels".bold().cyan()));
    let mut levels = new_table();
    levels.add_row(prettytable::row![
        "Score".bold().cyan(),
        "Level".bold().cyan()
    ]);
    for (score, level) in &detection.levels {
        levels.add_row(prettytable::row![f!("{:.2}", score), level]);
    }
    out.push_str(&levels.to_string());

    out.push_str(&f!(
        "\n{} ({})\n",
        "Headings".bold().cyan(),
        detection.headings.len()
    ));
    out.push_str(&format_toc(&detection.headings));

    out
}

/// Print the report to stderr.
pub fn print(detection: &Detection) {
    eprintln!("{}", render(detection));
}
