use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::Platform;
use crate::report::{total_sessions, MarketSummary, Report};

/// Render a colored terminal report.
pub fn render(report: &Report, path: &Path, verbose: bool, quiet: bool) -> Result<()> {
    let rows = report.rows.len();
    let markets = report.markets.len();
    let friction = report
        .mean_friction()
        .map(|f| format!("{:.1}", f))
        .unwrap_or_else(|| "-".to_string());
    let sessions = total_sessions(&report.rows);

    if quiet {
        println!(
            "Rows: {}  Markets: {}  Sessions: {}  Mean friction: {}",
            rows, markets, sessions, friction
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "ux-scorecard".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Snapshots: {}\n", path.display());

    let gap_line = match report.platform_gap {
        Some(gap) if gap.nextgen_advantage >= 0.0 => format!(
            "{}  NextGen ahead by {:.1} ({:.1} vs {:.1})",
            "▲".green(),
            gap.nextgen_advantage,
            gap.nextgen_friction,
            gap.webshop_friction
        ),
        Some(gap) => format!(
            "{}  NextGen behind by {:.1} ({:.1} vs {:.1})",
            "▼".red(),
            -gap.nextgen_advantage,
            gap.nextgen_friction,
            gap.webshop_friction
        ),
        None => "-  no NextGen/Webshop pair".to_string(),
    };

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Rows             : {}", rows));
    println!(" │  {:<48} │", format!("Markets          : {}", markets));
    println!(" │  {:<48} │", format!("Sessions         : {}", sessions));
    println!(" │  {:<48} │", format!("Mean friction    : {}", friction));
    println!(" │  {:<48} │", gap_line);
    println!(" └────────────────────────────────────────────────────┘\n");

    if markets > 0 {
        println!(" {} Markets by frustration:\n", "[MARKETS]".cyan().bold());
        render_markets(&report.markets);
        println!();
    }

    if verbose && !report.top_pages.is_empty() {
        println!(" {} Top pages by visits:\n", "[PAGES]".cyan().bold());
        let mut table = new_table(&["Platform", "URL", "Visits"]);
        for page in &report.top_pages {
            table.add_row(vec![
                Cell::new(page.platform.to_string()).fg(platform_color(page.platform)),
                Cell::new(&page.url),
                Cell::new(page.visits).set_alignment(CellAlignment::Right),
            ]);
        }
        println!("{}\n", table);
    }

    if verbose && !report.tech.is_empty() {
        println!(" {} Browser / device / OS sessions:\n", "[TECH]".cyan().bold());
        let mut table = new_table(&["Category", "Name", "Sessions"]);
        for usage in &report.tech {
            table.add_row(vec![
                Cell::new(&usage.category),
                Cell::new(&usage.name),
                Cell::new(usage.sessions).set_alignment(CellAlignment::Right),
            ]);
        }
        println!("{}\n", table);
    }

    Ok(())
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

fn render_markets(markets: &[MarketSummary]) {
    let mut table = new_table(&[
        "Market",
        "Sessions",
        "Friction",
        "Frustration",
        "Conv. risk",
        "Silent killer",
        "Tech health",
        "Engagement",
        "Localization",
    ]);

    for m in markets {
        let s = &m.scores;
        table.add_row(vec![
            Cell::new(&m.market).fg(platform_color(m.platform)),
            Cell::new(m.sessions).set_alignment(CellAlignment::Right),
            worse_cell(s.friction),
            worse_cell(s.frustration),
            worse_cell(s.conversion_risk),
            worse_cell(s.silent_killer),
            better_cell(s.tech_health),
            better_cell(s.engagement),
            better_cell(s.localization_quality),
        ]);
    }

    println!("{}", table);
}

/// Cell for a higher-is-worse score.
fn worse_cell(score: f64) -> Cell {
    let color = if score >= 30.0 {
        Color::Red
    } else if score >= 15.0 {
        Color::Yellow
    } else {
        Color::Green
    };
    Cell::new(format!("{:.1}", score))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Cell for a higher-is-better score.
fn better_cell(score: f64) -> Cell {
    let color = if score >= 85.0 {
        Color::Green
    } else if score >= 70.0 {
        Color::Yellow
    } else {
        Color::Red
    };
    Cell::new(format!("{:.1}", score))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

fn platform_color(platform: Platform) -> Color {
    match platform {
        Platform::NextGen => Color::Cyan,
        Platform::Webshop => Color::Blue,
        Platform::Netshop => Color::Magenta,
        Platform::Support => Color::DarkGrey,
        Platform::Other => Color::White,
        Platform::Unknown => Color::DarkGrey,
    }
}
