//! Terminal rendering for the audit pipeline.

use chrono::Local;
use console::style;

use audit::{AuditReport, InsightIcon};

use crate::state::{Phase, PipelineState};

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "Idle",
        Phase::Extracting => "Deep Extraction",
        Phase::Analyzing => "AI Analysis",
        Phase::Complete => "Report Ready",
        Phase::Error => "Failed",
    }
}

fn icon_glyph(icon: InsightIcon) -> &'static str {
    match icon {
        InsightIcon::Lightbulb => "\u{1F4A1}",   // 💡
        InsightIcon::TrendingUp => "\u{1F4C8}",  // 📈
        InsightIcon::AlertCircle => "\u{26A0}",  // ⚠
    }
}

/// Announce a phase transition as a stepper line.
pub fn print_phase(phase: Phase) {
    println!(
        "{} {}",
        style("──▶").cyan(),
        style(phase_label(phase)).bold()
    );
}

/// Print log entries added since `printed`; returns the new watermark.
pub fn print_new_log(state: &PipelineState, printed: usize) -> usize {
    for entry in &state.log[printed..] {
        let stamp = Local::now().format("%H:%M:%S");
        println!("  {} {}", style(stamp).dim(), entry);
    }
    state.log.len()
}

/// Surface an error notification.
pub fn print_notice(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), style(message).red());
}

/// Render the final report for a completed run.
pub fn print_report(state: &PipelineState) {
    let Some(report) = &state.result else {
        return;
    };

    if !report.record.amazon_presence {
        print_no_presence(&state.domain, report);
        return;
    }

    println!();
    println!("{}", style("AUDIT REPORT").bold().underlined());
    println!();

    // Executive snapshot
    let record = &report.record;
    println!(
        "  {:<18} {}",
        style("Presence").dim(),
        if record.amazon_presence {
            "Dominant"
        } else {
            "Weak"
        }
    );
    println!(
        "  {:<18} {}",
        style("Confidence").dim(),
        record.confidence_level.as_str()
    );
    println!(
        "  {:<18} {}",
        style("Category").dim(),
        record.primary_category
    );
    println!(
        "  {:<18} {}",
        style("Product count").dim(),
        record.estimated_product_count
    );
    if let Some(ranking) = &record.ranking_data {
        println!("  {:<18} {}", style("Ranking").dim(), ranking);
    }

    // Product inventory
    println!();
    println!("{}", style("Top products").bold());
    if record.top_products.is_empty() {
        println!("  {}", style("No products found").dim());
    } else {
        for (rank, product) in record.top_products.iter().enumerate() {
            println!(
                "  {}. {:<40} {:>10}  {} ★  {}",
                rank + 1,
                truncate(&product.name, 40),
                product.price,
                product.rating,
                style(&product.url).dim()
            );
        }
    }

    print_insights(report);
}

fn print_no_presence(domain: &str, report: &AuditReport) {
    let record = &report.record;
    println!();
    println!("{}", style("No Brand Presence").bold());
    println!(
        "  No official storefront or significant product listings found for {}.",
        style(domain).bold()
    );
    println!(
        "  {:<18} {}",
        style("Confidence").dim(),
        record.confidence_level.as_str()
    );
    println!(
        "  {:<18} {}",
        style("Category").dim(),
        if record.primary_category.is_empty() {
            "N/A"
        } else {
            record.primary_category.as_str()
        }
    );

    print_insights(report);
}

fn print_insights(report: &AuditReport) {
    println!();
    println!("{}", style("Strategic insights").bold());
    for insight in &report.strategic_insights {
        println!("  {} {}", icon_glyph(insight.icon), style(&insight.title).bold());
        println!("     {}", insight.content);
    }
    println!();
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_names() {
        assert_eq!(truncate("Down Jacket", 40), "Down Jacket");
    }

    #[test]
    fn truncate_shortens_long_names() {
        let long = "x".repeat(60);
        let short = truncate(&long, 40);
        assert!(short.chars().count() <= 40);
        assert!(short.ends_with('…'));
    }
}
