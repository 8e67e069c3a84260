//! Text formatting for budget figures.
//!
//! Everything here is pure: the aggregation happens in [`crate::core::aggregate`] and
//! this module only turns the resulting structs into strings the bot layer can send.

use crate::core::{
    aggregate::{AllocationStatus, Dashboard, LifetimeAllocation, PaycheckBreakdown},
    category::PercentageSummary,
};
use crate::entities::{category, paycheck, transaction};

/// Share of a budget that has been used, as a percentage.
///
/// * 0% = nothing spent
/// * 100% = budget fully used
/// * above 100% = overspent
///
/// A zero budget reports 0%.
#[must_use]
pub fn calculate_progress(spent: f64, budgeted: f64) -> f64 {
    crate::core::aggregate::percent_used(spent, budgeted)
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80.0%`
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // Cast safety: clamped_progress ∈ [0, 100], length is small (10-20).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);

    format!("[{filled_str}{empty_str}] {progress_percent:.1}%")
}

/// Formats an amount as dollars with thousands separators, e.g. `-$1,234.50`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}${grouped}.{cents}")
}

/// One line per active category plus the allocated total.
#[must_use]
pub fn format_category_list(categories: &[category::Model], summary: PercentageSummary) -> String {
    if categories.is_empty() {
        return "No active categories. Add one with `/add_category`.".to_string();
    }
    let mut out = String::new();
    for c in categories {
        out.push_str(&format!("• **{}** {:.1}% `{}`\n", c.name, c.percentage, c.color));
    }
    out.push_str(&format!(
        "\nAllocated: {:.1}% | Unallocated: {:.1}%",
        summary.total, summary.unallocated
    ));
    out
}

/// Single summary line for a paycheck.
#[must_use]
pub fn format_paycheck_line(paycheck: &paycheck::Model) -> String {
    let mut line = format!(
        "#{} {} {} ({})",
        paycheck.id,
        paycheck.date,
        format_currency(paycheck.amount),
        paycheck.frequency.label()
    );
    if let Some(desc) = &paycheck.description {
        line.push_str(&format!(" - {desc}"));
    }
    line
}

/// Single summary line for a transaction, with the category name when known.
#[must_use]
pub fn format_transaction_line(transaction: &transaction::Model, category_name: Option<&str>) -> String {
    let mut line = format!(
        "#{} {} {} | {}",
        transaction.id,
        transaction.date,
        format_currency(transaction.amount),
        category_name.unwrap_or("unknown category")
    );
    if let Some(desc) = &transaction.description {
        line.push_str(&format!(" | {desc}"));
    }
    line
}

fn format_status_line(status: &AllocationStatus) -> String {
    let a = &status.allocation;
    format!(
        "**{}** ({:.1}%)\n{} spent of {} | {} left\n{}",
        a.category_name,
        a.percentage,
        format_currency(status.spent),
        format_currency(a.budgeted_amount),
        format_currency(status.remaining),
        format_progress_bar(status.percent_used, None)
    )
}

/// Full breakdown of a single paycheck.
#[must_use]
pub fn format_breakdown(breakdown: &PaycheckBreakdown) -> String {
    let mut out = format!("💵 {}\n", format_paycheck_line(&breakdown.paycheck));
    out.push_str(&format!(
        "Monthly equivalent: {}\n",
        format_currency(breakdown.monthly_equivalent)
    ));
    out.push_str(&match breakdown.window.end {
        Some(end) => format!("Spend window: {} to {end}\n\n", breakdown.window.start),
        None => format!("Spend window: since {}\n\n", breakdown.window.start),
    });

    if breakdown.allocations.is_empty() {
        out.push_str("No categories were active when this paycheck was recorded.\n");
    }
    for status in &breakdown.allocations {
        out.push_str(&format_status_line(status));
        out.push_str("\n\n");
    }

    out.push_str(&format!(
        "Budgeted: {} | Spent: {} | Remaining: {}\n",
        format_currency(breakdown.budgeted_total),
        format_currency(breakdown.spent_total),
        format_currency(breakdown.remaining_total)
    ));
    out.push_str(&format!(
        "Unbudgeted income: {}",
        format_currency(breakdown.unbudgeted_income)
    ));
    if breakdown.unbudgeted_spend > 0.0 {
        out.push_str(&format!(
            " | Unbudgeted spend: {}",
            format_currency(breakdown.unbudgeted_spend)
        ));
    }
    out
}

/// Lifetime totals, one line per category name.
#[must_use]
pub fn format_lifetime(rows: &[LifetimeAllocation]) -> String {
    if rows.is_empty() {
        return "No paychecks recorded yet.".to_string();
    }
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!(
            "**{}** `{}`: {} budgeted, {} spent over {} paycheck(s)\n",
            row.category_name,
            row.category_color,
            format_currency(row.budgeted),
            format_currency(row.spent),
            row.paycheck_count
        ));
    }
    out
}

/// Dashboard text: latest paycheck breakdown, category split, and recent paychecks.
#[must_use]
pub fn format_dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::from("📊 **Budget Dashboard**\n\n");

    match &dashboard.latest {
        Some(breakdown) => {
            out.push_str(&format_breakdown(breakdown));
            out.push_str("\n\n");
        }
        None => out.push_str("No paychecks yet. Record one with `/add_paycheck`.\n\n"),
    }

    out.push_str("**Categories**\n");
    out.push_str(&format_category_list(
        &dashboard.categories,
        dashboard.percentages,
    ));

    if dashboard.recent_paychecks.len() > 1 {
        out.push_str("\n\n**Recent paychecks**\n");
        for p in &dashboard.recent_paychecks {
            out.push_str(&format_paycheck_line(p));
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::aggregate::SpendWindow;
    use crate::entities::{Frequency, allocation};
    use chrono::NaiveDate;

    fn sample_paycheck() -> paycheck::Model {
        paycheck::Model {
            id: 3,
            user_id: "user1".to_string(),
            amount: 2500.0,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            frequency: Frequency::BiWeekly,
            description: Some("March".to_string()),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_calculate_progress() {
        assert_eq!(calculate_progress(0.0, 100.0), 0.0);
        assert_eq!(calculate_progress(50.0, 100.0), 50.0);
        assert_eq!(calculate_progress(125.0, 100.0), 125.0);
        assert_eq!(calculate_progress(50.0, 0.0), 0.0);
    }

    #[test]
    fn test_format_progress_bar() {
        assert_eq!(format_progress_bar(80.0, None), "[████████░░] 80.0%");
        assert_eq!(format_progress_bar(0.0, Some(5)), "[░░░░░] 0.0%");
        // Overspent stays full but shows the real figure
        assert_eq!(format_progress_bar(150.0, Some(4)), "[████] 150.0%");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(12.5), "$12.50");
        assert_eq!(format_currency(999.99), "$999.99");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(-50.25), "-$50.25");
    }

    #[test]
    fn test_format_paycheck_line() {
        assert_eq!(
            format_paycheck_line(&sample_paycheck()),
            "#3 2024-03-01 $2,500.00 (bi-weekly) - March"
        );
    }

    #[test]
    fn test_format_breakdown_mentions_totals() {
        let p = sample_paycheck();
        let breakdown = PaycheckBreakdown {
            window: SpendWindow {
                start: p.date,
                end: None,
            },
            allocations: vec![AllocationStatus {
                allocation: allocation::Model {
                    id: 1,
                    paycheck_id: p.id,
                    category_id: Some(1),
                    category_name: "Rent".to_string(),
                    category_color: "#FF0000".to_string(),
                    percentage: 40.0,
                    budgeted_amount: 1000.0,
                },
                spent: 250.0,
                remaining: 750.0,
                percent_used: 25.0,
            }],
            budgeted_total: 1000.0,
            spent_total: 250.0,
            remaining_total: 750.0,
            unbudgeted_income: 1500.0,
            unbudgeted_spend: 0.0,
            monthly_equivalent: 5416.67,
            paycheck: p,
        };

        let text = format_breakdown(&breakdown);
        assert!(text.contains("**Rent** (40.0%)"));
        assert!(text.contains("$250.00 spent of $1,000.00"));
        assert!(text.contains("Unbudgeted income: $1,500.00"));
        assert!(text.contains("since 2024-03-01"));
        assert!(!text.contains("Unbudgeted spend"));
    }

    #[test]
    fn test_format_category_list_lines() {
        let categories = vec![crate::test_utils::sample_category(1, "Rent", 40.0)];
        let summary = PercentageSummary {
            total: 40.0,
            unallocated: 60.0,
        };
        assert_eq!(
            format_category_list(&categories, summary),
            "• **Rent** 40.0% `#4A90D9`\n\nAllocated: 40.0% | Unallocated: 60.0%"
        );
    }

    #[test]
    fn test_format_lifetime_empty() {
        assert_eq!(format_lifetime(&[]), "No paychecks recorded yet.");
    }
}
