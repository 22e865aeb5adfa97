//! Data commands: stats, export, seed, reset

use colored::Colorize;

use crate::backup::BackupManager;
use crate::interfaces::cli::CliError;
use crate::services::{SamplePlan, seed_sample_data};
use crate::storage::{AnalyticsStorage, CategoryCount};
use crate::utils::csv_handler::{export_visitors_to_csv, generate_export_filename};

use super::helpers::confirm;

fn print_breakdown(title: &str, counts: &[CategoryCount]) {
    println!("  {}", title.bold());
    if counts.is_empty() {
        println!("    {}", "(none)".dimmed());
    }
    for c in counts {
        println!("    {:<20} {}", c.value, c.count.to_string().green());
    }
}

/// 显示数据库统计
pub async fn show_stats(storage: &AnalyticsStorage) -> Result<(), CliError> {
    let summary = storage.summary().await?;
    let stats = storage.get_visitor_stats().await?;

    println!("{}", "Database statistics".bold().green());
    println!("{}", "=".repeat(40));
    println!("  Visitors:        {}", summary.visitor_count.to_string().cyan());
    println!("  Tracked pages:   {}", summary.page_count.to_string().cyan());
    println!("  Total views:     {}", summary.total_views.to_string().cyan());
    println!(
        "  Last visit:      {}",
        summary
            .last_activity
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "none".to_string())
            .cyan()
    );
    println!("{}", "=".repeat(40));

    if summary.visitor_count > 0 {
        print_breakdown("Visitor types", &stats.visitor_types);
        print_breakdown("Stay durations", &stats.stay_durations);
        print_breakdown("Age brackets", &stats.age_brackets);
        print_breakdown("Interests", &stats.interest_types);
    }
    Ok(())
}

/// 导出访客到 CSV
pub async fn export_visitors(
    storage: &AnalyticsStorage,
    file_path: Option<String>,
) -> Result<(), CliError> {
    let visitors = storage.list_visitors().await?;
    if visitors.is_empty() {
        println!("{} No visitors to export", "ℹ".bold().blue());
        return Ok(());
    }

    let path = file_path.unwrap_or_else(generate_export_filename);
    let written = export_visitors_to_csv(&visitors, &path)?;

    println!(
        "{} Exported {} visitors to {}",
        "✓".bold().green(),
        written.to_string().green(),
        path.cyan()
    );
    Ok(())
}

/// 生成示例数据
pub async fn seed_data(storage: &AnalyticsStorage) -> Result<(), CliError> {
    println!("{}", "Generating sample data...".yellow());

    let plan = SamplePlan::generate(&mut rand::rng())?;
    let report = seed_sample_data(storage, &plan).await?;

    println!("{} Sample data generated", "✓".bold().green());
    println!(
        "  {} pages ({} views), {} visitors, {} site views",
        report.pages.to_string().cyan(),
        report.page_views.to_string().cyan(),
        report.visitors.to_string().cyan(),
        report.total_views.to_string().cyan()
    );
    Ok(())
}

/// 清空全部数据（先自动备份）
pub async fn reset_data(
    storage: &AnalyticsStorage,
    backups: &BackupManager,
    yes: bool,
) -> Result<(), CliError> {
    if !yes && !confirm("Delete ALL visitors and pages and reset the view counter?")? {
        println!("{}", "Aborted.".red());
        return Ok(());
    }

    match backups.auto_backup() {
        Some(path) => println!(
            "{} Backup created: {}",
            "ℹ".bold().blue(),
            path.display().to_string().cyan()
        ),
        None => println!(
            "{} Auto backup failed, continuing",
            "!".bold().yellow()
        ),
    }

    storage.reset_all_data().await?;
    println!("{} Database reset", "✓".bold().green());
    Ok(())
}
