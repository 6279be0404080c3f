use crate::infra::{InMemoryProgressRepository, LoggingRankUpNotifier};
use chrono::{Duration, Utc};
use clap::Args;
use serde::Serialize;
use seva_rank::config::{AppConfig, LadderPreset, RankingConfig};
use seva_rank::error::AppError;
use seva_rank::progression::{
    ImpactReceipt, LadderView, ProgressService, ProgressView, RankEngine, UserId,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct LadderArgs {
    /// Built-in ladder to use (swarajya or classic). Defaults to APP_RANK_LADDER.
    #[arg(long, value_parser = parse_preset)]
    pub(crate) ladder: Option<LadderPreset>,
    /// JSON ladder file overriding the preset
    #[arg(long)]
    pub(crate) ladder_path: Option<PathBuf>,
    /// Points awarded per person helped. Defaults to APP_POINTS_PER_PERSON.
    #[arg(long)]
    pub(crate) points_per_person: Option<u32>,
}

#[derive(Args, Debug)]
pub(crate) struct RanksArgs {
    #[command(flatten)]
    pub(crate) ladder: LadderArgs,
    /// Emit the ladder as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    #[command(flatten)]
    pub(crate) ladder: LadderArgs,
    /// People helped by one activity; repeat for a series of activities
    #[arg(long = "units", required = true, allow_hyphen_values = true)]
    pub(crate) units: Vec<i64>,
    /// Member id used for the simulated record
    #[arg(long, default_value = "demo-sevak")]
    pub(crate) user: String,
    /// Emit the final progress as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    receipts: Vec<ImpactReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejected: Option<String>,
    progress: ProgressView,
}

fn parse_preset(raw: &str) -> Result<LadderPreset, String> {
    LadderPreset::parse(raw).map_err(|err| err.to_string())
}

fn ranking_config(overrides: &LadderArgs) -> Result<RankingConfig, AppError> {
    let mut ranking = AppConfig::load()?.ranking;
    if let Some(preset) = overrides.ladder {
        ranking.ladder = preset;
        ranking.ladder_path = None;
    }
    if let Some(path) = &overrides.ladder_path {
        ranking.ladder_path = Some(path.clone());
    }
    if let Some(points) = overrides.points_per_person {
        ranking.points_per_person = points;
    }
    Ok(ranking)
}

pub(crate) fn run_ranks(args: RanksArgs) -> Result<(), AppError> {
    let engine = RankEngine::from_config(&ranking_config(&args.ladder)?)?;
    let view = LadderView::new(engine.ladder(), engine.points_per_unit());

    if args.json {
        match serde_json::to_string_pretty(&view) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Ladder payload unavailable: {err}"),
        }
        return Ok(());
    }

    println!(
        "Rank ladder ({} tiers, {} points per person helped)",
        view.tiers.len(),
        view.points_per_person
    );
    for tier in &view.tiers {
        let range = match tier.max_points {
            Some(max) => format!("{} - {} points", tier.points_required, max),
            None => format!("{}+ points", tier.points_required),
        };
        let icon = if tier.icon.is_empty() { "-" } else { &tier.icon };
        println!("{:>2}. {} {:<10} {}", tier.level, icon, tier.name, range);
        if !tier.lore.is_empty() {
            println!("      \"{}\"", tier.lore);
        }
        if !tier.perks.is_empty() {
            println!("      perks: {}", tier.perks.join(", "));
        }
    }

    Ok(())
}

pub(crate) fn run_simulation(args: SimulateArgs) -> Result<(), AppError> {
    let engine = Arc::new(RankEngine::from_config(&ranking_config(&args.ladder)?)?);
    let repository = Arc::new(InMemoryProgressRepository::default());
    let notifier = Arc::new(LoggingRankUpNotifier::default());
    let service = ProgressService::new(engine, repository, notifier.clone());

    let user_id = UserId(args.user.clone());
    let mut now = Utc::now();
    service.enroll(user_id.clone(), now)?;

    let mut receipts = Vec::new();
    let mut rejected = None;
    for units in &args.units {
        now += Duration::days(1);
        match service.record_impact(&user_id, *units, now) {
            Ok(receipt) => receipts.push(receipt),
            Err(err) => {
                rejected = Some(format!("activity with {units} people helped rejected: {err}"));
                break;
            }
        }
    }

    let record = service.get(&user_id)?;
    let report = SimulationReport {
        receipts,
        rejected,
        progress: ProgressView::from_record(&record, service.engine().ladder()),
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Simulation payload unavailable: {err}"),
        }
        return Ok(());
    }

    render_simulation(&report, notifier.notices().len());
    Ok(())
}

fn render_simulation(report: &SimulationReport, celebrations: usize) {
    println!("Seva rank simulation for {}", report.progress.user_id);
    for (step, receipt) in report.receipts.iter().enumerate() {
        let rank_note = match &receipt.transition {
            Some(transition) if transition.skipped.is_empty() => {
                format!(" | rank up {} -> {}", transition.from, transition.to)
            }
            Some(transition) => format!(
                " | rank up {} -> {} (via {})",
                transition.from,
                transition.to,
                transition.skipped.join(", ")
            ),
            None => String::new(),
        };
        println!(
            "- activity {}: +{} points, total {} ({}){}",
            step + 1,
            receipt.earned,
            receipt.state.points(),
            receipt.state.current_tier(),
            rank_note
        );
    }

    if let Some(reason) = &report.rejected {
        println!("  {reason}");
    }

    let progress = &report.progress.progress;
    match &progress.next {
        Some(next) => {
            println!(
                "\n{} points, {} to {} ({:.0}% of the way)",
                progress.points, progress.points_to_next, next, progress.percent
            );
            if progress.almost_there() {
                println!("Almost there! Just {} more points to {}.", progress.points_to_next, next);
            }
        }
        None => println!(
            "\n{} points, top rank {} reached",
            progress.points, progress.current
        ),
    }

    println!("\nRank history ({celebrations} celebrations sent)");
    for entry in &report.progress.history {
        println!(
            "- {} reached {} at {} points",
            entry.achieved_at.format("%Y-%m-%d"),
            entry.tier,
            entry.points_at_achievement
        );
    }
}
