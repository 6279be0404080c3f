use std::fs;
use std::path::PathBuf;

use seva_rank::config::{LadderPreset, RankingConfig};
use seva_rank::progression::{LadderError, ProgressionError, RankEngine};

fn write_ladder(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "seva-rank-{}-{}.json",
        name,
        std::process::id()
    ));
    fs::write(&path, contents).expect("write ladder fixture");
    path
}

#[test]
fn engine_loads_custom_ladder_file() {
    let path = write_ladder(
        "custom",
        r##"[
            {"name": "Sevak", "points_required": 0, "presentation": {"icon": "🙏", "color": "#9E9E9E"}},
            {"name": "Mavla", "points_required": 50},
            {"name": "Talveer", "points_required": 200}
        ]"##,
    );
    let config = RankingConfig {
        points_per_person: 10,
        ladder: LadderPreset::Swarajya,
        ladder_path: Some(path.clone()),
    };

    let engine = RankEngine::from_config(&config).expect("custom ladder loads");
    fs::remove_file(&path).ok();

    assert_eq!(engine.ladder().tiers().len(), 3);
    assert_eq!(engine.ladder().baseline().presentation.icon, "🙏");
    assert_eq!(engine.tier_for_points(199).name, "Mavla");
    assert_eq!(engine.points_for_impact(3).expect("non-negative"), 30);
}

#[test]
fn unsorted_ladder_file_fails_fast() {
    let path = write_ladder(
        "unsorted",
        r#"[
            {"name": "Sevak", "points_required": 0},
            {"name": "Talveer", "points_required": 100},
            {"name": "Mavla", "points_required": 10}
        ]"#,
    );
    let config = RankingConfig {
        ladder_path: Some(path.clone()),
        ..RankingConfig::default()
    };

    let result = RankEngine::from_config(&config);
    fs::remove_file(&path).ok();

    match result {
        Err(ProgressionError::InvalidLadder(LadderError::NotAscending { tier, index, .. })) => {
            assert_eq!(tier, "Mavla");
            assert_eq!(index, 2);
        }
        other => panic!("expected ladder ordering error, got {other:?}"),
    }
}

#[test]
fn ladder_without_baseline_fails_fast() {
    let path = write_ladder(
        "baseline",
        r#"[{"name": "Mavla", "points_required": 10}]"#,
    );
    let config = RankingConfig {
        ladder_path: Some(path.clone()),
        ..RankingConfig::default()
    };

    let result = RankEngine::from_config(&config);
    fs::remove_file(&path).ok();

    assert!(matches!(
        result,
        Err(ProgressionError::InvalidLadder(LadderError::BaselineNotZero { .. }))
    ));
}

#[test]
fn classic_preset_uses_five_hundred_point_steps() {
    let config = RankingConfig {
        ladder: LadderPreset::Classic,
        ..RankingConfig::default()
    };
    let engine = RankEngine::from_config(&config).expect("preset builds");

    assert_eq!(engine.tier_for_points(499).name, "Sevak");
    assert_eq!(engine.tier_for_points(500).name, "Karyakarta");
    assert_eq!(engine.tier_for_points(1_999).name, "Sardar");
    assert_eq!(engine.tier_for_points(2_000).name, "Senapati");
}
