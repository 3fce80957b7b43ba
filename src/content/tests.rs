//! Content domain: unit tests for RON parsing and validation.

use std::path::Path;

use super::{
    AnimationTimings, BossDef, ContentRegistry, load_all_content, parse_boss_definitions,
    validate_content,
};
use crate::brain::{AnimationCue, BossConfig, EnabledPatterns, Pattern, PhaseDescriptor};

const BUNDLED_BOSSES: &str = include_str!("../../assets/data/bosses.ron");

fn registry_with(boss: BossDef) -> ContentRegistry {
    let mut registry = ContentRegistry::default();
    registry.bosses.insert(boss.id.clone(), boss);
    registry
}

fn minimal_boss() -> BossDef {
    BossDef {
        id: "test_boss".to_string(),
        name: "Test Boss".to_string(),
        max_health: 100.0,
        brain: BossConfig::default(),
        animation_seconds: AnimationTimings::default(),
    }
}

#[test]
fn test_bundled_bosses_parse_and_validate() {
    let bosses = parse_boss_definitions(BUNDLED_BOSSES).expect("bundled bosses parse");
    assert!(!bosses.is_empty());

    let mut registry = ContentRegistry::default();
    for boss in bosses {
        registry.bosses.insert(boss.id.clone(), boss);
    }

    let errors = validate_content(&registry);
    assert!(errors.is_empty(), "validation errors: {:?}", errors);

    let warden = registry.boss("stone_warden").expect("warden defined");
    assert_eq!(warden.brain.phases.len(), 3);
    assert!(!warden.brain.phases[0].enabled.area_breath);
}

#[test]
fn test_omitted_fields_fall_back_to_defaults() {
    let source = r#"(
        schema_version: 1,
        items: [
            (
                id: "sparse",
                name: "Sparse",
                max_health: 50.0,
                brain: (
                    phases: [(name: "only", hp_threshold: 1.0)],
                ),
            ),
        ],
    )"#;

    let bosses = parse_boss_definitions(source).expect("sparse boss parses");
    let boss = &bosses[0];
    let defaults = BossConfig::default();

    assert_eq!(boss.brain.selector, defaults.selector);
    assert_eq!(boss.brain.escalation, defaults.escalation);
    assert_eq!(boss.brain.poise, defaults.poise);
    assert_eq!(boss.brain.phases[0].damage_multiplier, 1.0);
    assert_eq!(boss.brain.phases[0].enabled, EnabledPatterns::all());
    assert!(boss.brain.phases[0].plays_transition);
}

#[test]
fn test_parse_error_names_the_file() {
    let err = parse_boss_definitions("(schema_version: 1, items: [ (id: ) ])")
        .expect_err("malformed boss fails");
    assert_eq!(err.file, "bosses.ron");
    assert!(err.to_string().contains("Parse error"));
}

#[test]
fn test_missing_directory_reports_io_error() {
    let Err(errors) = load_all_content(Path::new("does/not/exist")) else {
        panic!("loading from a missing directory should fail");
    };
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("IO error"));
}

#[test]
fn test_validation_flags_bad_phases() {
    let mut boss = minimal_boss();
    boss.brain.phases = vec![
        PhaseDescriptor::new("first", 1.0),
        PhaseDescriptor::new("twin", 1.0),
        PhaseDescriptor {
            damage_multiplier: 0.0,
            ..PhaseDescriptor::new("broken", 1.5)
        },
    ];

    let errors = validate_content(&registry_with(boss));
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();

    assert!(fields.contains(&"phases[1].hp_threshold"));
    assert!(fields.contains(&"phases[2].hp_threshold"));
    assert!(fields.contains(&"phases[2].damage_multiplier"));
    assert!(!fields.contains(&"phases[0].hp_threshold"));
}

#[test]
fn test_validation_flags_bad_tuning() {
    let mut boss = minimal_boss();
    boss.brain.escalation.health_threshold = 1.5;
    boss.brain.poise.max = 0.0;
    boss.brain.selector.patterns.charge.base_cooldown = -1.0;

    let errors = validate_content(&registry_with(boss));
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();

    assert_eq!(errors.len(), 3, "unexpected errors: {:?}", errors);
    assert!(fields.contains(&"escalation.health_threshold"));
    assert!(fields.contains(&"poise.max"));
    assert!(fields.contains(&"selector.patterns.charge.base_cooldown"));
    assert!(errors[0].to_string().starts_with("Boss 'test_boss'"));
}

#[test]
fn test_default_boss_is_valid() {
    assert!(validate_content(&registry_with(minimal_boss())).is_empty());
}

#[test]
fn test_animation_timings_cover_every_cue() {
    let timings = AnimationTimings::default();
    assert_eq!(
        timings.seconds_for(AnimationCue::Pattern(Pattern::AreaBreath)),
        timings.area_breath
    );
    assert_eq!(timings.seconds_for(AnimationCue::Death), timings.death);
    assert_eq!(timings.seconds_for(AnimationCue::Pattern(Pattern::Idle)), 0.0);
    assert_eq!(timings.iter().count(), 8);
}

#[test]
fn test_registry_summary_and_first_boss() {
    let mut registry = registry_with(minimal_boss());
    let mut other = minimal_boss();
    other.id = "alpha".to_string();
    registry.bosses.insert(other.id.clone(), other);

    assert_eq!(registry.total_count(), 2);
    assert_eq!(registry.first_boss().map(|b| b.id.as_str()), Some("alpha"));
    assert!(registry.summary().contains("Bosses: 2 [alpha, test_boss]"));
}
