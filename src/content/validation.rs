//! Validation for tuning values in content definitions.

use super::registry::ContentRegistry;

/// A validation error with context about what failed.
#[derive(Debug)]
pub struct ValidationError {
    pub source_type: &'static str,
    pub source_id: String,
    pub field: String,
    pub problem: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} '{}' has invalid '{}': {}",
            self.source_type, self.source_id, self.field, self.problem
        )
    }
}

/// Helper macro for recording a failed check
macro_rules! check {
    ($errors:expr, $ok:expr, $source_id:expr, $field:expr, $($problem:tt)+) => {
        if !$ok {
            $errors.push(ValidationError {
                source_type: "Boss",
                source_id: $source_id.to_string(),
                field: $field.to_string(),
                problem: format!($($problem)+),
            });
        }
    };
}

/// Validate all tuning values in the registry.
/// Returns a list of validation errors, empty if everything is in range.
pub fn validate_content(registry: &ContentRegistry) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut ids: Vec<&String> = registry.bosses.keys().collect();
    ids.sort();

    for id in ids {
        let Some(boss) = registry.bosses.get(id) else {
            continue;
        };
        let brain = &boss.brain;

        check!(
            errors,
            boss.max_health > 0.0,
            id,
            "max_health",
            "must be positive, got {}",
            boss.max_health
        );
        check!(
            errors,
            brain.base_move_speed >= 0.0,
            id,
            "base_move_speed",
            "must not be negative, got {}",
            brain.base_move_speed
        );
        check!(
            errors,
            brain.hit_reaction_seconds >= 0.0,
            id,
            "hit_reaction_seconds",
            "must not be negative, got {}",
            brain.hit_reaction_seconds
        );

        // Pattern cooldowns
        for pattern in crate::brain::Pattern::ACTIONS {
            let Some(tuning) = brain.selector.patterns.get(pattern) else {
                continue;
            };
            let field = format!("selector.patterns.{}", pattern.name());
            check!(
                errors,
                tuning.base_cooldown >= 0.0,
                id,
                format!("{field}.base_cooldown"),
                "must not be negative, got {}",
                tuning.base_cooldown
            );
            check!(
                errors,
                tuning.base_weight > 0.0,
                id,
                format!("{field}.base_weight"),
                "must be positive, got {}",
                tuning.base_weight
            );
        }

        check!(
            errors,
            (0.0..=1.0).contains(&brain.selector.combo_probability),
            id,
            "selector.combo_probability",
            "must be within [0, 1], got {}",
            brain.selector.combo_probability
        );
        check!(
            errors,
            brain.selector.repetition_floor > 0.0 && brain.selector.repetition_floor <= 1.0,
            id,
            "selector.repetition_floor",
            "must be within (0, 1], got {}",
            brain.selector.repetition_floor
        );

        // Phases
        let mut thresholds: Vec<f32> = Vec::new();
        for (index, phase) in brain.phases.iter().enumerate() {
            let field = format!("phases[{index}]");
            check!(
                errors,
                phase.hp_threshold > 0.0 && phase.hp_threshold <= 1.0,
                id,
                format!("{field}.hp_threshold"),
                "must be within (0, 1], got {}",
                phase.hp_threshold
            );
            check!(
                errors,
                !thresholds.contains(&phase.hp_threshold),
                id,
                format!("{field}.hp_threshold"),
                "duplicates another phase threshold ({})",
                phase.hp_threshold
            );
            thresholds.push(phase.hp_threshold);

            for (name, value) in [
                ("damage_multiplier", phase.damage_multiplier),
                ("attack_speed_multiplier", phase.attack_speed_multiplier),
                ("cooldown_multiplier", phase.cooldown_multiplier),
            ] {
                check!(
                    errors,
                    value > 0.0,
                    id,
                    format!("{field}.{name}"),
                    "must be positive, got {}",
                    value
                );
            }
        }

        // Escalation
        let escalation = &brain.escalation;
        check!(
            errors,
            (0.0..=1.0).contains(&escalation.health_threshold),
            id,
            "escalation.health_threshold",
            "must be within [0, 1], got {}",
            escalation.health_threshold
        );
        check!(
            errors,
            escalation.timeout_seconds > 0.0,
            id,
            "escalation.timeout_seconds",
            "must be positive, got {}",
            escalation.timeout_seconds
        );
        for (name, value) in [
            ("damage_multiplier", escalation.damage_multiplier),
            ("speed_multiplier", escalation.speed_multiplier),
            ("cooldown_multiplier", escalation.cooldown_multiplier),
        ] {
            check!(
                errors,
                value > 0.0,
                id,
                format!("escalation.{name}"),
                "must be positive, got {}",
                value
            );
        }

        // Poise
        check!(
            errors,
            brain.poise.max > 0.0,
            id,
            "poise.max",
            "must be positive, got {}",
            brain.poise.max
        );
        check!(
            errors,
            brain.poise.regen_per_second >= 0.0,
            id,
            "poise.regen_per_second",
            "must not be negative, got {}",
            brain.poise.regen_per_second
        );

        // Animation timings
        for (name, seconds) in boss.animation_seconds.iter() {
            check!(
                errors,
                seconds >= 0.0,
                id,
                format!("animation_seconds.{name}"),
                "must not be negative, got {}",
                seconds
            );
        }
    }

    errors
}
