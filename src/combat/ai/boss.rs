//! Combat domain: feeding boss brains and carrying out their commands.

use std::collections::HashMap;

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::brain::{BossBrain, BossEvent, FrameInput};
use crate::combat::components::{
    Ally, AllyCount, AllyRoster, Boss, BossAnimator, BossMotor, Health, IntentBuffer, Target,
};
use crate::combat::events::{
    AnimationFinishedEvent, AttackCommittedEvent, BossDefeatedEvent, BossEscalatedEvent,
    BossPhaseChangeEvent, StanceBreakEvent,
};
use crate::combat::resources::CombatTuning;
use crate::core::CombatClockHold;

/// Build each boss's perception and advance its brain by one frame.
pub(crate) fn update_boss_brains(
    time: Res<Time>,
    tuning: Res<CombatTuning>,
    clock_hold: Res<CombatClockHold>,
    target_query: Query<&Transform, With<Target>>,
    ally_query: Query<&Ally>,
    mut boss_query: Query<(
        Entity,
        &Transform,
        &Health,
        &BossMotor,
        &mut AllyRoster,
        &mut BossBrain,
    )>,
) {
    let dt = time.delta_secs();
    let target_pos = target_query
        .iter()
        .next()
        .map(|t| tuning.to_units(t.translation.truncate()));

    let mut allies: HashMap<Entity, u32> = HashMap::new();
    for ally in &ally_query {
        *allies.entry(ally.owner).or_default() += 1;
    }

    for (entity, transform, health, motor, mut roster, mut brain) in &mut boss_query {
        let boss_pos = tuning.to_units(transform.translation.truncate());
        let census = AllyCount(allies.get(&entity).copied().unwrap_or(0));

        if roster.observe(census.0) {
            brain.notify_all_allies_dead();
        }

        let input = match target_pos {
            Some(target) => FrameInput::at(boss_pos, target, health.percent()),
            None => FrameInput {
                health_ratio: health.percent(),
                ..default()
            },
        }
        .with_allies(&census)
        .with_movement(motor);

        brain.set_clock_paused(clock_hold.is_held());
        brain.tick(dt, input);
    }
}

/// Drain every brain's outbox into its collaborators and translate its
/// notifications into combat messages.
pub(crate) fn dispatch_boss_commands(
    mut boss_query: Query<(
        Entity,
        &Boss,
        &mut BossBrain,
        &mut BossMotor,
        &mut BossAnimator,
    )>,
    mut attack_events: MessageWriter<AttackCommittedEvent>,
    mut phase_events: MessageWriter<BossPhaseChangeEvent>,
    mut escalation_events: MessageWriter<BossEscalatedEvent>,
    mut stance_events: MessageWriter<StanceBreakEvent>,
    mut defeated_events: MessageWriter<BossDefeatedEvent>,
) {
    for (entity, boss, mut brain, mut motor, mut animator) in &mut boss_query {
        let mut resolver = IntentBuffer::default();
        brain.dispatch(&mut *animator, &mut *motor, &mut resolver);

        for intent in resolver.intents {
            attack_events.write(AttackCommittedEvent {
                boss: entity,
                pattern: intent.pattern,
                damage_multiplier: intent.damage_multiplier,
            });
        }

        for event in brain.drain_events() {
            match event {
                BossEvent::PatternSelected {
                    pattern,
                    from_combo,
                    combo_started,
                } => {
                    debug!(
                        "Boss '{}' picked {} (combo step: {}, combo opener: {})",
                        boss.def_id, pattern, from_combo, combo_started
                    );
                }
                BossEvent::PhaseTransitionBegan { index, descriptor } => {
                    phase_events.write(BossPhaseChangeEvent {
                        boss: entity,
                        phase_index: index,
                        phase_name: descriptor.map(|d| d.name),
                    });
                }
                BossEvent::Escalated { trigger, .. } => {
                    escalation_events.write(BossEscalatedEvent {
                        boss: entity,
                        trigger,
                    });
                }
                BossEvent::PoiseBroken => {
                    stance_events.write(StanceBreakEvent { boss: entity });
                }
                BossEvent::Died => {
                    defeated_events.write(BossDefeatedEvent { boss: entity });
                }
                BossEvent::PhaseTransitionCompleted { .. } | BossEvent::PoiseRecovered { .. } => {}
            }
        }
    }
}

/// Run each animator's timer and report finished cues back to the brain.
pub(crate) fn advance_boss_animations(
    time: Res<Time>,
    mut boss_query: Query<(Entity, &mut BossAnimator, &mut BossBrain)>,
    mut finished_events: MessageWriter<AnimationFinishedEvent>,
) {
    let dt = time.delta_secs();

    for (entity, mut animator, mut brain) in &mut boss_query {
        let Some(ticket) = animator.advance(dt) else {
            continue;
        };
        if brain.on_animation_complete(ticket) {
            finished_events.write(AnimationFinishedEvent {
                boss: entity,
                ticket,
            });
        }
    }
}

pub(crate) fn apply_boss_movement(
    tuning: Res<CombatTuning>,
    mut boss_query: Query<(&Transform, &mut BossMotor, &mut LinearVelocity), With<Boss>>,
) {
    for (transform, mut motor, mut velocity) in &mut boss_query {
        let position = tuning.to_units(transform.translation.truncate());
        motor.remaining = motor
            .destination
            .map_or(0.0, |destination| position.distance(destination));

        let desired = tuning.to_pixels(motor.desired_velocity(position));
        velocity.x = desired.x;
        velocity.y = desired.y;
    }
}

/// Log phase and escalation changes as they happen
pub(crate) fn log_boss_milestones(
    mut phase_events: MessageReader<BossPhaseChangeEvent>,
    mut escalation_events: MessageReader<BossEscalatedEvent>,
    mut stance_events: MessageReader<StanceBreakEvent>,
    mut sprite_query: Query<&mut Sprite, With<Boss>>,
) {
    for event in stance_events.read() {
        info!("Boss {:?} stance broken", event.boss);
    }

    for event in phase_events.read() {
        info!(
            "Boss {:?} entered phase {} ({})",
            event.boss,
            event.phase_index + 1,
            event.phase_name.as_deref().unwrap_or("unnamed")
        );
    }

    for event in escalation_events.read() {
        info!("Boss {:?} enraged by {:?}", event.boss, event.trigger);
        if let Ok(mut sprite) = sprite_query.get_mut(event.boss) {
            sprite.color = Color::srgb(0.95, 0.1, 0.1);
        }
    }
}
