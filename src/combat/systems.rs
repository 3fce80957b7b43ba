//! Combat domain: combat systems for input, attack resolution, damage and deaths.

use std::collections::{HashMap, HashSet};

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::brain::{BossBrain, Pattern};
use crate::combat::components::{Ally, Boss, Health, Target};
use crate::combat::events::{AttackCommittedEvent, BossDefeatedEvent, DamageEvent, DeathEvent};
use crate::combat::resources::CombatTuning;
use crate::combat::spawn::spawn_ally;
use crate::core::FightEndedEvent;

/// Space hits every boss; K kills every summoned ally
pub(crate) fn read_sandbox_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    tuning: Res<CombatTuning>,
    boss_query: Query<Entity, With<Boss>>,
    ally_query: Query<Entity, With<Ally>>,
    mut damage_events: MessageWriter<DamageEvent>,
    mut death_events: MessageWriter<DeathEvent>,
) {
    if keyboard.just_pressed(KeyCode::Space) {
        for boss in &boss_query {
            damage_events.write(DamageEvent {
                source: None,
                target: boss,
                amount: tuning.hit_damage,
                poise_damage: tuning.hit_poise_damage,
            });
        }
    }

    if keyboard.just_pressed(KeyCode::KeyK) {
        for ally in &ally_query {
            death_events.write(DeathEvent { entity: ally });
        }
    }
}

/// Arrow keys move the target
pub(crate) fn move_target(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    tuning: Res<CombatTuning>,
    mut target_query: Query<&mut Transform, With<Target>>,
) {
    let mut dir = Vec2::ZERO;
    if keyboard.pressed(KeyCode::ArrowLeft) {
        dir.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::ArrowRight) {
        dir.x += 1.0;
    }
    if keyboard.pressed(KeyCode::ArrowUp) {
        dir.y += 1.0;
    }
    if keyboard.pressed(KeyCode::ArrowDown) {
        dir.y -= 1.0;
    }
    if dir == Vec2::ZERO {
        return;
    }

    let step = tuning.to_pixels(dir.normalize() * tuning.target_speed * time.delta_secs());
    for mut transform in &mut target_query {
        transform.translation.x += step.x;
        transform.translation.y += step.y;
    }
}

/// Turn committed attack intents into damage or summons.
pub(crate) fn resolve_boss_attacks(
    mut commands: Commands,
    mut attack_events: MessageReader<AttackCommittedEvent>,
    tuning: Res<CombatTuning>,
    target_query: Query<(Entity, &Transform), With<Target>>,
    boss_query: Query<(&Transform, &BossBrain), With<Boss>>,
    ally_query: Query<&Ally>,
    mut damage_events: MessageWriter<DamageEvent>,
) {
    // Spawns are deferred, so this frame's summons are counted here
    let mut allies: HashMap<Entity, u32> = HashMap::new();
    for ally in &ally_query {
        *allies.entry(ally.owner).or_default() += 1;
    }

    for event in attack_events.read() {
        let Ok((boss_transform, brain)) = boss_query.get(event.boss) else {
            continue;
        };
        let boss_pos = boss_transform.translation.truncate();

        if event.pattern == Pattern::Summon {
            let alive = allies.entry(event.boss).or_default();
            let cap = brain.core().config.selector.max_allies;
            let count = tuning.summons_allowed(*alive, cap);
            for i in 0..count {
                let angle = i as f32 * std::f32::consts::TAU / count as f32;
                let offset = Vec2::from_angle(angle) * tuning.to_pixels(Vec2::splat(2.0)).x;
                spawn_ally(&mut commands, event.boss, boss_pos + offset, &tuning);
            }
            *alive += count;
            info!("Boss {:?} summoned {} allies", event.boss, count);
            continue;
        }

        let Some((base_damage, reach)) = tuning.strike(event.pattern) else {
            continue;
        };

        for (target, transform) in &target_query {
            let distance = tuning
                .to_units(transform.translation.truncate() - boss_pos)
                .length();
            if distance > reach {
                debug!("{} missed: target {:.1} units away", event.pattern, distance);
                continue;
            }
            damage_events.write(DamageEvent {
                source: Some(event.boss),
                target,
                amount: base_damage * event.damage_multiplier,
                poise_damage: 0.0,
            });
        }
    }
}

pub(crate) fn apply_damage(
    mut damage_events: MessageReader<DamageEvent>,
    mut death_events: MessageWriter<DeathEvent>,
    mut query: Query<(&mut Health, Option<&mut BossBrain>)>,
) {
    for event in damage_events.read() {
        let Ok((mut health, brain)) = query.get_mut(event.target) else {
            continue;
        };
        let dealt = health.take_damage(event.amount);
        debug!(
            "{:?} took {:.1} damage ({:.0}/{:.0})",
            event.target, dealt, health.current, health.max
        );

        match brain {
            // The brain notices zero health on its next tick
            Some(mut brain) => {
                brain.apply_poise_damage(event.poise_damage);
            }
            None => {
                if health.is_dead() {
                    death_events.write(DeathEvent {
                        entity: event.target,
                    });
                }
            }
        }
    }
}

pub(crate) fn process_deaths(
    mut commands: Commands,
    mut death_events: MessageReader<DeathEvent>,
    mut query: Query<(Option<&Ally>, Option<&Target>, &mut Health)>,
) {
    let mut despawned = HashSet::new();

    for event in death_events.read() {
        let Ok((ally, target, mut health)) = query.get_mut(event.entity) else {
            continue;
        };

        if ally.is_some() {
            if despawned.insert(event.entity) {
                commands.entity(event.entity).despawn();
            }
        } else if target.is_some() {
            info!("Target fell and got back up");
            let max = health.max;
            health.heal(max);
        }
    }
}

/// Report defeated bosses to the fight flow
pub(crate) fn handle_boss_defeated(
    mut defeated_events: MessageReader<BossDefeatedEvent>,
    mut boss_query: Query<(&Boss, &BossBrain, &mut Sprite)>,
    mut fight_events: MessageWriter<FightEndedEvent>,
) {
    for event in defeated_events.read() {
        let Ok((boss, brain, mut sprite)) = boss_query.get_mut(event.boss) else {
            continue;
        };
        sprite.color = Color::srgb(0.35, 0.35, 0.35);
        fight_events.write(FightEndedEvent {
            boss_id: boss.def_id.clone(),
            elapsed_combat_seconds: brain.elapsed_combat_seconds(),
        });
    }
}
