//! Combat domain: boss, target and ally spawning helpers.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::brain::{BossBrain, BossConfig};
use crate::combat::components::{
    Ally, AllyRoster, Boss, BossAnimator, BossMotor, Combatant, Health, Target,
};
use crate::combat::resources::CombatTuning;
use crate::content::{AnimationTimings, BossDef, ContentRegistry};
use crate::core::FightConfig;

const BOSS_SIZE: f32 = 64.0;
const TARGET_SIZE: f32 = 24.0;
const ALLY_SIZE: f32 = 20.0;

/// Spawn a boss with its brain and collaborators at `position` (pixels)
pub fn spawn_boss(commands: &mut Commands, def: &BossDef, seed: u64, position: Vec2) -> Entity {
    let brain = BossBrain::new(def.brain.clone(), seed);

    commands
        .spawn((
            // Identity & Combat
            (
                Boss {
                    def_id: def.id.clone(),
                },
                Combatant,
                Health::new(def.max_health),
            ),
            // Decision core and its collaborators
            (
                brain,
                BossMotor::default(),
                BossAnimator::new(def.animation_seconds.clone()),
                AllyRoster::default(),
            ),
            // Rendering
            (
                Sprite {
                    color: Color::srgb(0.7, 0.25, 0.2),
                    custom_size: Some(Vec2::splat(BOSS_SIZE)),
                    ..default()
                },
                Transform::from_xyz(position.x, position.y, 0.0),
            ),
            // Physics
            (
                RigidBody::Dynamic,
                Collider::rectangle(BOSS_SIZE, BOSS_SIZE),
                LinearVelocity::default(),
                LinearDamping(3.0),
                LockedAxes::ROTATION_LOCKED,
                GravityScale(0.0),
            ),
        ))
        .id()
}

/// Spawn the entity bosses chase, controlled with the arrow keys
pub fn spawn_target(commands: &mut Commands, position: Vec2) -> Entity {
    commands
        .spawn((
            Target,
            Combatant,
            Health::new(200.0),
            Sprite {
                color: Color::srgb(0.3, 0.6, 0.9),
                custom_size: Some(Vec2::splat(TARGET_SIZE)),
                ..default()
            },
            Transform::from_xyz(position.x, position.y, 0.0),
            RigidBody::Kinematic,
            Collider::circle(TARGET_SIZE * 0.5),
            LinearVelocity::default(),
        ))
        .id()
}

/// Spawn a summoned minion owned by `owner`
pub fn spawn_ally(
    commands: &mut Commands,
    owner: Entity,
    position: Vec2,
    tuning: &CombatTuning,
) -> Entity {
    commands
        .spawn((
            Ally { owner },
            Combatant,
            Health::new(tuning.ally_health),
            Sprite {
                color: Color::srgb(0.9, 0.6, 0.2),
                custom_size: Some(Vec2::splat(ALLY_SIZE)),
                ..default()
            },
            Transform::from_xyz(position.x, position.y, 0.0),
            RigidBody::Dynamic,
            Collider::circle(ALLY_SIZE * 0.5),
            LinearDamping(5.0),
            LockedAxes::ROTATION_LOCKED,
            GravityScale(0.0),
        ))
        .id()
}

/// Spawn the configured boss and a target to fight it.
pub(crate) fn spawn_fight(
    mut commands: Commands,
    config: Res<FightConfig>,
    registry: Option<Res<ContentRegistry>>,
    tuning: Res<CombatTuning>,
) {
    let configured = registry.as_deref().and_then(|registry| match &config.boss_id {
        Some(id) => {
            let def = registry.boss(id);
            if def.is_none() {
                warn!("Boss '{}' is not defined, falling back to the first boss", id);
            }
            def.or_else(|| registry.first_boss())
        }
        None => registry.first_boss(),
    });

    let def = match configured {
        Some(def) => def.clone(),
        None => {
            warn!("No boss definitions loaded, spawning a default boss");
            fallback_boss()
        }
    };

    let boss = spawn_boss(&mut commands, &def, config.seed, Vec2::new(160.0, 0.0));
    spawn_target(&mut commands, tuning.to_pixels(Vec2::new(-6.0, 0.0)));

    info!(
        "Spawned boss '{}' ({:?}) with {} phase(s) and {:.0} health",
        def.name,
        boss,
        def.brain.phases.len(),
        def.max_health
    );
}

fn fallback_boss() -> BossDef {
    BossDef {
        id: "default".to_string(),
        name: "Nameless Boss".to_string(),
        max_health: 500.0,
        brain: BossConfig::default(),
        animation_seconds: AnimationTimings::default(),
    }
}
