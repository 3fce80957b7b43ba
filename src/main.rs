use avian2d::prelude::*;
use bevy::prelude::*;

use boss_brain::{combat, content, core};

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Boss Brain Sandbox".to_string(),
            resolution: (1280, 720).into(),
            resizable: true,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(PhysicsPlugins::default())
    .insert_resource(Gravity(Vec2::ZERO))
    .add_plugins((
        core::CorePlugin,
        content::ContentPlugin,
        combat::CombatPlugin,
    ));

    #[cfg(feature = "dev-tools")]
    app.add_plugins(boss_brain::debug::DebugPlugin);

    app.run();
}
