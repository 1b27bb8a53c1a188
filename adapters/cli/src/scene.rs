//! Translates world snapshots into rendering scenes.

use scrap_station_core::{Event, GameMode, ParticleKind, TileKind};
use scrap_station_rendering::{Color, Scene, ScreenShake, SpriteKey};
use scrap_station_world::{query, StationTile, World};

const HUD_TEXT_SIZE: f32 = 20.0;
const PALETTE_TEXT_SIZE: f32 = 10.0;
const GAME_OVER_TEXT_SIZE: f32 = 30.0;
const PALETTE_X: f32 = 246.0;
const PALETTE_STRIDE: f32 = 48.0;

/// Frames per radian of the unpowered overlay pulse.
const UNPOWERED_PULSE_PERIOD: f32 = 25.0;

/// Rebuilds the scene each frame and keeps the camera shake between frames.
#[derive(Debug, Default)]
pub(crate) struct ScenePainter {
    shake: ScreenShake,
}

impl ScenePainter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feeds the frame's events into presentation-only state.
    pub(crate) fn absorb(&mut self, events: &[Event]) {
        for event in events {
            if let Event::ScreenShake { intensity } = event {
                self.shake.trigger(*intensity);
            }
        }
    }

    /// Replaces the scene content with the current world.
    pub(crate) fn paint(&mut self, world: &World, scene: &mut Scene) {
        scene.clear();
        scene.shake_offset = self.shake.advance();

        let state = query::game_state(world);
        let station = query::station(world);
        let game_timer = state.game_timer();

        for (_, tile) in station.iter() {
            paint_tile(scene, tile, game_timer);
        }
        if state.mode() == GameMode::Build {
            let cursor = station.cell_position(station.cursor());
            scene.draw(SpriteKey::Cursor, cursor.x, cursor.y);
        }

        for (_, asteroid) in query::asteroids(world).iter() {
            scene.draw_rotated(
                SpriteKey::asteroid(asteroid.size),
                asteroid.position.x,
                asteroid.position.y,
                asteroid.direction.to_degrees(),
            );
        }

        for particle in query::particles(world).drawn() {
            let sprite = match particle.kind {
                ParticleKind::Pow => SpriteKey::pow(particle.animation_frame()),
                ParticleKind::Scrap => SpriteKey::ScrapParticle,
            };
            scene.draw(sprite, particle.position.x, particle.position.y);
        }

        for (_, rocket) in query::rockets(world).iter() {
            scene.draw_rotated(
                SpriteKey::Rocket,
                rocket.position.x,
                rocket.position.y,
                90.0 - rocket.direction.to_degrees(),
            );
        }

        paint_hud(scene, state.scrap(), state.wave(), state.mode());
    }
}

fn paint_tile(scene: &mut Scene, tile: &StationTile, game_timer: u64) {
    let (x, y) = (tile.position.x, tile.position.y);
    scene.draw(SpriteKey::tile(tile.kind), x, y);

    if tile.is_heavily_damaged() {
        scene.draw(SpriteKey::HeavyDamage, x, y);
    } else if tile.is_damaged() {
        scene.draw(SpriteKey::LightDamage, x, y);
    }

    if !tile.powered {
        scene.draw_tinted(
            SpriteKey::Unpowered,
            x,
            y,
            Color::WHITE.with_alpha(unpowered_alpha(game_timer)),
        );
    }
}

/// Opacity of the unpowered overlay, pulsing between 40 and 255 out of 255.
fn unpowered_alpha(game_timer: u64) -> f32 {
    let pulse = (game_timer as f32 / UNPOWERED_PULSE_PERIOD).sin() * 0.5 + 0.5;
    let alpha = 40.0 + (255.0 - 40.0) * pulse;
    alpha.floor() / 255.0
}

fn paint_hud(scene: &mut Scene, scrap: u32, wave: u32, mode: GameMode) {
    scene.draw(SpriteKey::ScrapIcon, 20.0, 20.0);
    scene.draw_text(
        format!("{scrap:06}"),
        52.0,
        28.0,
        HUD_TEXT_SIZE,
        Color::WHITE,
    );
    scene.draw_text("wave", 20.0, 52.0, HUD_TEXT_SIZE, Color::WHITE);
    scene.draw_text(
        format!("{wave:06}"),
        70.0,
        52.0,
        HUD_TEXT_SIZE,
        Color::WHITE,
    );

    match mode {
        GameMode::Build => {
            for (index, kind) in TileKind::BUILDABLE.into_iter().enumerate() {
                let x = PALETTE_X + index as f32 * PALETTE_STRIDE;
                scene.draw(SpriteKey::tile(kind), x, 10.0);
                scene.draw_text(
                    format!("{} : {}", index + 1, kind.label()),
                    x,
                    42.0,
                    PALETTE_TEXT_SIZE,
                    Color::WHITE,
                );
                if let Some(cost) = kind.build_cost() {
                    scene.draw_text(
                        format!("{cost}$"),
                        x,
                        62.0,
                        PALETTE_TEXT_SIZE,
                        Color::WHITE,
                    );
                }
            }
        }
        GameMode::GameOver => {
            scene.draw_text(
                "GAME OVER",
                200.0,
                100.0,
                GAME_OVER_TEXT_SIZE,
                Color::WHITE,
            );
            scene.draw_text("Press r", 240.0, 200.0, HUD_TEXT_SIZE, Color::WHITE);
        }
        GameMode::Attack => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrap_station_core::{AsteroidSize, Command, CursorStep, WorldPoint};
    use scrap_station_world as world;

    fn texts(scene: &Scene) -> Vec<&str> {
        scene.texts.iter().map(|text| text.text.as_str()).collect()
    }

    #[test]
    fn fresh_world_shows_core_cursor_and_palette() {
        let world = World::new();
        let mut scene = Scene::new();
        ScenePainter::new().paint(&world, &mut scene);

        let origin = query::station(&world).origin();
        assert_eq!(scene.sprites[0].sprite, SpriteKey::Core);
        assert_eq!(scene.sprites[0].position.x, origin.x);
        assert_eq!(scene.sprites[1].sprite, SpriteKey::Cursor);
        assert_eq!(scene.sprites[2].sprite, SpriteKey::ScrapIcon);

        let lines = texts(&scene);
        assert_eq!(&lines[..3], ["000300", "wave", "000000"]);
        assert!(lines.contains(&"3 : gun"));
        assert!(lines.contains(&"40$"));
        assert!(!lines.contains(&"GAME OVER"));
    }

    #[test]
    fn attack_mode_hides_cursor_and_palette() {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(&mut world, Command::StartWave, &mut events);
        world::apply(
            &mut world,
            Command::SpawnAsteroid {
                position: WorldPoint::new(40.0, 40.0),
                size: AsteroidSize::Large,
                direction: std::f32::consts::FRAC_PI_2,
                speed: 0.0,
            },
            &mut events,
        );

        let mut scene = Scene::new();
        ScenePainter::new().paint(&world, &mut scene);

        assert!(!scene
            .sprites
            .iter()
            .any(|sprite| sprite.sprite == SpriteKey::Cursor));
        let asteroid = scene
            .sprites
            .iter()
            .find(|sprite| sprite.sprite == SpriteKey::AsteroidLarge)
            .expect("asteroid drawn");
        assert!((asteroid.rotation_degrees - 90.0).abs() < 1e-3);
        assert_eq!(texts(&scene), ["000300", "wave", "000001"]);
    }

    #[test]
    fn unpowered_tiles_get_a_pulsing_overlay() {
        let mut world = World::new();
        let mut events = Vec::new();
        for _ in 0..3 {
            world::apply(
                &mut world,
                Command::MoveCursor {
                    step: CursorStep::Right,
                },
                &mut events,
            );
            world::apply(
                &mut world,
                Command::BuildTile {
                    kind: TileKind::Wall,
                },
                &mut events,
            );
        }
        world::apply(
            &mut world,
            Command::MoveCursor {
                step: CursorStep::Right,
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::BuildTile {
                kind: TileKind::Forge,
            },
            &mut events,
        );

        let mut scene = Scene::new();
        ScenePainter::new().paint(&world, &mut scene);

        let overlay = scene
            .sprites
            .iter()
            .find(|sprite| sprite.sprite == SpriteKey::Unpowered)
            .expect("distant forge is unpowered");
        assert!((overlay.tint.alpha - unpowered_alpha(0)).abs() < 1e-6);
    }

    #[test]
    fn explosions_show_the_frame_before_aging() {
        let mut world = World::new();
        let mut events = Vec::new();
        let origin = query::station(&world).origin();
        world::apply(
            &mut world,
            Command::SpawnAsteroid {
                position: origin,
                size: AsteroidSize::Small,
                direction: 0.0,
                speed: 0.0,
            },
            &mut events,
        );
        for _ in 0..6 {
            world::apply(&mut world, Command::AdvanceEntities, &mut events);
        }
        assert!(query::asteroids(&world).is_empty());

        let mut scene = Scene::new();
        ScenePainter::new().paint(&world, &mut scene);

        let pows: Vec<SpriteKey> = scene
            .sprites
            .iter()
            .map(|sprite| sprite.sprite)
            .filter(|sprite| matches!(sprite, SpriteKey::Pow0 | SpriteKey::Pow1 | SpriteKey::Pow2))
            .collect();
        assert_eq!(pows, vec![SpriteKey::Pow1], "drawn at 15 frames left, not 14");
    }

    #[test]
    fn unpowered_alpha_spans_the_pulse_range() {
        assert!((unpowered_alpha(0) - 147.0 / 255.0).abs() < 1e-6);
        let peak = (std::f32::consts::FRAC_PI_2 * UNPOWERED_PULSE_PERIOD).round() as u64;
        assert!(unpowered_alpha(peak) > 0.99);
        let trough = (3.0 * std::f32::consts::FRAC_PI_2 * UNPOWERED_PULSE_PERIOD).round() as u64;
        assert!(unpowered_alpha(trough) < 41.0 / 255.0);
    }

    #[test]
    fn screen_shake_follows_events() {
        let world = World::new();
        let mut painter = ScenePainter::new();
        let mut scene = Scene::new();

        painter.absorb(&[Event::ScreenShake { intensity: 2.0 }]);
        painter.paint(&world, &mut scene);
        assert!(scene.shake_offset.length() > 0.0);

        for _ in 0..200 {
            painter.paint(&world, &mut scene);
        }
        assert_eq!(scene.shake_offset.x, 0.0);
        assert_eq!(scene.shake_offset.y, 0.0);
    }
}
