#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Scrap Station adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use scrap_station_core::{AsteroidSize, TileKind, Viewport};
use std::{error::Error, fmt};

/// Intensity below which a decaying shake is considered finished.
const SHAKE_CUTOFF: f32 = 0.05;

/// Fraction of the shake intensity retained from one frame to the next.
const SHAKE_DECAY: f32 = 0.85;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white, the neutral tint.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with the alpha channel replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
///
/// Every flag reports a key press edge on this frame, not a held key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Cursor up request.
    pub up: bool,
    /// Cursor down request.
    pub down: bool,
    /// Cursor left request.
    pub left: bool,
    /// Cursor right request.
    pub right: bool,
    /// Build hotkeys 1 through 4.
    pub build: [bool; 4],
    /// Request to launch the next wave.
    pub start_wave: bool,
    /// Request to restart after the core was lost.
    pub restart: bool,
}

/// Sprites of the station sheet, numbered as on the sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKey {
    /// Wall tile.
    Wall,
    /// Generator tile.
    Generator,
    /// Turret tile.
    Turret,
    /// Forge tile.
    Forge,
    /// Core tile.
    Core,
    /// Overlay for tiles below full health.
    LightDamage,
    /// Overlay for tiles below half health.
    HeavyDamage,
    /// Scrap counter icon.
    ScrapIcon,
    /// Floating scrap particle.
    ScrapParticle,
    /// Rocket in flight.
    Rocket,
    /// First explosion frame.
    Pow0,
    /// Second explosion frame.
    Pow1,
    /// Third explosion frame.
    Pow2,
    /// Small asteroid.
    AsteroidSmall,
    /// Medium asteroid.
    AsteroidMedium,
    /// Large asteroid.
    AsteroidLarge,
    /// Pulsing overlay for unpowered tiles.
    Unpowered,
    /// Build cursor.
    Cursor,
}

impl SpriteKey {
    /// Every sprite in sheet order.
    pub const ALL: [SpriteKey; 18] = [
        SpriteKey::Wall,
        SpriteKey::Generator,
        SpriteKey::Turret,
        SpriteKey::Forge,
        SpriteKey::Core,
        SpriteKey::LightDamage,
        SpriteKey::HeavyDamage,
        SpriteKey::ScrapIcon,
        SpriteKey::ScrapParticle,
        SpriteKey::Rocket,
        SpriteKey::Pow0,
        SpriteKey::Pow1,
        SpriteKey::Pow2,
        SpriteKey::AsteroidSmall,
        SpriteKey::AsteroidMedium,
        SpriteKey::AsteroidLarge,
        SpriteKey::Unpowered,
        SpriteKey::Cursor,
    ];

    /// One-based index of the sprite on the sheet.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Wall => 1,
            Self::Generator => 2,
            Self::Turret => 3,
            Self::Forge => 4,
            Self::Core => 5,
            Self::LightDamage => 6,
            Self::HeavyDamage => 7,
            Self::ScrapIcon => 8,
            Self::ScrapParticle => 9,
            Self::Rocket => 10,
            Self::Pow0 => 11,
            Self::Pow1 => 12,
            Self::Pow2 => 13,
            Self::AsteroidSmall => 14,
            Self::AsteroidMedium => 15,
            Self::AsteroidLarge => 16,
            Self::Unpowered => 17,
            Self::Cursor => 18,
        }
    }

    /// Sprite used for a station tile.
    #[must_use]
    pub const fn tile(kind: TileKind) -> Self {
        match kind {
            TileKind::Wall => Self::Wall,
            TileKind::Generator => Self::Generator,
            TileKind::Turret => Self::Turret,
            TileKind::Forge => Self::Forge,
            TileKind::Core => Self::Core,
        }
    }

    /// Sprite used for an asteroid of the given size.
    #[must_use]
    pub const fn asteroid(size: AsteroidSize) -> Self {
        match size {
            AsteroidSize::Small => Self::AsteroidSmall,
            AsteroidSize::Medium => Self::AsteroidMedium,
            AsteroidSize::Large => Self::AsteroidLarge,
        }
    }

    /// Explosion sprite for an animation frame; frames past the last clamp to it.
    #[must_use]
    pub const fn pow(frame: u8) -> Self {
        match frame {
            0 => Self::Pow0,
            1 => Self::Pow1,
            _ => Self::Pow2,
        }
    }
}

/// Sprite placed in the logical viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteInstance {
    /// Sprite to draw.
    pub sprite: SpriteKey,
    /// Top-left corner in logical units.
    pub position: Vec2,
    /// Clockwise rotation around the sprite centre, in degrees.
    pub rotation_degrees: f32,
    /// Tint multiplied into the sprite.
    pub tint: Color,
}

impl SpriteInstance {
    /// Creates an untinted, unrotated sprite.
    #[must_use]
    pub const fn plain(sprite: SpriteKey, position: Vec2) -> Self {
        Self {
            sprite,
            position,
            rotation_degrees: 0.0,
            tint: Color::WHITE,
        }
    }

    /// Creates an untinted sprite rotated by `rotation_degrees`.
    #[must_use]
    pub const fn rotated(sprite: SpriteKey, position: Vec2, rotation_degrees: f32) -> Self {
        Self {
            sprite,
            position,
            rotation_degrees,
            tint: Color::WHITE,
        }
    }

    /// Creates an unrotated sprite with the given tint.
    #[must_use]
    pub const fn tinted(sprite: SpriteKey, position: Vec2, tint: Color) -> Self {
        Self {
            sprite,
            position,
            rotation_degrees: 0.0,
            tint,
        }
    }
}

/// Text line placed in the logical viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct TextInstance {
    /// Text to draw.
    pub text: String,
    /// Top-left corner in logical units.
    pub position: Vec2,
    /// Font size in logical units.
    pub size: f32,
    /// Text color.
    pub color: Color,
}

/// Everything drawn in one frame, in painter's order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Sprites drawn before any text.
    pub sprites: Vec<SpriteInstance>,
    /// Text drawn on top of the sprites.
    pub texts: Vec<TextInstance>,
    /// Offset applied to every sprite to shake the camera.
    pub shake_offset: Vec2,
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the previous frame's content, keeping allocations.
    pub fn clear(&mut self) {
        self.sprites.clear();
        self.texts.clear();
        self.shake_offset = Vec2::ZERO;
    }

    /// Queues a sprite at `(x, y)`.
    pub fn draw(&mut self, sprite: SpriteKey, x: f32, y: f32) {
        self.sprites
            .push(SpriteInstance::plain(sprite, Vec2::new(x, y)));
    }

    /// Queues a sprite at `(x, y)` rotated by `degrees`.
    pub fn draw_rotated(&mut self, sprite: SpriteKey, x: f32, y: f32, degrees: f32) {
        self.sprites
            .push(SpriteInstance::rotated(sprite, Vec2::new(x, y), degrees));
    }

    /// Queues a tinted sprite at `(x, y)`.
    pub fn draw_tinted(&mut self, sprite: SpriteKey, x: f32, y: f32, tint: Color) {
        self.sprites
            .push(SpriteInstance::tinted(sprite, Vec2::new(x, y), tint));
    }

    /// Queues a line of text.
    pub fn draw_text<T>(&mut self, text: T, x: f32, y: f32, size: f32, color: Color)
    where
        T: Into<String>,
    {
        self.texts.push(TextInstance {
            text: text.into(),
            position: Vec2::new(x, y),
            size,
            color,
        });
    }
}

/// Decaying camera shake fed by simulation events.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenShake {
    intensity: f32,
    phase: u32,
}

impl ScreenShake {
    /// Creates a settled camera.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            intensity: 0.0,
            phase: 0,
        }
    }

    /// Current shake strength.
    #[must_use]
    pub const fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Adds `intensity` to the running shake.
    pub fn trigger(&mut self, intensity: f32) {
        if intensity > 0.0 {
            self.intensity += intensity;
        }
    }

    /// Produces this frame's camera offset and decays the shake.
    pub fn advance(&mut self) -> Vec2 {
        if self.intensity < SHAKE_CUTOFF {
            self.intensity = 0.0;
            return Vec2::ZERO;
        }

        self.phase = self.phase.wrapping_add(1);
        let phase = self.phase as f32;
        let offset = Vec2::new((phase * 1.7).sin(), (phase * 2.3).cos()) * self.intensity;
        self.intensity *= SHAKE_DECAY;
        offset
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Logical play area the scene is laid out in.
    pub viewport: Viewport,
    /// Window pixels per logical unit.
    pub scale: f32,
    /// Scene content that should be displayed first.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::InvalidScale`] when `scale` is not a positive
    /// finite number and [`RenderingError::InvalidViewport`] when the viewport
    /// has no area.
    pub fn new<T>(
        window_title: T,
        clear_color: Color,
        viewport: Viewport,
        scale: f32,
        scene: Scene,
    ) -> Result<Self, RenderingError>
    where
        T: Into<String>,
    {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(RenderingError::InvalidScale { scale });
        }
        if !(viewport.width() > 0.0 && viewport.height() > 0.0) {
            return Err(RenderingError::InvalidViewport {
                width: viewport.width(),
                height: viewport.height(),
            });
        }

        Ok(Self {
            window_title: window_title.into(),
            clear_color,
            viewport,
            scale,
            scene,
        })
    }

    /// Window size in pixels.
    #[must_use]
    pub fn window_size(&self) -> (i32, i32) {
        (
            (self.viewport.width() * self.scale).round() as i32,
            (self.viewport.height() * self.scale).round() as i32,
        )
    }
}

/// Rendering backend capable of presenting Scrap Station scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the input captured by the
    /// adapter for this frame and rebuilds the scene before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Scale must be positive so the window has an area.
    InvalidScale {
        /// Provided scale that failed validation.
        scale: f32,
    },
    /// Viewport dimensions must be positive.
    InvalidViewport {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidScale { scale } => {
                write!(f, "scale must be a positive number (received {scale})")
            }
            Self::InvalidViewport { width, height } => {
                write!(
                    f,
                    "viewport must have a positive area (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_indices_follow_sheet_order() {
        for (offset, sprite) in SpriteKey::ALL.iter().enumerate() {
            assert_eq!(usize::from(sprite.index()), offset + 1);
        }
        assert_eq!(SpriteKey::tile(TileKind::Core).index(), 5);
        assert_eq!(SpriteKey::asteroid(AsteroidSize::Small).index(), 14);
        assert_eq!(SpriteKey::pow(7), SpriteKey::Pow2);
    }

    #[test]
    fn presentation_rejects_non_positive_scale_without_panicking() {
        let error = Presentation::new(
            "Scrap Station",
            Color::BLACK,
            Viewport::default(),
            0.0,
            Scene::new(),
        )
        .expect_err("zero scale must be rejected");

        assert_eq!(error, RenderingError::InvalidScale { scale: 0.0 });
        assert!(error.to_string().contains("positive"));
    }

    #[test]
    fn presentation_rejects_empty_viewport() {
        let error = Presentation::new(
            "Scrap Station",
            Color::BLACK,
            Viewport::new(0.0, 420.0),
            2.0,
            Scene::new(),
        )
        .expect_err("empty viewport must be rejected");

        assert!(matches!(error, RenderingError::InvalidViewport { .. }));
    }

    #[test]
    fn window_size_scales_the_viewport() {
        let presentation = Presentation::new(
            "Scrap Station",
            Color::BLACK,
            Viewport::default(),
            2.0,
            Scene::new(),
        )
        .expect("valid presentation");

        assert_eq!(presentation.window_size(), (1280, 840));
    }

    #[test]
    fn screen_shake_decays_to_rest() {
        let mut shake = ScreenShake::new();
        assert_eq!(shake.advance(), Vec2::ZERO);

        shake.trigger(2.0);
        shake.trigger(0.5);
        assert!((shake.intensity() - 2.5).abs() < 1e-6);

        let first = shake.advance();
        assert!(first.length() > 0.0);
        assert!(shake.intensity() < 2.5);

        for _ in 0..200 {
            let _ = shake.advance();
        }
        assert_eq!(shake.intensity(), 0.0);
        assert_eq!(shake.advance(), Vec2::ZERO);
    }

    #[test]
    fn scene_clear_keeps_nothing_from_the_previous_frame() {
        let mut scene = Scene::new();
        scene.draw(SpriteKey::Core, 304.0, 164.0);
        scene.draw_text("wave", 20.0, 52.0, 20.0, Color::WHITE);
        scene.shake_offset = Vec2::ONE;

        scene.clear();

        assert_eq!(scene, Scene::new());
    }

    #[test]
    fn with_alpha_only_touches_alpha() {
        let color = Color::from_rgb_u8(255, 0, 0).with_alpha(0.25);
        assert_eq!(color, Color::new(1.0, 0.0, 0.0, 0.25));
        assert_eq!(Color::BLACK.lighten(1.0), Color::WHITE);
    }
}
