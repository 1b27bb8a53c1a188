use glam::Vec2;
use macroquad::{
    color::Color as MacroquadColor,
    math::Vec2 as MacroquadVec2,
    shapes::{
        draw_circle, draw_circle_lines, draw_line, draw_poly, draw_poly_lines, draw_rectangle,
        draw_rectangle_lines, draw_triangle,
    },
};
use scrap_station_rendering::{Color, SpriteInstance, SpriteKey};

/// Edge length of a sheet sprite in logical units.
const SPRITE_EXTENT: f32 = 32.0;

/// Maps logical coordinates onto the window, letterboxing the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SpriteCanvas {
    scale: f32,
    offset: Vec2,
}

impl SpriteCanvas {
    /// Fits a `logical` area into a `screen` area, preserving the aspect ratio.
    pub(crate) fn fit(logical: Vec2, screen: Vec2) -> Self {
        let scale = (screen.x / logical.x).min(screen.y / logical.y).max(0.0);
        let offset = (screen - logical * scale) * 0.5;
        Self { scale, offset }
    }

    /// Pixels per logical unit.
    pub(crate) fn scale(&self) -> f32 {
        self.scale
    }

    /// Converts a logical position into window pixels.
    pub(crate) fn project(&self, point: Vec2) -> Vec2 {
        self.offset + point * self.scale
    }

    /// Draws one sprite, shifted by `shake`.
    pub(crate) fn draw(&self, instance: &SpriteInstance, shake: Vec2) {
        let pen = Pen {
            canvas: *self,
            origin: instance.position + shake,
            radians: instance.rotation_degrees.to_radians(),
            tint: instance.tint,
        };
        pen.sprite(instance.sprite, instance.rotation_degrees);
    }
}

/// Draws primitives in the local frame of a single sprite cell.
struct Pen {
    canvas: SpriteCanvas,
    origin: Vec2,
    radians: f32,
    tint: Color,
}

impl Pen {
    fn sprite(&self, sprite: SpriteKey, degrees: f32) {
        match sprite {
            SpriteKey::Wall => {
                self.panel(rgb(96, 100, 110), rgb(60, 62, 70));
                self.line(Vec2::new(4.0, 16.0), Vec2::new(28.0, 16.0), rgb(60, 62, 70));
            }
            SpriteKey::Generator => {
                self.panel(rgb(36, 54, 92), rgb(20, 30, 56));
                self.triangle(
                    Vec2::new(18.0, 5.0),
                    Vec2::new(9.0, 18.0),
                    Vec2::new(17.0, 18.0),
                    rgb(250, 220, 60),
                );
                self.triangle(
                    Vec2::new(15.0, 14.0),
                    Vec2::new(23.0, 14.0),
                    Vec2::new(14.0, 27.0),
                    rgb(250, 220, 60),
                );
            }
            SpriteKey::Turret => {
                self.panel(rgb(70, 74, 80), rgb(40, 42, 46));
                self.disc(Vec2::splat(16.0), 8.0, rgb(150, 156, 164));
                self.line(Vec2::new(16.0, 16.0), Vec2::new(16.0, 3.0), rgb(210, 214, 220));
            }
            SpriteKey::Forge => {
                self.panel(rgb(92, 62, 40), rgb(56, 36, 22));
                self.disc(Vec2::splat(16.0), 7.0, rgb(255, 140, 40));
                self.disc(Vec2::splat(16.0), 3.5, rgb(255, 230, 120));
            }
            SpriteKey::Core => {
                self.panel(rgb(32, 80, 56), rgb(18, 48, 32));
                self.polygon(Vec2::splat(16.0), 6, 10.0, 0.0, rgb(110, 240, 170));
            }
            SpriteKey::LightDamage => {
                self.line(Vec2::new(6.0, 8.0), Vec2::new(14.0, 14.0), rgb(230, 200, 80));
                self.line(Vec2::new(20.0, 22.0), Vec2::new(26.0, 27.0), rgb(230, 200, 80));
            }
            SpriteKey::HeavyDamage => {
                self.line(Vec2::new(4.0, 6.0), Vec2::new(16.0, 16.0), rgb(230, 70, 50));
                self.line(Vec2::new(16.0, 16.0), Vec2::new(28.0, 10.0), rgb(230, 70, 50));
                self.line(Vec2::new(16.0, 16.0), Vec2::new(12.0, 29.0), rgb(230, 70, 50));
                self.line(Vec2::new(22.0, 20.0), Vec2::new(28.0, 28.0), rgb(230, 70, 50));
            }
            SpriteKey::ScrapIcon => {
                self.polygon(Vec2::splat(16.0), 6, 11.0, 30.0, rgb(210, 170, 60));
                self.polygon(Vec2::splat(16.0), 6, 5.0, 30.0, rgb(120, 90, 30));
            }
            SpriteKey::ScrapParticle => {
                self.polygon(Vec2::splat(16.0), 6, 6.0, 30.0, rgb(230, 190, 70));
            }
            SpriteKey::Rocket => {
                self.triangle(
                    Vec2::new(28.0, 16.0),
                    Vec2::new(6.0, 11.0),
                    Vec2::new(6.0, 21.0),
                    rgb(230, 230, 235),
                );
                self.disc(Vec2::new(5.0, 16.0), 2.5, rgb(255, 150, 40));
            }
            SpriteKey::Pow0 => self.burst(6.0),
            SpriteKey::Pow1 => self.burst(10.0),
            SpriteKey::Pow2 => self.burst(14.0),
            SpriteKey::AsteroidSmall => self.rock(6.0, degrees),
            SpriteKey::AsteroidMedium => self.rock(10.0, degrees),
            SpriteKey::AsteroidLarge => self.rock(15.0, degrees),
            SpriteKey::Unpowered => {
                self.outline(rgb(220, 40, 40));
                self.line(Vec2::new(8.0, 8.0), Vec2::new(24.0, 24.0), rgb(220, 40, 40));
                self.line(Vec2::new(24.0, 8.0), Vec2::new(8.0, 24.0), rgb(220, 40, 40));
            }
            SpriteKey::Cursor => self.outline(rgb(255, 255, 255)),
        }
    }

    fn burst(&self, radius: f32) {
        self.disc(Vec2::splat(16.0), radius, rgb(255, 120, 30));
        self.disc(Vec2::splat(16.0), radius * 0.5, rgb(255, 230, 140));
    }

    fn rock(&self, radius: f32, degrees: f32) {
        self.polygon(Vec2::splat(16.0), 7, radius, degrees, rgb(120, 104, 92));
        let centre = self.to_screen(Vec2::splat(16.0));
        draw_poly_lines(
            centre.x,
            centre.y,
            7,
            radius * self.canvas.scale(),
            degrees,
            1.0,
            self.paint(rgb(70, 60, 54)),
        );
    }

    fn panel(&self, fill: Color, edge: Color) {
        let corner = self.to_screen(Vec2::ONE);
        let size = (SPRITE_EXTENT - 2.0) * self.canvas.scale();
        draw_rectangle(corner.x, corner.y, size, size, self.paint(fill));
        draw_rectangle_lines(
            corner.x,
            corner.y,
            size,
            size,
            2.0 * self.canvas.scale(),
            self.paint(edge),
        );
    }

    fn outline(&self, color: Color) {
        let corner = self.to_screen(Vec2::ZERO);
        let size = SPRITE_EXTENT * self.canvas.scale();
        draw_rectangle_lines(
            corner.x,
            corner.y,
            size,
            size,
            2.0 * self.canvas.scale(),
            self.paint(color),
        );
    }

    fn disc(&self, centre: Vec2, radius: f32, color: Color) {
        let centre = self.to_screen(centre);
        draw_circle(
            centre.x,
            centre.y,
            radius * self.canvas.scale(),
            self.paint(color),
        );
        if radius > 8.0 {
            draw_circle_lines(
                centre.x,
                centre.y,
                radius * self.canvas.scale(),
                1.0,
                self.paint(color.lighten(0.3)),
            );
        }
    }

    fn polygon(&self, centre: Vec2, sides: u8, radius: f32, degrees: f32, color: Color) {
        let centre = self.to_screen(centre);
        draw_poly(
            centre.x,
            centre.y,
            sides,
            radius * self.canvas.scale(),
            degrees,
            self.paint(color),
        );
    }

    fn triangle(&self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        draw_triangle(
            to_macroquad(self.to_screen(a)),
            to_macroquad(self.to_screen(b)),
            to_macroquad(self.to_screen(c)),
            self.paint(color),
        );
    }

    fn line(&self, from: Vec2, to: Vec2, color: Color) {
        let from = self.to_screen(from);
        let to = self.to_screen(to);
        draw_line(
            from.x,
            from.y,
            to.x,
            to.y,
            2.0 * self.canvas.scale(),
            self.paint(color),
        );
    }

    /// Rotates a cell-local point around the cell centre and projects it.
    fn to_screen(&self, local: Vec2) -> Vec2 {
        let centre = Vec2::splat(SPRITE_EXTENT * 0.5);
        let rotated = Vec2::from_angle(self.radians).rotate(local - centre) + centre;
        self.canvas.project(self.origin + rotated)
    }

    fn paint(&self, color: Color) -> MacroquadColor {
        crate::to_macroquad_color(Color::new(
            color.red * self.tint.red,
            color.green * self.tint.green,
            color.blue * self.tint.blue,
            color.alpha * self.tint.alpha,
        ))
    }
}

const fn rgb(red: u8, green: u8, blue: u8) -> Color {
    Color::from_rgb_u8(red, green, blue)
}

fn to_macroquad(point: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(point.x, point.y)
}
