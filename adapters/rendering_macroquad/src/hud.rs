//! Overlay drawn on top of the 3D view.

use duskfall_core::{GameStatus, WeaponKind};
use duskfall_rendering::{Color, Hud};

const FONT_SIZE: f32 = 28.0;
const LINE_HEIGHT: f32 = 30.0;
const MARGIN: f32 = 16.0;

/// Status lines shown in the bottom-left corner.
pub(crate) fn status_lines(hud: &Hud) -> Vec<String> {
    vec![
        format!("HEALTH {}/{}", hud.health, hud.max_health),
        format!("SCORE {}", hud.score),
        format!("{} {}", hud.weapon.name().to_uppercase(), hud.ammo),
    ]
}

/// Banner shown while the session is over.
pub(crate) fn banner(hud: &Hud) -> Option<String> {
    match hud.status {
        GameStatus::Playing => None,
        GameStatus::GameOver { score } => {
            Some(format!("GAME OVER - SCORE {score} - PRESS R TO RESTART"))
        }
    }
}

fn weapon_color(weapon: WeaponKind, frame: u32) -> Color {
    let base = match weapon {
        WeaponKind::Shotgun => Color::from_rgb_u8(90, 90, 100),
        WeaponKind::Knife => Color::from_rgb_u8(170, 170, 180),
    };
    // Muzzle flash on the first frames of the shotgun animation.
    if weapon == WeaponKind::Shotgun && (1..=2).contains(&frame) {
        return Color::from_rgb_u8(250, 210, 90);
    }
    base.lighten(frame as f32 * 0.05)
}

pub(crate) fn draw_hud(hud: &Hud, screen_width: f32, screen_height: f32) {
    if hud.damage_flash > 0.0 {
        let flash = Color::from_rgb_u8(200, 0, 0).with_alpha(hud.damage_flash.min(1.0) * 0.5);
        macroquad::shapes::draw_rectangle(
            0.0,
            0.0,
            screen_width,
            screen_height,
            super::to_macroquad_color(flash),
        );
    }

    let weapon_width = screen_width * 0.12;
    let weapon_height = screen_height * 0.25;
    let lift = hud.weapon_frame as f32 * 4.0;
    macroquad::shapes::draw_rectangle(
        (screen_width - weapon_width) * 0.5,
        screen_height - weapon_height + lift,
        weapon_width,
        weapon_height,
        super::to_macroquad_color(weapon_color(hud.weapon, hud.weapon_frame)),
    );

    let text_color = super::to_macroquad_color(Color::from_rgb_u8(240, 240, 240));
    let lines = status_lines(hud);
    let first_baseline = screen_height - MARGIN - LINE_HEIGHT * (lines.len() as f32 - 1.0);
    for (index, line) in lines.iter().enumerate() {
        let baseline = first_baseline + LINE_HEIGHT * index as f32;
        let _ = macroquad::text::draw_text(line, MARGIN, baseline, FONT_SIZE, text_color);
    }

    if let Some(banner) = banner(hud) {
        macroquad::shapes::draw_rectangle(
            0.0,
            0.0,
            screen_width,
            screen_height,
            super::to_macroquad_color(Color::new(0.0, 0.0, 0.0, 0.6)),
        );
        let _ = macroquad::text::draw_text(
            &banner,
            MARGIN * 2.0,
            screen_height * 0.5,
            FONT_SIZE * 1.4,
            text_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use duskfall_core::Ammo;

    use super::*;

    #[test]
    fn status_lines_show_unbounded_knife_ammo() {
        let hud = Hud {
            health: 42,
            max_health: 100,
            score: 300,
            weapon: WeaponKind::Knife,
            ammo: Ammo::Unbounded,
            ..Hud::default()
        };

        assert_eq!(
            status_lines(&hud),
            vec![
                "HEALTH 42/100".to_owned(),
                "SCORE 300".to_owned(),
                "KNIFE max".to_owned(),
            ]
        );
    }

    #[test]
    fn banner_only_appears_after_game_over() {
        let mut hud = Hud::default();
        assert!(banner(&hud).is_none());

        hud.status = GameStatus::GameOver { score: 700 };
        let banner = banner(&hud).expect("game over banner");

        assert!(banner.contains("SCORE 700"));
    }
}
