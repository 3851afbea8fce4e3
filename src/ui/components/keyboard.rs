//! Clickable 88-key piano keyboard.

use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};
use crate::core::pitch::{keyboard_layout, white_key_count, PianoKey, Semitone};

pub const WHITE_KEY_WIDTH: f32 = 40.0;
pub const WHITE_KEY_HEIGHT: f32 = 180.0;
const BLACK_KEY_WIDTH: f32 = WHITE_KEY_WIDTH * 0.6;
const BLACK_KEY_HEIGHT: f32 = WHITE_KEY_HEIGHT * 0.62;
/// Left edge of a black key, in white-key widths past its white key
const BLACK_KEY_OFFSET: f32 = 0.7;

const WHITE_KEY_COLOR: Color32 = Color32::from_rgb(250, 250, 245);
const BLACK_KEY_COLOR: Color32 = Color32::from_rgb(30, 30, 35);
const HELD_COLOR: Color32 = Color32::from_rgb(100, 180, 255);
const SUSTAINED_WHITE: Color32 = Color32::from_rgb(190, 220, 250);
const SUSTAINED_BLACK: Color32 = Color32::from_rgb(70, 110, 150);

/// Visual state of a key for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyShade {
    Idle,
    Held,
    Sustained,
}

pub struct KeyboardView {
    keys: Vec<PianoKey>,
    white_count: usize,
}

impl KeyboardView {
    pub fn new() -> Self {
        Self {
            keys: keyboard_layout(),
            white_count: white_key_count(),
        }
    }

    pub fn width(&self) -> f32 {
        self.white_count as f32 * WHITE_KEY_WIDTH
    }

    /// Rectangle of a key relative to the keyboard's top-left corner
    fn key_rect(key: &PianoKey) -> Rect {
        if key.is_accidental {
            Rect::from_min_size(
                Pos2::new(key.white_index as f32 * WHITE_KEY_WIDTH + WHITE_KEY_WIDTH * BLACK_KEY_OFFSET, 0.0),
                Vec2::new(BLACK_KEY_WIDTH, BLACK_KEY_HEIGHT),
            )
        } else {
            Rect::from_min_size(
                Pos2::new(key.white_index as f32 * WHITE_KEY_WIDTH, 0.0),
                Vec2::new(WHITE_KEY_WIDTH, WHITE_KEY_HEIGHT),
            )
        }
    }

    /// Key under a point relative to the keyboard origin. Black keys sit on top.
    pub fn key_at(&self, point: Pos2) -> Option<Semitone> {
        self.keys
            .iter()
            .filter(|k| k.is_accidental)
            .chain(self.keys.iter().filter(|k| !k.is_accidental))
            .find(|k| Self::key_rect(k).contains(point))
            .map(|k| k.semitone)
    }

    /// Draw the keyboard. Returns the key pressed with the primary button this frame.
    pub fn show(&self, ui: &mut Ui, shade: impl Fn(Semitone) -> KeyShade) -> Option<Semitone> {
        let (rect, response) = ui.allocate_exact_size(
            Vec2::new(self.width(), WHITE_KEY_HEIGHT),
            Sense::click_and_drag(),
        );

        if ui.is_rect_visible(rect) {
            let painter = ui.painter_at(rect);
            let origin = rect.min.to_vec2();

            for key in self.keys.iter().filter(|k| !k.is_accidental) {
                let key_rect = Self::key_rect(key).translate(origin);
                let fill = match shade(key.semitone) {
                    KeyShade::Idle => WHITE_KEY_COLOR,
                    KeyShade::Held => HELD_COLOR,
                    KeyShade::Sustained => SUSTAINED_WHITE,
                };
                painter.rect_filled(key_rect.shrink(0.5), 3.0, fill);
                painter.rect_stroke(key_rect.shrink(0.5), 3.0, Stroke::new(1.0, Color32::from_gray(90)), egui::StrokeKind::Inside);

                if let Some(label) = &key.label {
                    painter.text(
                        key_rect.center_bottom() - Vec2::new(0.0, 12.0),
                        Align2::CENTER_CENTER,
                        label,
                        FontId::proportional(12.0),
                        Color32::from_gray(80),
                    );
                }
            }

            for key in self.keys.iter().filter(|k| k.is_accidental) {
                let key_rect = Self::key_rect(key).translate(origin);
                let fill = match shade(key.semitone) {
                    KeyShade::Idle => BLACK_KEY_COLOR,
                    KeyShade::Held => HELD_COLOR,
                    KeyShade::Sustained => SUSTAINED_BLACK,
                };
                painter.rect_filled(key_rect, 2.0, fill);
            }
        }

        let pressed_at = ui.input(|i| {
            if i.pointer.primary_pressed() {
                i.pointer.interact_pos()
            } else {
                None
            }
        });

        match pressed_at {
            Some(pos) if response.hovered() && rect.contains(pos) => {
                self.key_at(pos - rect.min.to_vec2())
            },
            _ => None,
        }
    }
}

impl Default for KeyboardView {
    fn default() -> Self {
        Self::new()
    }
}
