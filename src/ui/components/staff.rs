use std::collections::VecDeque;
use egui::{Color32, FontId, Align2, Pos2, Sense, Stroke, Ui, Vec2};
use crate::core::pitch::Semitone;

const STAFF_TOP: f32 = 50.0;
const LINE_SPACING: f32 = 14.0;
const NOTE_SPACING: f32 = 30.0;
const STAFF_LEFT_MARGIN: f32 = 50.0;
const STAFF_HEIGHT: f32 = 170.0;
const STEM_HEIGHT: f32 = 35.0;
/// Bottom line of the treble staff
const E4: u8 = 64;
/// Middle line of the treble staff
const B4: u8 = 71;

/// Vertical position of a note head, treble clef
pub fn staff_y(semitone: Semitone, top: f32) -> f32 {
    let bottom_line = top + 4.0 * LINE_SPACING;
    let e4 = Semitone::new(E4).map(|s| s.diatonic_index()).unwrap_or(30);
    let steps = semitone.diatonic_index() - e4;
    bottom_line - steps as f32 * LINE_SPACING / 2.0
}

/// Scrolling single-row record of struck notes
pub struct StaffView {
    notes: VecDeque<Semitone>,
    capacity: usize,
}

impl StaffView {
    pub fn new() -> Self {
        Self {
            notes: VecDeque::new(),
            capacity: 32,
        }
    }

    pub fn notes(&self) -> impl Iterator<Item = &Semitone> {
        self.notes.iter()
    }

    /// Append a note, shifting the row left once it is full
    pub fn push(&mut self, semitone: Semitone) {
        self.notes.push_back(semitone);
        while self.notes.len() > self.capacity {
            self.notes.pop_front();
        }
    }

    pub fn reset(&mut self) {
        self.notes.clear();
    }

    fn set_width(&mut self, width: f32) {
        let fit = ((width - STAFF_LEFT_MARGIN) / NOTE_SPACING).floor().max(1.0) as usize;
        self.capacity = fit;
        while self.notes.len() > self.capacity {
            self.notes.pop_front();
        }
    }

    pub fn show(&mut self, ui: &mut Ui) {
        let width = ui.available_width();
        self.set_width(width);

        let (rect, _) = ui.allocate_exact_size(Vec2::new(width, STAFF_HEIGHT), Sense::hover());
        if !ui.is_rect_visible(rect) {
            return;
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 4.0, Color32::from_rgb(252, 250, 242));
        let ink = Stroke::new(1.0, Color32::BLACK);
        let top = rect.top() + STAFF_TOP;

        for i in 0..5 {
            let y = top + i as f32 * LINE_SPACING;
            painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], ink);
        }

        let bottom_line = top + 4.0 * LINE_SPACING;
        let middle = Semitone::new(B4).map(|s| staff_y(s, top)).unwrap_or(top + 2.0 * LINE_SPACING);

        for (i, semitone) in self.notes.iter().enumerate() {
            let x = rect.left() + STAFF_LEFT_MARGIN + i as f32 * NOTE_SPACING;
            let y = staff_y(*semitone, top);

            // Ledger lines above and below the staff
            let mut ledger = bottom_line + LINE_SPACING;
            while ledger <= y + 0.5 {
                painter.line_segment([Pos2::new(x - 11.0, ledger), Pos2::new(x + 11.0, ledger)], ink);
                ledger += LINE_SPACING;
            }
            let mut ledger = top - LINE_SPACING;
            while ledger >= y - 0.5 {
                painter.line_segment([Pos2::new(x - 11.0, ledger), Pos2::new(x + 11.0, ledger)], ink);
                ledger -= LINE_SPACING;
            }

            painter.add(egui::Shape::ellipse_filled(Pos2::new(x, y), Vec2::new(7.0, 5.0), Color32::BLACK));

            if y > middle {
                painter.line_segment([Pos2::new(x + 7.0, y), Pos2::new(x + 7.0, y - STEM_HEIGHT)], ink);
            } else {
                painter.line_segment([Pos2::new(x - 7.0, y), Pos2::new(x - 7.0, y + STEM_HEIGHT)], ink);
            }

            if semitone.is_accidental() {
                painter.text(
                    Pos2::new(x - 14.0, y),
                    Align2::CENTER_CENTER,
                    "#",
                    FontId::proportional(14.0),
                    Color32::BLACK,
                );
            }
        }
    }
}

impl Default for StaffView {
    fn default() -> Self {
        Self::new()
    }
}
