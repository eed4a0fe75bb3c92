use crate::state::notify::NotificationKind;
use eframe::egui::{Color32, CornerRadius, Frame, Margin, Stroke};

#[derive(Debug, Clone)]
pub struct Theme {
    pub surface_0: Color32,
    pub surface_1: Color32,
    pub surface_2: Color32,
    pub accent: Color32,
    pub success: Color32,
    pub danger: Color32,
    pub info: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub border_subtle: Color32,
    pub bubble_user: Color32,
    pub bubble_assistant: Color32,
    pub spacing_4: f32,
    pub spacing_8: f32,
    pub spacing_12: f32,
    pub spacing_16: f32,
    pub radius_6: u8,
    pub radius_10: u8,
    pub button_height: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface_0: Color32::from_rgb(0x12, 0x14, 0x1A),
            surface_1: Color32::from_rgb(0x1A, 0x1E, 0x27),
            surface_2: Color32::from_rgb(0x23, 0x29, 0x35),
            accent: Color32::from_rgb(0x8B, 0x5C, 0xF6),
            success: Color32::from_rgb(0x34, 0xD3, 0x99),
            danger: Color32::from_rgb(0xF8, 0x71, 0x71),
            info: Color32::from_rgb(0x60, 0xA5, 0xFA),
            text_primary: Color32::from_rgb(0xE8, 0xEC, 0xF1),
            text_muted: Color32::from_rgb(0x8E, 0x98, 0xA6),
            border_subtle: Color32::from_rgba_premultiplied(255, 255, 255, 14),
            bubble_user: Color32::from_rgb(0x2B, 0x33, 0x4A),
            bubble_assistant: Color32::from_rgb(0x20, 0x26, 0x31),
            spacing_4: 4.0,
            spacing_8: 8.0,
            spacing_12: 12.0,
            spacing_16: 16.0,
            radius_6: 6,
            radius_10: 10,
            button_height: 28.0,
        }
    }
}

impl Theme {
    pub fn card_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_1)
            .stroke(Stroke::new(1.0, self.border_subtle))
            .corner_radius(CornerRadius::same(self.radius_10))
            .inner_margin(Margin::same(self.spacing_12 as i8))
    }

    pub fn bubble_frame(&self, from_user: bool) -> Frame {
        let fill = if from_user {
            self.bubble_user
        } else {
            self.bubble_assistant
        };
        Frame::new()
            .fill(fill)
            .corner_radius(CornerRadius::same(self.radius_10))
            .inner_margin(Margin::symmetric(
                self.spacing_12 as i8,
                self.spacing_8 as i8,
            ))
    }

    pub fn notification_color(&self, kind: NotificationKind) -> Color32 {
        match kind {
            NotificationKind::Success => self.success,
            NotificationKind::Error => self.danger,
            NotificationKind::Info => self.info,
        }
    }
}
