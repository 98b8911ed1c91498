use egui::{Color32, ColorImage, PointerButton, Pos2, Rect, Sense, TextureHandle, TextureOptions, Vec2};
use std::sync::Arc;

use super::Component;
use super::menu::ContextMenu;
use crate::event::PetMsg;
use crate::model::geometry::Position;
use crate::model::sprite::SpriteLibrary;
use crate::model::state::PetState;

/// Paints the active frame and turns pointer input into pet messages.
#[derive(Default)]
pub struct SpriteView {
    textures: Vec<Vec<TextureHandle>>,
    pending: Option<Arc<SpriteLibrary>>,
    sprite_ix: usize,
    frame_ix: usize,
    origin: Position,
    offset: Vec2,
    hovered: bool,
    menu: ContextMenu,
    menu_open: bool,
}

impl SpriteView {
    pub fn is_ready(&self) -> bool {
        !self.textures.is_empty()
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn sync(&mut self, pet: &PetState) {
        self.sprite_ix = pet.sprite_index();
        self.frame_ix = pet.frame_index();
        self.origin = pet.position();
        self.menu.sync(pet.mode(), pet.is_random());
    }

    /// Where the sprite sits inside the window, non-zero while the menu has
    /// shifted the window.
    pub fn set_sprite_offset(&mut self, offset: Position) {
        self.offset = Vec2::new(offset.x as f32, offset.y as f32);
    }

    fn upload(&mut self, ctx: &egui::Context, library: &SpriteLibrary) {
        self.textures = library
            .sprites
            .iter()
            .map(|sprite| {
                sprite
                    .frames
                    .iter()
                    .enumerate()
                    .map(|(i, frame)| {
                        let (w, h) = frame.image.dimensions();
                        let image = ColorImage::from_rgba_unmultiplied(
                            [w as usize, h as usize],
                            frame.image.as_raw(),
                        );
                        ctx.load_texture(format!("{}#{}", sprite.name, i), image, TextureOptions::NEAREST)
                    })
                    .collect()
            })
            .collect();
    }

    fn current_texture(&self) -> Option<&TextureHandle> {
        self.textures.get(self.sprite_ix)?.get(self.frame_ix)
    }

}

/// Screen coordinates of a window-local point. The window's reported position
/// is preferred since viewport moves land a few frames late; the last
/// requested position is the fallback.
fn to_screen(window_min: Option<Pos2>, requested: Position, local: Pos2) -> (i32, i32) {
    let min = window_min.unwrap_or(Pos2::new(requested.x as f32, requested.y as f32));
    let screen = min + local.to_vec2();
    (screen.x.round() as i32, screen.y.round() as i32)
}

impl Component for SpriteView {
    fn update(&mut self, msg: &PetMsg) -> Option<PetMsg> {
        if let PetMsg::SpritesLoaded(library) = msg {
            self.pending = Some(library.clone());
        }
        None
    }

    fn ui(&mut self, ui: &mut egui::Ui, outbox: &mut Vec<PetMsg>) {
        if let Some(library) = self.pending.take() {
            self.upload(ui.ctx(), &library);
        }

        let Some(texture) = self.current_texture() else {
            return;
        };
        let texture_id = texture.id();
        let size = Vec2::new(texture.size()[0] as f32, texture.size()[1] as f32);

        let rect = Rect::from_min_size(ui.max_rect().min + self.offset, size);
        let response = ui.allocate_rect(rect, Sense::click_and_drag());
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        ui.painter().image(texture_id, rect, uv, Color32::WHITE);

        let hovered = ui.input(|i| i.pointer.hover_pos().is_some());
        if hovered != self.hovered {
            self.hovered = hovered;
            outbox.push(if hovered {
                PetMsg::PointerEntered
            } else {
                PetMsg::PointerLeft
            });
        }

        if response.clicked() {
            outbox.push(PetMsg::PrimaryClick);
        }
        if response.dragged_by(PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                let window_min = ui.input(|i| i.viewport().inner_rect).map(|r| r.min);
                let (x, y) = to_screen(window_min, self.origin, pos);
                outbox.push(PetMsg::DragTo { x, y });
            }
        }
        if ui.input(|i| i.pointer.primary_released()) {
            outbox.push(PetMsg::DragReleased);
        }

        self.menu_open = self.menu.attach(&response, outbox);
    }
}
