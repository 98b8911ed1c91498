use crate::event::PetMsg;

pub mod menu;
pub mod sprite_view;

pub trait Component {
    fn update(&mut self, msg: &PetMsg) -> Option<PetMsg>;

    /// Draws the component, pushing any interaction onto `outbox`.
    fn ui(&mut self, ui: &mut egui::Ui, outbox: &mut Vec<PetMsg>);
}
