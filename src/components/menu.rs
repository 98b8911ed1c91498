use crate::event::PetMsg;
use crate::model::mode::{MenuAction, MotionMode};

/// Right-click menu attached to the sprite.
#[derive(Default)]
pub struct ContextMenu {
    pub current: MotionMode,
    pub random: bool,
}

impl ContextMenu {
    pub fn sync(&mut self, current: MotionMode, random: bool) {
        self.current = current;
        self.random = random;
    }

    fn is_selected(&self, action: MenuAction) -> bool {
        match action {
            MenuAction::Random => self.random,
            MenuAction::Exit => false,
            other => !self.random && other.mode() == Some(self.current),
        }
    }

    /// Shows the menu on secondary click. Returns whether it is open.
    pub fn attach(&self, response: &egui::Response, outbox: &mut Vec<PetMsg>) -> bool {
        response
            .context_menu(|ui| {
                for action in MenuAction::ALL {
                    if action == MenuAction::Exit {
                        ui.separator();
                    }
                    if ui
                        .selectable_label(self.is_selected(action), action.label())
                        .clicked()
                    {
                        outbox.push(PetMsg::Menu(action));
                        ui.close_menu();
                    }
                }
            })
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_marks() {
        let mut menu = ContextMenu::default();
        menu.sync(MotionMode::Chase, false);
        assert!(menu.is_selected(MenuAction::Chase));
        assert!(!menu.is_selected(MenuAction::Float));
        assert!(!menu.is_selected(MenuAction::Random));

        menu.sync(MotionMode::Float, true);
        assert!(menu.is_selected(MenuAction::Random));
        assert!(!menu.is_selected(MenuAction::Float));
        assert!(!menu.is_selected(MenuAction::Exit));
    }
}
