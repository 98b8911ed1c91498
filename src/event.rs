use std::sync::Arc;

use crate::model::mode::MenuAction;
use crate::model::sprite::SpriteLibrary;

#[derive(Clone, Debug)]
pub enum PetMsg {
    Tick,
    Quit,

    // Pointer interaction
    PointerEntered,
    PointerLeft,
    PrimaryClick,
    DragTo { x: i32, y: i32 },
    DragReleased,
    Menu(MenuAction),

    // Sprite loading
    SpritesLoaded(Arc<SpriteLibrary>),
    LoadFailed(String),
}
