use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionMode {
    #[default]
    Stay,
    Float,
    Chase,
    Drag,
}

impl MotionMode {
    /// Modes random mode is allowed to pick.
    pub const RANDOM_POOL: [MotionMode; 3] = [MotionMode::Stay, MotionMode::Float, MotionMode::Chase];

    pub fn name(&self) -> &'static str {
        match self {
            MotionMode::Stay => "stay",
            MotionMode::Float => "float",
            MotionMode::Chase => "chase",
            MotionMode::Drag => "drag",
        }
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, MotionMode::Float | MotionMode::Chase)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Random,
    Stay,
    Float,
    Chase,
    Drag,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 6] = [
        MenuAction::Random,
        MenuAction::Stay,
        MenuAction::Float,
        MenuAction::Chase,
        MenuAction::Drag,
        MenuAction::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::Random => "Random",
            MenuAction::Stay => "Stay",
            MenuAction::Float => "Float",
            MenuAction::Chase => "Chase",
            MenuAction::Drag => "Drag",
            MenuAction::Exit => "Exit",
        }
    }

    /// The motion mode a menu entry selects, if any.
    pub fn mode(&self) -> Option<MotionMode> {
        match self {
            MenuAction::Stay => Some(MotionMode::Stay),
            MenuAction::Float => Some(MotionMode::Float),
            MenuAction::Chase => Some(MotionMode::Chase),
            MenuAction::Drag => Some(MotionMode::Drag),
            MenuAction::Random | MenuAction::Exit => None,
        }
    }
}
