use crossbeam_channel::{Receiver, unbounded};
use log::{error, info};
use std::path::PathBuf;
use std::time::Instant;

use crate::components::Component;
use crate::components::sprite_view::SpriteView;
use crate::config::PetConfig;
use crate::event::PetMsg;
use crate::loader_worker::LoaderWorker;
use crate::model::geometry::{Position, menu_window};
use crate::model::state::PetState;

pub const APP_NAME: &str = "deskpet";

/// Viewport geometry last sent to the window system.
#[derive(Default)]
struct AppliedGeometry {
    position: Option<Position>,
    size: Option<egui::Vec2>,
}

pub struct PetApp {
    config: PetConfig,
    rx: Receiver<PetMsg>,
    view: SpriteView,
    pet: Option<PetState>,
    applied: AppliedGeometry,
}

impl PetApp {
    pub fn new(config: PetConfig, sources: Vec<PathBuf>) -> Self {
        let (tx, rx) = unbounded();
        LoaderWorker::new(tx).start(sources, config.sprites.scale);

        Self {
            config,
            rx,
            view: SpriteView::default(),
            pet: None,
            applied: AppliedGeometry::default(),
        }
    }

    /// The root viewport for a pet window.
    pub fn viewport() -> egui::ViewportBuilder {
        egui::ViewportBuilder::default()
            .with_title(APP_NAME)
            .with_inner_size([1.0, 1.0])
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top()
            .with_resizable(false)
            .with_taskbar(false)
    }

    fn monitor_size(ctx: &egui::Context) -> Option<(u32, u32)> {
        ctx.input(|i| i.viewport().monitor_size)
            .map(|size| (size.x.round() as u32, size.y.round() as u32))
    }

    fn dispatch(&mut self, ctx: &egui::Context, msg: &PetMsg, now: Instant) {
        self.view.update(msg);

        match msg {
            PetMsg::SpritesLoaded(library) => {
                let screen = self.config.screen_area(Self::monitor_size(ctx));
                match PetState::new(
                    library.metrics(),
                    screen,
                    self.config.behavior(),
                    self.config.motion.seed,
                    now,
                ) {
                    Ok(pet) => {
                        info!("{} sprites ready, roaming {}x{}", library.len(), screen.width, screen.height);
                        self.pet = Some(pet);
                    }
                    Err(e) => {
                        error!("{:#}", e);
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                }
            }
            PetMsg::LoadFailed(err) => {
                error!("{}", err);
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            PetMsg::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            other => {
                if let Some(pet) = self.pet.as_mut() {
                    if let Some(follow) = pet.handle(other, now) {
                        self.dispatch(ctx, &follow, now);
                    }
                }
            }
        }
    }

    fn sync_viewport(&mut self, ctx: &egui::Context) {
        let Some(pet) = &self.pet else {
            return;
        };
        if !self.view.is_ready() {
            return;
        }

        let (w, h) = pet.sprite_size();
        let (mut position, mut size) = (pet.position(), egui::vec2(w as f32, h as f32));
        let mut offset = Position::default();
        if self.view.is_menu_open() {
            let menu = (
                self.config.window.menu_width.round() as i32,
                self.config.window.menu_height.round() as i32,
            );
            (position, offset) = menu_window(position, (w as i32, h as i32), menu, pet.screen());
            size = size.max(egui::vec2(menu.0 as f32, menu.1 as f32));
        }
        self.view.set_sprite_offset(offset);

        if self.applied.size != Some(size) {
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(size));
            self.applied.size = Some(size);
            ctx.request_repaint();
        }
        if self.applied.position != Some(position) {
            ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
                position.x as f32,
                position.y as f32,
            )));
            self.applied.position = Some(position);
        }
    }
}

impl eframe::App for PetApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0; 4]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let mut inbox: Vec<PetMsg> = self.rx.try_iter().collect();

        if let Some(pet) = self.pet.as_mut() {
            pet.set_screen(self.config.screen_area(Self::monitor_size(ctx)));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::default())
            .show(ctx, |ui| {
                if let Some(pet) = &self.pet {
                    self.view.sync(pet);
                }
                self.view.ui(ui, &mut inbox);
            });

        inbox.push(PetMsg::Tick);
        for msg in &inbox {
            self.dispatch(ctx, msg, now);
        }

        self.sync_viewport(ctx);
        ctx.request_repaint_after(self.config.behavior().tick_interval);
    }
}
