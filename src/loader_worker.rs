// Sprite loader running off the UI thread

use crossbeam_channel::Sender;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use crate::event::PetMsg;
use crate::pipeline::library::load_library;

pub struct LoaderWorker {
    tx: Sender<PetMsg>,
}

impl LoaderWorker {
    pub fn new(tx: Sender<PetMsg>) -> Self {
        Self { tx }
    }

    /// Decodes `sources` in the background; the outcome arrives as
    /// `SpritesLoaded` or `LoadFailed`.
    pub fn start(&self, sources: Vec<PathBuf>, scale: f32) -> thread::JoinHandle<()> {
        let tx = self.tx.clone();

        thread::spawn(move || {
            info!("Loading {} sprite files", sources.len());
            let msg = match load_library(&sources, scale) {
                Ok(library) => PetMsg::SpritesLoaded(Arc::new(library)),
                Err(e) => PetMsg::LoadFailed(format!("{:#}", e)),
            };
            let _ = tx.send(msg);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_reports_loaded_library() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dot.png");
        RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])).save(&path).unwrap();

        let (tx, rx) = unbounded();
        LoaderWorker::new(tx).start(vec![path], 2.0).join().unwrap();

        match rx.recv().unwrap() {
            PetMsg::SpritesLoaded(lib) => {
                assert_eq!(lib.len(), 1);
                assert_eq!(lib.metrics()[0].width, 8);
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn test_reports_failure() {
        let dir = tempdir().unwrap();
        let (tx, rx) = unbounded();
        LoaderWorker::new(tx)
            .start(vec![dir.path().join("missing.gif")], 1.0)
            .join()
            .unwrap();

        assert!(matches!(rx.recv().unwrap(), PetMsg::LoadFailed(_)));
    }
}
