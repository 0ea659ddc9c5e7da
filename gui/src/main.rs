use anyhow::Context as _;
use eframe::egui;
use eframe::egui::{Color32, Pos2, Ui};
use eframe::run_native;
use life_engine::{CellState, Command, Config, SinkError, Snapshot, SnapshotSink, Worker};
use std::sync::{Arc, Mutex};

/// Latest frame published by the simulation worker.
type SharedFrame = Arc<Mutex<Option<Snapshot>>>;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::from_env().context("invalid LIFEGAME_* setting")?;
    log::info!(
        "cell size {} px, step every {} ms",
        config.cell_size,
        config.step_interval.as_millis()
    );

    run_native(
        "Life Game",
        eframe::NativeOptions::default(),
        Box::new(move |cc| {
            let frame: SharedFrame = Arc::new(Mutex::new(None));
            let sink = FrameSink {
                frame: Arc::clone(&frame),
                ctx: cc.egui_ctx.clone(),
            };
            // The worker thread owns the grid; the UI only sends commands and
            // reads published frames.
            let worker = Worker::spawn(config, sink)?;
            Ok(Box::new(LifeGame::new(config, worker, frame)))
        }),
    )
    .map_err(|err| anyhow::anyhow!("window closed with error: {err}"))
}

struct FrameSink {
    frame: SharedFrame,
    ctx: egui::Context,
}

impl SnapshotSink for FrameSink {
    fn deliver(&mut self, snapshot: Snapshot) -> Result<(), SinkError> {
        let mut frame = self.frame.lock().map_err(|_| SinkError::SurfaceUnavailable)?;
        *frame = Some(snapshot);
        drop(frame);
        self.ctx.request_repaint();
        Ok(())
    }
}

struct LifeGame {
    config: Config,
    worker: Worker,
    frame: SharedFrame,
    /// Board size in whole cells, as last reported to the worker.
    board_cells: Option<(u32, u32)>,
    last_pointer: Option<Pos2>,
    paused: bool,
}

impl LifeGame {
    fn new(config: Config, worker: Worker, frame: SharedFrame) -> Self {
        Self {
            config,
            worker,
            frame,
            board_cells: None,
            last_pointer: None,
            paused: false,
        }
    }

    fn send(&self, command: Command) {
        if let Err(err) = self.worker.send(command) {
            log::error!("dropped {command:?}: {err}");
        }
    }

    fn counts(&self) -> (u64, usize, usize) {
        match self.frame.lock() {
            Ok(frame) => frame
                .as_ref()
                .map(|snapshot| (snapshot.generation, snapshot.alive_count, snapshot.dead_count))
                .unwrap_or_default(),
            Err(_) => (0, 0, 0),
        }
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.send(if self.paused { Command::Pause } else { Command::Resume });
    }

    fn draw_board(&mut self, ui: &mut Ui) {
        let size = ui.available_size();
        let cell_size = self.config.cell_size as f32;
        let (width, height) = (size.x.max(0.0) as u32, size.y.max(0.0) as u32);
        let cells = (width / self.config.cell_size, height / self.config.cell_size);
        if self.board_cells != Some(cells) {
            self.board_cells = Some(cells);
            self.paused = false;
            self.send(Command::Resize { width, height });
        }

        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());

        // Press and drag paint cells alive with stepping frozen; release resumes.
        if response.is_pointer_button_down_on() {
            if let Some(pos) = response.interact_pointer_pos() {
                if self.last_pointer != Some(pos) {
                    let local = pos - rect.min;
                    let command = match self.last_pointer {
                        None => Command::PointerDown { x: local.x, y: local.y },
                        Some(_) => Command::PointerMove { x: local.x, y: local.y },
                    };
                    self.last_pointer = Some(pos);
                    self.send(command);
                }
            }
        } else if self.last_pointer.take().is_some() {
            self.paused = false;
            self.send(Command::PointerUp);
        }

        let [r, g, b] = self.config.alive_color;
        let alive = Color32::from_rgb(r, g, b);
        let [r, g, b] = self.config.dead_color;
        let dead = Color32::from_rgb(r, g, b);

        let painter = ui.painter_at(rect);
        let Ok(frame) = self.frame.lock() else {
            return;
        };
        let Some(snapshot) = frame.as_ref() else {
            return;
        };
        for (row, col, state) in snapshot.iter() {
            let min = rect.min + egui::vec2(col as f32 * cell_size, row as f32 * cell_size);
            let color = match state {
                CellState::Alive => alive,
                CellState::Dead => dead,
            };
            painter.rect_filled(egui::Rect::from_min_size(min, egui::vec2(cell_size, cell_size)), 0.0, color);
        }
    }
}

impl eframe::App for LifeGame {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                let (generation, alive, dead) = self.counts();
                ui.label(format!("Generation: {generation}"));
                ui.separator();
                ui.label(format!("Alive: {alive}"));
                ui.separator();
                ui.label(format!("Dead: {dead}"));
                ui.separator();
                if ui.button(if self.paused { "Resume" } else { "Pause" }).clicked() {
                    self.toggle_pause();
                }
                if ui.button("Randomize").clicked() {
                    self.send(Command::Randomize);
                }
            });

            self.draw_board(ui);
        });
    }
}
