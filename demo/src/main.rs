use std::{env, fs};

use crossbeam::channel::{unbounded, Receiver, Sender};
use eframe::{run_native, App, CreationContext, Frame, NativeOptions};
use egui::{CentralPanel, Context, TopBottomPanel};
use egui_story_graph::events::Event;
use egui_story_graph::{BranchGraphEditor, Choice, Settings, StoryGraph, StoryNode};

const APP_NAME: &str = "Story Graph";
const EVENTS_SHOWN: usize = 8;

pub struct StoryApp {
    graph: StoryGraph,
    settings: Settings,
    path: Option<String>,

    event_publisher: Sender<Event>,
    event_consumer: Receiver<Event>,
    last_events: Vec<String>,
}

impl StoryApp {
    fn new(_: &CreationContext<'_>, path: Option<String>) -> Self {
        let graph = path
            .as_deref()
            .and_then(|p| match fs::read_to_string(p) {
                Ok(text) => Some(text),
                Err(err) => {
                    log::error!("failed to read {p}: {err}");
                    None
                }
            })
            .and_then(|text| match StoryGraph::from_json(&text) {
                Ok(g) => Some(g),
                Err(err) => {
                    log::error!("failed to parse story: {err}");
                    None
                }
            })
            .unwrap_or_else(sample_story);

        let (event_publisher, event_consumer) = unbounded();
        Self {
            graph,
            settings: Settings::default(),
            path,

            event_publisher,
            event_consumer,
            last_events: Vec::new(),
        }
    }

    fn handle_events(&mut self) {
        while let Ok(e) = self.event_consumer.try_recv() {
            match e {
                Event::NodesChange(payload) => self.graph = payload.nodes,
                Event::NodeMove(_) => {}
                other => {
                    self.last_events.push(format!("{other:?}"));
                    if self.last_events.len() > EVENTS_SHOWN {
                        self.last_events.remove(0);
                    }
                }
            }
        }
    }

    fn save(&self) {
        let Some(path) = &self.path else {
            log::warn!("no file given, nothing saved");
            return;
        };
        match self.graph.to_json() {
            Ok(text) => match fs::write(path, text) {
                Ok(()) => log::info!("saved {} nodes to {path}", self.graph.node_count()),
                Err(err) => log::error!("failed to write {path}: {err}"),
            },
            Err(err) => log::error!("failed to serialize story: {err}"),
        }
    }
}

impl App for StoryApp {
    fn update(&mut self, ctx: &Context, _: &mut Frame) {
        TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    StoryApp::save(self);
                }
                ui.checkbox(&mut self.settings.interaction.panning_enabled, "pan");
                ui.checkbox(&mut self.settings.interaction.node_adding_enabled, "add on click");
                ui.checkbox(&mut self.settings.style.diagnostics_shown, "diagnostics");
            });
        });

        TopBottomPanel::bottom("events").show(ctx, |ui| {
            for e in &self.last_events {
                ui.monospace(e);
            }
        });

        CentralPanel::default().show(ctx, |ui| {
            ui.add(
                &mut BranchGraphEditor::new(&self.graph)
                    .with_settings(&self.settings)
                    .with_event_sink(&self.event_publisher),
            );
        });

        self.handle_events();
    }
}

fn sample_story() -> StoryGraph {
    StoryGraph::new(vec![
        StoryNode::new("gate", "The Gate", 40., 40.)
            .with_content("A rusted gate blocks the road.")
            .with_choice(Choice::new("gate-c1", "Climb over", "garden"))
            .with_choice(Choice::new("gate-c2", "Knock", "keeper")),
        StoryNode::new("garden", "Overgrown Garden", 320., 0.)
            .with_content("Roses everywhere.")
            .with_choice(Choice::new("garden-c1", "Go back", "gate")),
        StoryNode::new("keeper", "The Keeper", 320., 160.)
            .with_content("An old man opens the hatch.")
            .with_choice(Choice::new("keeper-c1", "Ask again", "keeper"))
            .with_choice(Choice::new("keeper-c2", "Follow him", "cellar")),
    ])
}

fn main() {
    env_logger::init();

    let path = env::args().nth(1);
    run_native(
        APP_NAME,
        NativeOptions::default(),
        Box::new(|cc| Ok(Box::new(StoryApp::new(cc, path)))),
    )
    .unwrap();
}
