//! Display boundary.
//!
//! The panel never writes to the screen itself; it emits `RenderInstruction`s
//! and a `Renderer` applies them.

use chrono::Utc;
use reqwest::Url;
use std::sync::{Arc, RwLock};
use tracing::warn;

use crate::types::DisplayState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderInstruction {
    SetLabel(String),
    SetImageSource(String),
    /// Message the operator has to see before doing anything else
    Alert(String),
}

pub trait Renderer: Send + Sync {
    fn render(&self, instruction: RenderInstruction);
}

/// In-memory copy of what is on screen.
#[derive(Debug, Clone, Default)]
pub struct PanelView {
    display: Arc<RwLock<DisplayState>>,
    alerts: Arc<RwLock<Vec<String>>>,
}

impl PanelView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DisplayState {
        match self.display.read() {
            Ok(display) => display.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        match self.alerts.read() {
            Ok(alerts) => alerts.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut DisplayState)) {
        let mut display = self.display.write().unwrap_or_else(|p| p.into_inner());
        apply(&mut display);
        display.last_updated = Some(Utc::now());
    }
}

impl Renderer for PanelView {
    fn render(&self, instruction: RenderInstruction) {
        match instruction {
            RenderInstruction::SetLabel(text) => self.update(|display| display.label = text),
            RenderInstruction::SetImageSource(src) => {
                self.update(|display| display.image_src = Some(src))
            }
            RenderInstruction::Alert(message) => {
                let mut alerts = self.alerts.write().unwrap_or_else(|p| p.into_inner());
                alerts.push(message);
            }
        }
    }
}

/// Prints display changes on the terminal.
pub struct ConsoleRenderer {
    base_url: Url,
}

impl ConsoleRenderer {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    fn format(&self, instruction: &RenderInstruction) -> String {
        match instruction {
            RenderInstruction::SetLabel(text) => format!("🏷️  {}", text),
            RenderInstruction::SetImageSource(src) => match self.base_url.join(src) {
                Ok(url) => format!("🖼️  {}", url),
                Err(_) => format!("🖼️  {}", src),
            },
            RenderInstruction::Alert(message) => format!("⚠️  {}", message),
        }
    }
}

impl Renderer for ConsoleRenderer {
    fn render(&self, instruction: RenderInstruction) {
        let line = self.format(&instruction);
        match instruction {
            RenderInstruction::Alert(_) => {
                warn!("{}", line);
                eprintln!("{}", line);
            }
            _ => println!("{}", line),
        }
    }
}

/// Fans every instruction out to several renderers.
pub struct CompositeRenderer {
    renderers: Vec<Arc<dyn Renderer>>,
}

impl CompositeRenderer {
    pub fn new(renderers: Vec<Arc<dyn Renderer>>) -> Self {
        Self { renderers }
    }
}

impl Renderer for CompositeRenderer {
    fn render(&self, instruction: RenderInstruction) {
        for renderer in &self.renderers {
            renderer.render(instruction.clone());
        }
    }
}
