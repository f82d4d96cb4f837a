use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Form input the request builders can read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    ExposureTime,
    Zoom,
    Gain,
    Pid,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ExposureTime => "exposure time",
            Field::Zoom => "zoom",
            Field::Gain => "gain",
            Field::Pid => "pid",
        }
    }
}

/// Current values of the panel controls.
///
/// Text fields hold exactly what the operator typed; nothing is parsed or
/// rounded before it is sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelState {
    pub exposure_time: String,
    pub zoom: String,
    pub gain: String,
    pub pid: String,
    pub autoload: bool,
    pub locked: bool,
}

impl PanelState {
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::ExposureTime => &self.exposure_time,
            Field::Zoom => &self.zoom,
            Field::Gain => &self.gain,
            Field::Pid => &self.pid,
        }
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::ExposureTime => self.exposure_time = value,
            Field::Zoom => self.zoom = value,
            Field::Gain => self.gain = value,
            Field::Pid => self.pid = value,
        }
    }
}

/// What the panel currently shows for the latest image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayState {
    pub image_src: Option<String>,
    pub label: String,
    pub last_updated: Option<DateTime<Utc>>,
}

impl std::fmt::Display for DisplayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "image: {}, label: {:?}",
            self.image_src.as_deref().unwrap_or("<none>"),
            self.label
        )?;
        if let Some(updated) = self.last_updated {
            write!(f, ", updated: {}", updated.format("%Y-%m-%d %H:%M:%S"))?;
        }
        Ok(())
    }
}
