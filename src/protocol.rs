//! HTTP contract with the camera control server.
//!
//! Every panel action maps onto one `Endpoint`: a path, the query parameters
//! it carries and what to do with the response text. The page variants the
//! server ships differ only in these tables, so each variant is a `Profile`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::{Field, PanelState};

pub const PATH_SET_CONTROL: &str = "set_control";
pub const PATH_SET_ZOOM: &str = "set_zoom";
pub const PATH_SET_EXPOSURE: &str = "set_exposure";
pub const PATH_SINGLESHOT: &str = "singleshot";
pub const PATH_GET_LATEST: &str = "get_latest";

pub const LABEL_LOADING: &str = "Loading...";
pub const LABEL_SINGLESHOT: &str = "Requesting Singleshot...";

/// Where a query parameter takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamValue {
    Field(Field),
    Literal(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub value: ParamValue,
}

const fn field(name: &'static str, field: Field) -> Param {
    Param { name, value: ParamValue::Field(field) }
}

const fn literal(name: &'static str, value: &'static str) -> Param {
    Param { name, value: ParamValue::Literal(value) }
}

/// What happens with a successful response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Body is logged and otherwise ignored
    LogOnly,
    /// Body is an image reference written to the image source and the label
    Render,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub params: &'static [Param],
    pub mode: ResponseMode,
    /// Label text shown while the request is in flight
    pub placeholder: Option<&'static str>,
    /// Refused while the settings are locked
    pub guarded: bool,
}

/// User actions that end in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SubmitExposure,
    ChangeZoom,
    Singleshot,
    RefreshImage,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::SubmitExposure => "exposure submit",
            Action::ChangeZoom => "zoom change",
            Action::Singleshot => "singleshot",
            Action::RefreshImage => "image refresh",
        }
    }
}

/// A GET request ready to send, built from a snapshot of the panel state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
    pub mode: ResponseMode,
}

/// Build the request for `endpoint` from the current field values.
///
/// Values are copied verbatim; encoding happens when the URL is assembled.
pub fn build_request(state: &PanelState, endpoint: &Endpoint) -> RequestSpec {
    let query = endpoint
        .params
        .iter()
        .map(|param| {
            let value = match param.value {
                ParamValue::Field(f) => state.field(f).to_string(),
                ParamValue::Literal(v) => v.to_string(),
            };
            (param.name, value)
        })
        .collect();

    RequestSpec {
        path: endpoint.path,
        query,
        mode: endpoint.mode,
    }
}

// Shared endpoints

static SET_ZOOM: Endpoint = Endpoint {
    path: PATH_SET_ZOOM,
    params: &[field("zoom", Field::Zoom)],
    mode: ResponseMode::LogOnly,
    placeholder: None,
    guarded: true,
};

// setup page

static SETUP_EXPOSURE: Endpoint = Endpoint {
    path: PATH_SET_CONTROL,
    params: &[literal("name", "ExposureTime"), field("value", Field::ExposureTime)],
    mode: ResponseMode::LogOnly,
    placeholder: None,
    guarded: true,
};

// timelapse page

static TIMELAPSE_EXPOSURE: Endpoint = Endpoint {
    path: PATH_SET_EXPOSURE,
    params: &[
        field("exp", Field::ExposureTime),
        field("pid", Field::Pid),
        field("zoom", Field::Zoom),
    ],
    mode: ResponseMode::Render,
    placeholder: Some(LABEL_LOADING),
    guarded: true,
};

static TIMELAPSE_SINGLESHOT: Endpoint = Endpoint {
    path: PATH_SINGLESHOT,
    params: &[field("pid", Field::Pid)],
    mode: ResponseMode::LogOnly,
    placeholder: Some(LABEL_SINGLESHOT),
    guarded: false,
};

static TIMELAPSE_LATEST: Endpoint = Endpoint {
    path: PATH_GET_LATEST,
    params: &[],
    mode: ResponseMode::Render,
    placeholder: Some(LABEL_LOADING),
    guarded: false,
};

// tuning page

static TUNING_EXPOSURE: Endpoint = Endpoint {
    path: PATH_SET_EXPOSURE,
    params: &[
        field("exp", Field::ExposureTime),
        field("zoom", Field::Zoom),
        field("gain", Field::Gain),
    ],
    mode: ResponseMode::Render,
    placeholder: Some(LABEL_LOADING),
    guarded: true,
};

static TUNING_SINGLESHOT: Endpoint = Endpoint {
    path: PATH_SINGLESHOT,
    params: &[],
    mode: ResponseMode::LogOnly,
    placeholder: Some(LABEL_SINGLESHOT),
    guarded: false,
};

static TUNING_LATEST: Endpoint = Endpoint {
    path: PATH_GET_LATEST,
    params: &[],
    mode: ResponseMode::Render,
    placeholder: None,
    guarded: false,
};

/// How a poll tick decides whether to refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollMode {
    Always,
    WhenAutoload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub interval: Duration,
    pub mode: PollMode,
}

/// One page variant served by the camera host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Sensor setup page: raw control writes, no image loop
    Setup,
    /// Timelapse page: exposure with pid, autoload-gated loop every 10s
    #[default]
    Timelapse,
    /// Tuning page: exposure with gain, lock guard, loop every 3s
    Tuning,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Setup => "setup",
            Profile::Timelapse => "timelapse",
            Profile::Tuning => "tuning",
        }
    }

    pub fn endpoint(&self, action: Action) -> Option<&'static Endpoint> {
        match (self, action) {
            (Profile::Setup, Action::SubmitExposure) => Some(&SETUP_EXPOSURE),
            (Profile::Setup, Action::ChangeZoom) => Some(&SET_ZOOM),
            (Profile::Setup, _) => None,

            (Profile::Timelapse, Action::SubmitExposure) => Some(&TIMELAPSE_EXPOSURE),
            (Profile::Timelapse, Action::ChangeZoom) => Some(&SET_ZOOM),
            (Profile::Timelapse, Action::Singleshot) => Some(&TIMELAPSE_SINGLESHOT),
            (Profile::Timelapse, Action::RefreshImage) => Some(&TIMELAPSE_LATEST),

            (Profile::Tuning, Action::SubmitExposure) => Some(&TUNING_EXPOSURE),
            (Profile::Tuning, Action::ChangeZoom) => Some(&SET_ZOOM),
            (Profile::Tuning, Action::Singleshot) => Some(&TUNING_SINGLESHOT),
            (Profile::Tuning, Action::RefreshImage) => Some(&TUNING_LATEST),
        }
    }

    pub fn poll_schedule(&self) -> Option<PollSchedule> {
        match self {
            Profile::Setup => None,
            Profile::Timelapse => Some(PollSchedule {
                interval: Duration::from_secs(10),
                mode: PollMode::WhenAutoload,
            }),
            Profile::Tuning => Some(PollSchedule {
                interval: Duration::from_secs(3),
                mode: PollMode::Always,
            }),
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
