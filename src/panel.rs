use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::camera::CameraClient;
use crate::error::{CameraError, PanelError};
use crate::protocol::{build_request, Action, Profile, RequestSpec, ResponseMode};
use crate::render::{RenderInstruction, Renderer};
use crate::types::{Field, PanelState};

/// The control panel: form state plus the actions that turn it into requests.
///
/// Every action is fire-and-forget. The returned handle only exists so
/// callers (and tests) can wait for the response branch if they want to.
#[derive(Clone)]
pub struct ControlPanel {
    profile: Profile,
    state: Arc<RwLock<PanelState>>,
    client: CameraClient,
    renderer: Arc<dyn Renderer>,
}

impl ControlPanel {
    pub fn new(
        profile: Profile,
        initial: PanelState,
        client: CameraClient,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            profile,
            state: Arc::new(RwLock::new(initial)),
            client,
            renderer,
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub async fn state(&self) -> PanelState {
        self.state.read().await.clone()
    }

    pub async fn set_field(&self, field: Field, value: impl Into<String>) {
        let value = value.into();
        debug!("✏️ {} = {:?}", field.as_str(), value);
        self.state.write().await.set_field(field, value);
    }

    pub async fn set_autoload(&self, enabled: bool) {
        info!("🔁 autoload: {}", if enabled { "enabled" } else { "disabled" });
        self.state.write().await.autoload = enabled;
    }

    pub async fn set_locked(&self, locked: bool) {
        info!("🔒 settings {}", if locked { "locked" } else { "unlocked" });
        self.state.write().await.locked = locked;
    }

    pub async fn submit_exposure(&self) -> Result<JoinHandle<()>, PanelError> {
        self.dispatch(Action::SubmitExposure).await
    }

    pub async fn zoom_changed(&self) -> Result<JoinHandle<()>, PanelError> {
        self.dispatch(Action::ChangeZoom).await
    }

    pub async fn singleshot(&self) -> Result<JoinHandle<()>, PanelError> {
        self.dispatch(Action::Singleshot).await
    }

    pub async fn update_image(&self) -> Result<JoinHandle<()>, PanelError> {
        self.dispatch(Action::RefreshImage).await
    }

    /// Build the request for `action` from the current state and send it in
    /// the background.
    pub async fn dispatch(&self, action: Action) -> Result<JoinHandle<()>, PanelError> {
        let endpoint = self
            .profile
            .endpoint(action)
            .ok_or(PanelError::Unsupported {
                action: action.as_str(),
                profile: self.profile.as_str(),
            })?;

        let request = {
            let state = self.state.read().await;
            if endpoint.guarded && state.locked {
                let err = PanelError::Locked(action.as_str());
                self.renderer.render(RenderInstruction::Alert(err.to_string()));
                return Err(err);
            }
            build_request(&state, endpoint)
        };

        if let Some(placeholder) = endpoint.placeholder {
            self.renderer
                .render(RenderInstruction::SetLabel(placeholder.to_string()));
        }

        info!("📡 {} -> {}", action.as_str(), request.path);
        let client = self.client.clone();
        let renderer = self.renderer.clone();
        Ok(tokio::spawn(async move {
            let result = client.send(&request).await;
            handle_response(renderer.as_ref(), &request, result);
        }))
    }
}

/// Success branch writes the body out; every failure is dropped silently.
fn handle_response(
    renderer: &dyn Renderer,
    request: &RequestSpec,
    result: Result<String, CameraError>,
) {
    match result {
        Ok(body) => {
            info!("📨 {}: {}", request.path, body);
            if request.mode == ResponseMode::Render {
                renderer.render(RenderInstruction::SetImageSource(body.clone()));
                renderer.render(RenderInstruction::SetLabel(body));
            }
        }
        Err(e) => {
            debug!("🔇 {} ignored: {}", request.path, e);
        }
    }
}
