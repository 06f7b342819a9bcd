use hunterdash_shared::error::MapError;
use hunterdash_shared::models::{MapImage, Marker, MarkerId, MarkerInput};
use hunterdash_shared::remote::MarkerService;
use serde::de::DeserializeOwned;

/// localStorage key the login screen writes the bearer token to.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// API root for a page served from `origin`.
pub fn api_base(origin: &str) -> String {
    format!("{}/api", origin.trim_end_matches('/'))
}

pub fn markers_url(base: &str) -> String {
    format!("{}/map/markers", base)
}

pub fn marker_url(base: &str, id: &MarkerId) -> String {
    format!("{}/map/markers/{}", base, id)
}

pub fn map_image_url(base: &str) -> String {
    format!("{}/map/image", base)
}

fn window_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

fn stored_token() -> Option<String> {
    web_sys::window()?
        .local_storage()
        .ok()??
        .get_item(TOKEN_STORAGE_KEY)
        .ok()?
        .filter(|t| !t.is_empty())
}

/// The marker service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpMarkerService {
    base: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpMarkerService {
    pub fn new(base: impl Into<String>, token: Option<String>) -> Self {
        HttpMarkerService {
            base: base.into(),
            token,
            client: reqwest::Client::new(),
        }
    }

    /// Same-origin API with the token from localStorage.
    pub fn from_window() -> Self {
        let token = stored_token();
        if token.is_none() {
            tracing::warn!("no API token in localStorage; marker requests will be rejected");
        }
        Self::new(api_base(&window_origin().unwrap_or_default()), token)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        id: Option<&MarkerId>,
    ) -> Result<reqwest::Response, MapError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let resp = request
            .send()
            .await
            .map_err(|e| MapError::Network(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let error = MapError::from_response(status.as_u16(), id, &body);
        tracing::warn!(status = status.as_u16(), error = %error, "marker API error");
        Err(error)
    }

    async fn json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, MapError> {
        resp.json()
            .await
            .map_err(|e| MapError::Network(format!("invalid response: {}", e)))
    }

    pub async fn fetch_map_image(&self) -> Result<MapImage, MapError> {
        let resp = self
            .send(self.client.get(map_image_url(&self.base)), None)
            .await?;
        Self::json(resp).await
    }
}

impl MarkerService for HttpMarkerService {
    async fn list_markers(&self) -> Result<Vec<Marker>, MapError> {
        let resp = self.send(self.client.get(markers_url(&self.base)), None).await?;
        Self::json(resp).await
    }

    async fn create_marker(&self, input: &MarkerInput) -> Result<Marker, MapError> {
        let resp = self
            .send(self.client.post(markers_url(&self.base)).json(input), None)
            .await?;
        Self::json(resp).await
    }

    async fn update_marker(&self, marker: &Marker) -> Result<Marker, MapError> {
        let resp = self
            .send(
                self.client.put(marker_url(&self.base, &marker.id)).json(marker),
                Some(&marker.id),
            )
            .await?;
        Self::json(resp).await
    }

    async fn delete_marker(&self, id: &MarkerId) -> Result<(), MapError> {
        self.send(self.client.delete(marker_url(&self.base, id)), Some(id))
            .await?;
        Ok(())
    }
}
