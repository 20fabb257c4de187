use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::ClientError;
use crate::models::{
    LoginParams, LoginResponse, Photo, RegisterParams, Terrain, TerrainParams, TerrainQuery, User,
};
use crate::token::TokenStore;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Photo read from disk, ready to upload.
struct PhotoFile {
    file_name: String,
    mime: String,
    data: Vec<u8>,
}

/// Typed wrapper around the backend API.
///
/// Every request carries `Authorization: Bearer <token>` when the token store
/// holds a token.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    tokens: TokenStore,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, tokens: TokenStore) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        Ok(match self.tokens.load()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn check(res: Response) -> Result<Response, ClientError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        Err(ClientError::from_body(status.as_u16(), &body))
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        let res = Self::check(builder.send().await?).await?;
        let bytes = res.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_empty(builder: RequestBuilder) -> Result<(), ClientError> {
        Self::check(builder.send().await?).await?;
        Ok(())
    }

    #[instrument(skip(self, params), fields(username = %params.username))]
    pub async fn register(&self, params: &RegisterParams) -> Result<User, ClientError> {
        Self::send_json(self.request(Method::POST, "/auth/register")?.json(params)).await
    }

    /// Log in and persist the returned token for later requests.
    #[instrument(skip(self, params), fields(username = %params.username))]
    pub async fn login(&self, params: &LoginParams) -> Result<String, ClientError> {
        let res: LoginResponse =
            Self::send_json(self.request(Method::POST, "/auth/login")?.json(params)).await?;
        self.tokens.save(&res.token)?;
        debug!(path = %self.tokens.path().display(), "Token saved");
        Ok(res.token)
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.tokens.clear()
    }

    pub async fn me(&self) -> Result<User, ClientError> {
        if self.tokens.load()?.is_none() {
            return Err(ClientError::NotLoggedIn);
        }
        Self::send_json(self.request(Method::GET, "/auth/me")?).await
    }

    #[instrument(skip(self))]
    pub async fn list_terrains(&self, query: &TerrainQuery) -> Result<Vec<Terrain>, ClientError> {
        Self::send_json(self.request(Method::GET, "/terrains")?.query(query)).await
    }

    pub async fn get_terrain(&self, id: Uuid) -> Result<Terrain, ClientError> {
        Self::send_json(self.request(Method::GET, &format!("/terrains/{id}"))?).await
    }

    /// Create a terrain, then upload each photo to it in order.
    ///
    /// Photo files are read before anything is sent, so a missing file does
    /// not leave a half-created listing behind.
    #[instrument(skip(self, params, photos), fields(nom = %params.nom, photos = photos.len()))]
    pub async fn create_terrain<P: AsRef<Path>>(
        &self,
        params: &TerrainParams,
        photos: &[P],
    ) -> Result<Terrain, ClientError> {
        let mut files = Vec::with_capacity(photos.len());
        for path in photos {
            files.push(read_photo(path.as_ref()).await?);
        }

        let mut terrain: Terrain =
            Self::send_json(self.request(Method::POST, "/terrains")?.json(params)).await?;

        for file in files {
            let photo = self.upload(terrain.id, file).await?;
            terrain.photos.push(photo);
        }

        Ok(terrain)
    }

    pub async fn update_terrain(
        &self,
        id: Uuid,
        params: &TerrainParams,
    ) -> Result<Terrain, ClientError> {
        Self::send_json(
            self.request(Method::PUT, &format!("/terrains/{id}"))?
                .json(params),
        )
        .await
    }

    pub async fn delete_terrain(&self, id: Uuid) -> Result<(), ClientError> {
        Self::send_empty(self.request(Method::DELETE, &format!("/terrains/{id}"))?).await
    }

    pub async fn add_photo(&self, terrain_id: Uuid, path: &Path) -> Result<Photo, ClientError> {
        let file = read_photo(path).await?;
        self.upload(terrain_id, file).await
    }

    pub async fn delete_photo(&self, terrain_id: Uuid, photo_id: Uuid) -> Result<(), ClientError> {
        Self::send_empty(self.request(
            Method::DELETE,
            &format!("/terrains/{terrain_id}/photos/{photo_id}"),
        )?)
        .await
    }

    async fn upload(&self, terrain_id: Uuid, file: PhotoFile) -> Result<Photo, ClientError> {
        debug!(%terrain_id, file = %file.file_name, "Uploading photo");
        let part = Part::bytes(file.data)
            .file_name(file.file_name)
            .mime_str(&file.mime)?;
        let form = Form::new().part("file", part);

        Self::send_json(
            self.request(Method::POST, &format!("/terrains/{terrain_id}/photos"))?
                .multipart(form),
        )
        .await
    }
}

async fn read_photo(path: &Path) -> Result<PhotoFile, ClientError> {
    let data = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    let mime = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();
    Ok(PhotoFile {
        file_name,
        mime,
        data,
    })
}
