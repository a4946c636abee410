//! Realtime-database store over its REST surface.
//!
//! Every node is addressable as `{base_url}/{path}.json`; GET fetches a
//! subtree, PUT overwrites it, DELETE removes it. An absent node reads as
//! JSON `null`.

use super::{Playlist, PlaylistStore};
use crate::config::DatabaseConfig;
use crate::error::{Result, VoxlistError};
use crate::gateway::{ServerId, UserId};
use async_trait::async_trait;
use std::collections::BTreeMap;

pub struct FirebaseStore {
    http: reqwest::Client,
    base_url: String,
    auth: Option<String>,
}

impl FirebaseStore {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth: config.auth.clone(),
        }
    }

    fn node_url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path)
    }

    fn auth_query(&self) -> Vec<(&'static str, String)> {
        match &self.auth {
            Some(token) => vec![("auth", token.clone())],
            None => Vec::new(),
        }
    }

    async fn get_node<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let response = self
            .http
            .get(self.node_url(path))
            .query(&self.auth_query())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VoxlistError::Store {
                message: format!("fetch of {} failed: {}", path, response.status()),
            });
        }

        // Absent nodes come back as the JSON literal `null`.
        Ok(response.json().await?)
    }

    async fn put_node<T: serde::Serialize>(&self, path: &str, value: &T) -> Result<()> {
        let response = self
            .http
            .put(self.node_url(path))
            .query(&self.auth_query())
            .json(value)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VoxlistError::Store {
                message: format!("write of {} failed: {}", path, response.status()),
            });
        }
        Ok(())
    }

    async fn delete_node(&self, path: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.node_url(path))
            .query(&self.auth_query())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VoxlistError::Store {
                message: format!("delete of {} failed: {}", path, response.status()),
            });
        }
        Ok(())
    }

    fn playlist_path(server: &ServerId, name: &str) -> String {
        format!("servers/{}/playlists/{}", server, name)
    }

    fn playlists_path(server: &ServerId) -> String {
        format!("servers/{}/playlists", server)
    }

    fn count_path(server: &ServerId, user: &UserId) -> String {
        format!("servers/{}/users/{}/messageCount", server, user)
    }
}

#[async_trait]
impl PlaylistStore for FirebaseStore {
    async fn fetch(&self, server: &ServerId, name: &str) -> Result<Option<Playlist>> {
        let values: Option<Vec<String>> = self.get_node(&Self::playlist_path(server, name)).await?;
        Ok(values.and_then(|v| Playlist::from_values(name, v)))
    }

    async fn write(&self, server: &ServerId, playlist: &Playlist) -> Result<()> {
        self.put_node(
            &Self::playlist_path(server, &playlist.name),
            &playlist.to_values(),
        )
        .await
    }

    async fn delete(&self, server: &ServerId, name: &str) -> Result<()> {
        self.delete_node(&Self::playlist_path(server, name)).await
    }

    async fn list(&self, server: &ServerId) -> Result<Vec<Playlist>> {
        // BTreeMap keeps the name ordering stable.
        let tree: Option<BTreeMap<String, Vec<String>>> =
            self.get_node(&Self::playlists_path(server)).await?;
        Ok(tree
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(name, values)| Playlist::from_values(&name, values))
            .collect())
    }

    async fn fetch_message_count(&self, server: &ServerId, user: &UserId) -> Result<u64> {
        let count: Option<u64> = self.get_node(&Self::count_path(server, user)).await?;
        Ok(count.unwrap_or(0))
    }

    async fn write_message_count(
        &self,
        server: &ServerId,
        user: &UserId,
        count: u64,
    ) -> Result<()> {
        self.put_node(&Self::count_path(server, user), &count).await
    }
}
