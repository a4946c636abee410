//! In-memory store for tests and the offline REPL mode.

use super::{Playlist, PlaylistStore};
use crate::error::Result;
use crate::gateway::{ServerId, UserId};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Stores the same value shapes as the remote tree, keyed in process memory.
#[derive(Default)]
pub struct MemoryStore {
    // (server, playlist name) -> [description, ...links]
    playlists: RwLock<HashMap<(String, String), Vec<String>>>,
    // (server, user) -> messageCount
    counts: RwLock<HashMap<(String, String), u64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlaylistStore for MemoryStore {
    async fn fetch(&self, server: &ServerId, name: &str) -> Result<Option<Playlist>> {
        let playlists = self.playlists.read().await;
        Ok(playlists
            .get(&(server.0.clone(), name.to_string()))
            .cloned()
            .and_then(|values| Playlist::from_values(name, values)))
    }

    async fn write(&self, server: &ServerId, playlist: &Playlist) -> Result<()> {
        let mut playlists = self.playlists.write().await;
        playlists.insert(
            (server.0.clone(), playlist.name.clone()),
            playlist.to_values(),
        );
        Ok(())
    }

    async fn delete(&self, server: &ServerId, name: &str) -> Result<()> {
        let mut playlists = self.playlists.write().await;
        playlists.remove(&(server.0.clone(), name.to_string()));
        Ok(())
    }

    async fn list(&self, server: &ServerId) -> Result<Vec<Playlist>> {
        let playlists = self.playlists.read().await;
        let mut found: Vec<Playlist> = playlists
            .iter()
            .filter(|((s, _), _)| s == &server.0)
            .filter_map(|((_, name), values)| Playlist::from_values(name, values.clone()))
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn fetch_message_count(&self, server: &ServerId, user: &UserId) -> Result<u64> {
        let counts = self.counts.read().await;
        Ok(counts
            .get(&(server.0.clone(), user.0.clone()))
            .copied()
            .unwrap_or(0))
    }

    async fn write_message_count(
        &self,
        server: &ServerId,
        user: &UserId,
        count: u64,
    ) -> Result<()> {
        let mut counts = self.counts.write().await;
        counts.insert((server.0.clone(), user.0.clone()), count);
        Ok(())
    }
}
