//! Command-level playlist operations.
//!
//! The raw store moves whole subtrees, so every mutation here is a
//! read-modify-write. Two concurrent mutations of the same key would race and
//! lose one write; to prevent that, each (server, key) gets its own async
//! mutex and all mutations for that key run single-file through it.

use super::{Playlist, PlaylistStore};
use crate::error::Result;
use crate::gateway::{ServerId, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

pub struct PlaylistService {
    store: Arc<dyn PlaylistStore>,
    locks: StdMutex<HashMap<(String, String), Arc<Mutex<()>>>>,
}

impl PlaylistService {
    pub fn new(store: Arc<dyn PlaylistStore>) -> Self {
        Self {
            store,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Mutex owning all mutations of one (server, key) pair.
    fn key_lock(&self, server: &ServerId, key: String) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .entry((server.0.clone(), key))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn playlist_lock(&self, server: &ServerId, name: &str) -> Arc<Mutex<()>> {
        self.key_lock(server, format!("playlist:{}", name))
    }

    /// Create a playlist. Returns `false` without touching the store when the
    /// name already exists; the original description stays intact.
    pub async fn create(&self, server: &ServerId, name: &str, description: &str) -> Result<bool> {
        let lock = self.playlist_lock(server, name);
        let _guard = lock.lock().await;

        if self.store.fetch(server, name).await?.is_some() {
            return Ok(false);
        }
        self.store
            .write(server, &Playlist::new(name, description))
            .await?;
        Ok(true)
    }

    /// Delete a playlist. Returns whether it existed.
    pub async fn delete(&self, server: &ServerId, name: &str) -> Result<bool> {
        let lock = self.playlist_lock(server, name);
        let _guard = lock.lock().await;

        let existed = self.store.fetch(server, name).await?.is_some();
        if existed {
            self.store.delete(server, name).await?;
        }
        Ok(existed)
    }

    /// Append one link. Returns `false` when the playlist does not exist.
    pub async fn add_link(&self, server: &ServerId, name: &str, link: &str) -> Result<bool> {
        let lock = self.playlist_lock(server, name);
        let _guard = lock.lock().await;

        let Some(mut playlist) = self.store.fetch(server, name).await? else {
            return Ok(false);
        };
        playlist.links.push(link.to_string());
        self.store.write(server, &playlist).await?;
        Ok(true)
    }

    /// Remove every occurrence of one link, preserving the order and count of
    /// all other entries. Returns the number of entries removed, or `None`
    /// when the playlist does not exist. Removing an absent link is a no-op.
    pub async fn remove_link(
        &self,
        server: &ServerId,
        name: &str,
        link: &str,
    ) -> Result<Option<usize>> {
        let lock = self.playlist_lock(server, name);
        let _guard = lock.lock().await;

        let Some(mut playlist) = self.store.fetch(server, name).await? else {
            return Ok(None);
        };
        let before = playlist.links.len();
        playlist.links.retain(|l| l != link);
        let removed = before - playlist.links.len();
        if removed > 0 {
            self.store.write(server, &playlist).await?;
        }
        Ok(Some(removed))
    }

    /// Playback queue for a playlist: its links without the description
    /// header. `None` when the playlist does not exist.
    pub async fn links(&self, server: &ServerId, name: &str) -> Result<Option<Vec<String>>> {
        Ok(self
            .store
            .fetch(server, name)
            .await?
            .map(|playlist| playlist.links))
    }

    pub async fn show(&self, server: &ServerId, name: &str) -> Result<Option<Playlist>> {
        self.store.fetch(server, name).await
    }

    pub async fn all(&self, server: &ServerId) -> Result<Vec<Playlist>> {
        self.store.list(server).await
    }

    /// Increment the per-(server, user) message counter; returns the new
    /// count. Serialized per user the same way playlist mutations are.
    pub async fn record_message(&self, server: &ServerId, user: &UserId) -> Result<u64> {
        let lock = self.key_lock(server, format!("user:{}", user));
        let _guard = lock.lock().await;

        let count = self.store.fetch_message_count(server, user).await? + 1;
        self.store.write_message_count(server, user, count).await?;
        Ok(count)
    }
}
