//! Playlist store: persistence seam and the value shapes it holds.
//!
//! Persisted layout in the remote tree:
//!
//! ```text
//! servers/{serverId}/playlists/{playlistName}: [description, ...links]
//! servers/{serverId}/users/{userId}/messageCount: integer
//! ```
//!
//! A playlist is stored as a single array whose first element is the
//! creation-time description; everything after it is a video link.

pub mod firebase;
pub mod memory;
pub mod service;

use crate::error::Result;
use crate::gateway::{ServerId, UserId};
use async_trait::async_trait;

pub use firebase::FirebaseStore;
pub use memory::MemoryStore;
pub use service::PlaylistService;

/// A named, per-server ordered list of video links.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub name: String,
    pub description: String,
    pub links: Vec<String>,
}

impl Playlist {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            links: Vec::new(),
        }
    }

    /// The stored array shape: description first, then links.
    pub fn to_values(&self) -> Vec<String> {
        let mut values = Vec::with_capacity(1 + self.links.len());
        values.push(self.description.clone());
        values.extend(self.links.iter().cloned());
        values
    }

    /// Rebuild from the stored array shape. `None` for an empty array, which
    /// the store treats the same as an absent playlist.
    pub fn from_values(name: &str, mut values: Vec<String>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let description = values.remove(0);
        Some(Self {
            name: name.to_string(),
            description,
            links: values,
        })
    }
}

/// Raw persistence operations against the remote tree.
///
/// Implementations move whole subtrees; all read-modify-write sequencing
/// lives in [`PlaylistService`].
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    async fn fetch(&self, server: &ServerId, name: &str) -> Result<Option<Playlist>>;

    async fn write(&self, server: &ServerId, playlist: &Playlist) -> Result<()>;

    async fn delete(&self, server: &ServerId, name: &str) -> Result<()>;

    /// All playlists of a server, sorted by name.
    async fn list(&self, server: &ServerId) -> Result<Vec<Playlist>>;

    async fn fetch_message_count(&self, server: &ServerId, user: &UserId) -> Result<u64>;

    async fn write_message_count(&self, server: &ServerId, user: &UserId, count: u64)
    -> Result<()>;
}
