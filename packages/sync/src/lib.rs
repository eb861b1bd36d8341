//! # Bento Sync
//!
//! Persistence for editor effects.
//!
//! ```text
//! EditSession ── Vec<Effect> ──► Synchronizer ── tokio::spawn ──► BlockBackend
//!                                     │                               │
//!                                     └── Notification ◄── failure ───┘
//! ```
//!
//! The editor applies every change locally before the synchronizer sees it,
//! so a slow or failing backend never blocks a gesture.

mod backend;
mod memory;
mod notify;
mod synchronizer;

pub use backend::{BlockBackend, CacheInvalidator, RemoteError};
pub use memory::{MemoryBackend, Operation};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use synchronizer::Synchronizer;
