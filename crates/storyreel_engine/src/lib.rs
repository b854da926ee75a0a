// SPDX-License-Identifier: MIT OR Apache-2.0
//! `StoryReel` engine core.
//!
//! Embeddable library tying the authored scene graph
//! ([`storyreel_graph`]) and the per-scene timeline machinery
//! ([`storyreel_timeline`]) together for a presentation layer:
//! - persistence bundles and the store contract ([`bundle`], [`store`])
//! - typed change notifications between surfaces ([`events`])
//! - background recomposition with stale-write protection ([`recompose`])
//! - the authoring facade ([`editor`]) and playback synchronizer
//!   ([`player`])
//! - contracts for the render/decode and asset collaborators ([`media`])
//!
//! The engine has no UI, no codecs and no I/O of its own; collaborators
//! plug in behind the traits in [`media`] and [`store`].

pub mod bundle;
pub mod editor;
pub mod events;
pub mod media;
pub mod player;
pub mod recompose;
pub mod store;

pub use bundle::{GameBundle, GameId, SceneBundle};
pub use editor::Editor;
pub use events::{change_channel, ChangeEvent, ChangeReceiver, ChangeSender};
pub use media::{AssetError, AssetSource, NullAssetSource, ProbedMedia, RenderSink};
pub use player::{EndPolicy, Player, PlayerConfig};
pub use recompose::Recomposer;
pub use store::{BundleStore, MemoryStore, StoreError};
