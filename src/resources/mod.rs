/// Resource resolution module
///
/// Maps logical resource keys (as used by the audio configuration) to the
/// location the backend should fetch, preferring remote URLs over local paths.
pub mod document;
pub mod resolver;

pub use document::{
    AssetEntry, LocalResource, RemoteResource, ResourceConfig, ResourceEntry, SceneEntry,
};
pub use resolver::ResourceResolver;
