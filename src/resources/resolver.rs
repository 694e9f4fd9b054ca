/// Resource path resolver
///
/// Built once from a [`ResourceConfig`] and then shared read-only by the
/// audio loaders.
use std::collections::HashMap;

use super::document::{AssetEntry, ResourceConfig, ResourceEntry, SceneEntry};

/// Resolves logical resource keys to loadable locations
#[derive(Debug, Default, Clone)]
pub struct ResourceResolver {
    assets: HashMap<u64, AssetEntry>,
    scenes: HashMap<u64, SceneEntry>,
    resources: HashMap<String, ResourceEntry>,
}

impl ResourceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver already populated from `config`
    pub fn from_config(config: &ResourceConfig) -> Self {
        let mut resolver = Self::new();
        resolver.initialize_from_config(config);
        resolver
    }

    /// Rebuild every dictionary from `config`
    ///
    /// Keys declared more than once keep the last declaration.
    pub fn initialize_from_config(&mut self, config: &ResourceConfig) {
        self.assets.clear();
        self.scenes.clear();
        self.resources.clear();

        for asset in &config.assets {
            self.assets.insert(asset.id, asset.clone());
            for entry in &asset.resources {
                self.register(entry);
            }
        }

        for scene in &config.scenes {
            self.scenes.insert(scene.key, scene.clone());
            for entry in &scene.resources {
                self.register(entry);
            }
        }

        tracing::info!(
            "Resource dictionary initialized: {} assets, {} scenes, {} keys",
            self.assets.len(),
            self.scenes.len(),
            self.resources.len()
        );
    }

    fn register(&mut self, entry: &ResourceEntry) {
        if let Some(local) = &entry.local {
            self.resources.insert(local.key.clone(), entry.clone());
        }
        if let Some(remote) = &entry.remote {
            self.resources.insert(remote.key.clone(), entry.clone());
        }
    }

    /// Location to load `key` from, remote first
    ///
    /// `None` means the key is unknown (or has no usable location) and the
    /// caller must give up on that asset.
    pub fn get_resource_path(&self, key: &str) -> Option<String> {
        let Some(entry) = self.resources.get(key) else {
            tracing::warn!("Resource key not found: {}", key);
            return None;
        };

        if let Some(remote) = &entry.remote {
            tracing::debug!("Using remote resource: {} -> {}", key, remote.url);
            return Some(remote.url.clone());
        }

        let location = entry.local.as_ref().and_then(|l| l.location());
        match location {
            Some(path) => {
                tracing::debug!("Using local resource: {} -> {}", key, path);
                Some(path.to_string())
            }
            None => {
                tracing::warn!("Resource key {} has no usable location", key);
                None
            }
        }
    }

    pub fn get_resource(&self, key: &str) -> Option<&ResourceEntry> {
        self.resources.get(key)
    }

    pub fn get_asset(&self, id: u64) -> Option<&AssetEntry> {
        self.assets.get(&id)
    }

    pub fn get_scene(&self, key: u64) -> Option<&SceneEntry> {
        self.scenes.get(&key)
    }

    pub fn all_assets(&self) -> Vec<&AssetEntry> {
        let mut assets: Vec<_> = self.assets.values().collect();
        assets.sort_by_key(|a| a.id);
        assets
    }

    pub fn all_scenes(&self) -> Vec<&SceneEntry> {
        let mut scenes: Vec<_> = self.scenes.values().collect();
        scenes.sort_by_key(|s| s.key);
        scenes
    }

    /// Number of distinct resource keys
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::document::{LocalResource, RemoteResource};

    fn local(key: &str, path: &str) -> LocalResource {
        LocalResource {
            key: key.to_string(),
            resource_type: "audio".to_string(),
            path: Some(path.to_string()),
            public_path: None,
        }
    }

    fn remote(key: &str, url: &str) -> RemoteResource {
        RemoteResource {
            key: key.to_string(),
            resource_type: "audio".to_string(),
            url: url.to_string(),
        }
    }

    fn config_with(resources: Vec<ResourceEntry>) -> ResourceConfig {
        ResourceConfig {
            assets: vec![AssetEntry {
                asset_type: "audio".to_string(),
                id: 7,
                name: "audio".to_string(),
                resources,
            }],
            scenes: Vec::new(),
        }
    }

    #[test]
    fn test_prefers_remote_over_local() {
        let resolver = ResourceResolver::from_config(&config_with(vec![ResourceEntry {
            local: Some(local("bgm_menu", "assets/menu.mp3")),
            remote: Some(remote("bgm_menu", "https://cdn.example.com/menu.mp3")),
        }]));

        assert_eq!(
            resolver.get_resource_path("bgm_menu").as_deref(),
            Some("https://cdn.example.com/menu.mp3")
        );
    }

    #[test]
    fn test_falls_back_to_local() {
        let resolver = ResourceResolver::from_config(&config_with(vec![ResourceEntry {
            local: Some(local("sfx_jump", "assets/jump.wav")),
            remote: None,
        }]));

        assert_eq!(
            resolver.get_resource_path("sfx_jump").as_deref(),
            Some("assets/jump.wav")
        );
    }

    #[test]
    fn test_unknown_key_is_none() {
        let resolver = ResourceResolver::from_config(&config_with(Vec::new()));
        assert_eq!(resolver.get_resource_path("missing"), None);
        assert!(resolver.is_empty());
    }

    #[test]
    fn test_last_declaration_wins() {
        let resolver = ResourceResolver::from_config(&config_with(vec![
            ResourceEntry {
                local: Some(local("sfx_hit", "assets/old_hit.wav")),
                remote: None,
            },
            ResourceEntry {
                local: Some(local("sfx_hit", "assets/new_hit.wav")),
                remote: None,
            },
        ]));

        assert_eq!(
            resolver.get_resource_path("sfx_hit").as_deref(),
            Some("assets/new_hit.wav")
        );
        assert_eq!(resolver.len(), 1);
    }

    #[test]
    fn test_reinitialize_clears_previous_keys() {
        let mut resolver = ResourceResolver::from_config(&config_with(vec![ResourceEntry {
            local: Some(local("sfx_hit", "assets/hit.wav")),
            remote: None,
        }]));
        resolver.initialize_from_config(&ResourceConfig::default());

        assert_eq!(resolver.get_resource_path("sfx_hit"), None);
        assert!(resolver.get_asset(7).is_none());
    }

    #[test]
    fn test_scene_resources_are_registered() {
        let config = ResourceConfig {
            assets: Vec::new(),
            scenes: vec![SceneEntry {
                key: 3,
                name: "Game".to_string(),
                description: String::new(),
                resources: vec![ResourceEntry {
                    local: None,
                    remote: Some(remote("bgm_game", "https://cdn.example.com/game.ogg")),
                }],
            }],
        };
        let resolver = ResourceResolver::from_config(&config);

        assert_eq!(resolver.get_scene(3).map(|s| s.name.as_str()), Some("Game"));
        assert_eq!(
            resolver.get_resource_path("bgm_game").as_deref(),
            Some("https://cdn.example.com/game.ogg")
        );
        assert_eq!(resolver.all_scenes().len(), 1);
    }
}
