//! Subcommand implementations and the config/storage helpers shared with
//! the interactive host.

use anyhow::{Context, Result};
use chatiq_config::WidgetConfig;
use std::io::{self, Write};
use std::path::PathBuf;

use super::RuntimeOptions;
use crate::session::storage::{FileStore, MemoryStore};
use crate::session::{SessionStore, VISITOR_ID_KEY};
use crate::traits::KeyValueStore;

/// Load the widget config named on the command line (or the default one)
/// and apply the `--site-id` override
pub fn load_config(options: &RuntimeOptions) -> Result<WidgetConfig> {
    let mut config = match &options.config_path {
        Some(path) => WidgetConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => WidgetConfig::load().context("failed to load default config")?,
    };

    if let Some(site_id) = &options.site_id {
        config = config.with_site_id(site_id.clone());
        config.validate().context("invalid --site-id")?;
    }
    Ok(config)
}

fn storage_path(options: &RuntimeOptions) -> PathBuf {
    options
        .storage_path
        .clone()
        .unwrap_or_else(FileStore::default_path)
}

/// Open the key-value store for this run. A storage file that can't be read
/// falls back to memory, as the widget itself would.
pub fn open_store(options: &RuntimeOptions) -> Box<dyn KeyValueStore> {
    if options.ephemeral {
        return Box::new(MemoryStore::new());
    }
    match FileStore::open(storage_path(options)) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("[storage] {}; using memory-only storage", e);
            Box::new(MemoryStore::new())
        }
    }
}

/// `chatiq show-config`
pub fn show_config_cli(options: &RuntimeOptions) -> Result<()> {
    let config = load_config(options)?;
    let yaml = serde_yaml_ng::to_string(&config).context("failed to serialize config")?;
    print!("{yaml}");
    Ok(())
}

/// `chatiq visitor-id`
pub fn visitor_id_cli(options: &RuntimeOptions) -> Result<()> {
    let store = open_store(options);
    let site_id = options.site_id.clone().unwrap_or_default();
    let mut session = SessionStore::new(store, site_id);
    println!("{}", session.get_or_create_visitor_id());
    if session.is_degraded() {
        eprintln!("warning: storage unavailable, this identifier was not persisted");
    }
    Ok(())
}

/// `chatiq reset-storage`
pub fn reset_storage_cli(options: &RuntimeOptions, skip_prompt: bool) -> Result<()> {
    let path = storage_path(options);
    if !path.exists() {
        println!("Nothing to reset: {} does not exist", path.display());
        return Ok(());
    }

    if !skip_prompt {
        print!(
            "This forgets the visitor id, preferences and drafts in {}. Continue? [y/N] ",
            path.display()
        );
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;
        let response = response.trim().to_lowercase();
        if response != "y" && response != "yes" {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    let mut store = FileStore::open(&path)
        .with_context(|| format!("failed to open storage at {}", path.display()))?;
    let had_visitor = store.get(VISITOR_ID_KEY)?.is_some();
    store
        .clear()
        .with_context(|| format!("failed to remove {}", path.display()))?;
    log::info!("[storage] Reset {:?}", path);
    println!(
        "Removed {}{}",
        path.display(),
        if had_visitor {
            "; a new visitor id will be issued on next mount"
        } else {
            ""
        }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_applies_site_override() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("widget.yaml");
        std::fs::write(&path, "site_id: from-file\nagent_name: Ada\n").unwrap();

        let options = RuntimeOptions {
            config_path: Some(path),
            site_id: Some("from-cli".into()),
            ..Default::default()
        };
        let config = load_config(&options).unwrap();
        assert_eq!(config.site_id(), Some("from-cli"));
        assert_eq!(config.agent_name, "Ada");
    }

    #[test]
    fn test_blank_site_override_rejected() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("widget.yaml");
        std::fs::write(&path, "").unwrap();
        let options = RuntimeOptions {
            config_path: Some(path),
            site_id: Some("   ".into()),
            ..Default::default()
        };
        assert!(load_config(&options).is_err());
    }

    #[test]
    fn test_reset_storage_removes_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("storage.yaml");
        let mut store = FileStore::open(&path).unwrap();
        store.set(VISITOR_ID_KEY, "v_abc").unwrap();

        let options = RuntimeOptions {
            storage_path: Some(path.clone()),
            ..Default::default()
        };
        reset_storage_cli(&options, true).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_storage_falls_back_to_memory() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("storage.yaml");
        std::fs::write(&path, "[[[").unwrap();
        let options = RuntimeOptions {
            storage_path: Some(path),
            ..Default::default()
        };
        let store = open_store(&options);
        assert_eq!(store.get(VISITOR_ID_KEY).unwrap(), None);
    }
}
