//! Configuration file watcher for hot reload.
//!
//! Editors and deploy tools usually save by writing a temporary file and
//! renaming it over the config, which replaces the inode. A watch on the file
//! itself dies on the first such save, so the parent directory is watched and
//! events are filtered by file name.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::event::{EventKind, ModifyKind};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::GateConfig;

/// Watches one configuration file and sends every valid new version.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<GateConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<GateConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = self.path.file_name().map(OsString::from).ok_or_else(|| {
            notify::Error::generic("config path has no file name")
                .add_path(self.path.clone())
        })?;

        let tx = self.update_tx;
        let path = self.path.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !is_save(&event.kind) || !touches(&event, &file_name) {
                        return;
                    }
                    tracing::info!(kind = ?event.kind, "Config file change detected, reloading...");
                    match load_config(&path) {
                        Ok(new_config) => {
                            let _ = tx.send(new_config);
                        }
                        Err(e) => {
                            tracing::error!(
                                error = %e,
                                "Failed to reload config. Keeping current configuration."
                            );
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, directory = ?directory, "Config watcher started");
        Ok(watcher)
    }
}

/// Content writes, creations and renames onto the file all count as saves.
fn is_save(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    }
}

fn touches(event: &Event, file_name: &OsString) -> bool {
    event
        .paths
        .iter()
        .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tokio::time::timeout;

    fn save_atomically(dir: &Path, target: &Path, cookie_name: &str) {
        let tmp = dir.join(".gate.toml.tmp");
        fs::write(&tmp, format!("[session]\ncookie_name = \"{cookie_name}\"\n")).unwrap();
        fs::rename(&tmp, target).unwrap();
    }

    async fn next_cookie_name(
        rx: &mut mpsc::UnboundedReceiver<GateConfig>,
        expected: &str,
    ) -> Option<String> {
        // one save may emit several events; skip versions from earlier saves
        loop {
            let config = timeout(Duration::from_secs(5), rx.recv()).await.ok()??;
            if config.session.cookie_name == expected {
                return Some(config.session.cookie_name);
            }
        }
    }

    #[tokio::test]
    async fn test_reloads_after_repeated_atomic_replace() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("gate.toml");
        fs::write(&target, "").unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&target);
        let _guard = watcher.run().unwrap();

        for name in ["first", "second", "third"] {
            save_atomically(dir.path(), &target, name);
            assert_eq!(next_cookie_name(&mut rx, name).await.as_deref(), Some(name));
        }
    }

    #[tokio::test]
    async fn test_invalid_save_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("gate.toml");
        fs::write(&target, "").unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&target);
        let _guard = watcher.run().unwrap();

        fs::write(&target, "[routes]\nlogin_path = \"login\"\n").unwrap();
        save_atomically(dir.path(), &target, "valid");
        assert_eq!(next_cookie_name(&mut rx, "valid").await.as_deref(), Some("valid"));
    }

    #[test]
    fn test_save_kinds() {
        use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind, RenameMode};
        assert!(is_save(&EventKind::Create(CreateKind::File)));
        assert!(is_save(&EventKind::Modify(ModifyKind::Name(RenameMode::To))));
        assert!(is_save(&EventKind::Modify(ModifyKind::Data(DataChange::Content))));
        assert!(!is_save(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any))));
        assert!(!is_save(&EventKind::Remove(RemoveKind::File)));
    }

    #[test]
    fn test_touches_matches_file_name_only() {
        let name = OsString::from("gate.toml");
        let event = Event::new(EventKind::Any).add_path(PathBuf::from("/etc/gate/gate.toml"));
        assert!(touches(&event, &name));
        let other = Event::new(EventKind::Any).add_path(PathBuf::from("/etc/gate/.gate.toml.tmp"));
        assert!(!touches(&other, &name));
    }
}
