//! File system watcher that reports `file_changed` events.
//!
//! Watches every watch folder recursively, skipping dependency folders and
//! hidden paths, and debounces repeated events for the same file.

use devhost::{Reporter, ReporterEvent};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde_json::{Map, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

pub const FILE_CHANGED: &str = "file_changed";

const DEBOUNCE: Duration = Duration::from_millis(50);
const IGNORED_DIRS: [&str; 2] = ["node_modules", "target"];

/// Kind of file system change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    fn from_event(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(ChangeKind::Created),
            EventKind::Modify(_) => Some(ChangeKind::Modified),
            EventKind::Remove(_) => Some(ChangeKind::Removed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Modified => "modified",
            ChangeKind::Removed => "removed",
        }
    }
}

pub fn file_changed_event(path: &Path, change: ChangeKind) -> ReporterEvent {
    let mut fields = Map::new();
    fields.insert("filePath".into(), json!(path.display().to_string()));
    fields.insert("change".into(), json!(change.as_str()));
    ReporterEvent::new(FILE_CHANGED, fields)
}

/// Live watcher; stops watching when dropped.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    roots: Vec<PathBuf>,
}

impl FileWatcher {
    /// Watch `roots` recursively and report changes to `reporter`.
    ///
    /// # Arguments
    ///
    /// * `roots` - Directories to watch; paths outside all of them are ignored
    /// * `reporter` - Receives one `file_changed` event per relevant change
    ///
    /// # Errors
    ///
    /// Returns an error if the platform watcher cannot be created or a root
    /// cannot be watched.
    pub fn new(roots: Vec<PathBuf>, reporter: Arc<dyn Reporter>) -> notify::Result<Self> {
        let filter_roots = roots.clone();
        let mut last_event: Option<(PathBuf, Instant)> = None;

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    debug!(error = %e, "File watcher error");
                    return;
                }
            };
            let Some(change) = ChangeKind::from_event(&event.kind) else {
                return;
            };

            for path in &event.paths {
                if should_ignore(path, &filter_roots) {
                    continue;
                }

                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if last_path == path && now.duration_since(*last_time) < DEBOUNCE {
                        continue;
                    }
                }
                last_event = Some((path.clone(), now));

                reporter.update(&file_changed_event(path, change));
            }
        })?;

        for root in &roots {
            watcher.watch(root, RecursiveMode::Recursive)?;
        }
        debug!(roots = ?roots, "Watching for changes");

        Ok(Self {
            _watcher: watcher,
            roots,
        })
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

/// True for paths outside every root, inside dependency folders, or hidden.
fn should_ignore(path: &Path, roots: &[PathBuf]) -> bool {
    let Some(relative) = roots.iter().find_map(|root| path.strip_prefix(root).ok()) else {
        return true;
    };

    relative.components().any(|component| {
        let name = component.as_os_str().to_string_lossy();
        (name.starts_with('.') && name != "." && name != "..")
            || IGNORED_DIRS.contains(&name.as_ref())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_should_ignore_dependencies_and_hidden() {
        let roots = vec![PathBuf::from("/project")];

        assert!(should_ignore(Path::new("/project/node_modules/a/index.js"), &roots));
        assert!(should_ignore(Path::new("/project/.git/config"), &roots));
        assert!(should_ignore(Path::new("/project/src/.cache/x.js"), &roots));
        assert!(!should_ignore(Path::new("/project/src/App.tsx"), &roots));
    }

    #[test]
    fn test_should_ignore_outside_all_roots() {
        let roots = vec![PathBuf::from("/project"), PathBuf::from("/shared")];

        assert!(!should_ignore(Path::new("/shared/theme.ts"), &roots));
        assert!(should_ignore(Path::new("/other/file.js"), &roots));
    }

    #[test]
    fn test_file_changed_event_fields() {
        let event = file_changed_event(Path::new("/project/App.tsx"), ChangeKind::Modified);
        assert_eq!(event.kind(), Some(FILE_CHANGED));
        assert_eq!(event.field("filePath"), Some(&json!("/project/App.tsx")));
        assert_eq!(event.field("change"), Some(&json!("modified")));
    }

    #[derive(Default)]
    struct Collect(Mutex<Vec<ReporterEvent>>);

    impl Reporter for Collect {
        fn update(&self, event: &ReporterEvent) {
            self.0.lock().push(event.clone());
        }
    }

    #[test]
    fn test_watcher_reports_new_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let collect = Arc::new(Collect::default());

        let watcher = FileWatcher::new(vec![root.clone()], collect.clone()).unwrap();
        assert_eq!(watcher.roots(), &[root.clone()]);
        std::fs::write(root.join("index.js"), "export {}").unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while collect.0.lock().is_empty() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
        }
        let events = collect.0.lock();
        assert!(events.iter().all(|e| e.kind() == Some(FILE_CHANGED)));
        assert!(!events.is_empty());
    }
}
