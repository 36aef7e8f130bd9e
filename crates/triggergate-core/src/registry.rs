//! Folder-aware job registry.
//!
//! Uses `DashMap` so lookups from concurrent request handlers never block
//! each other. Folders are created implicitly from job paths.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use tracing::debug;

use triggergate_protocols::{ItemLookup, Job, current_identity};

use crate::error::RegistryError;

/// Registry of jobs keyed by full path.
pub struct JobRegistry {
    jobs: DashMap<String, Arc<dyn Job>>,
    folders: DashSet<String>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            jobs: DashMap::new(),
            folders: DashSet::new(),
        }
    }

    /// Register a job, creating any parent folders.
    pub fn register(&self, job: Arc<dyn Job>) -> Result<(), RegistryError> {
        let path = job.full_name().to_string();
        let segments = split_path(&path)?;

        let mut parent = String::new();
        for segment in &segments[..segments.len() - 1] {
            if !parent.is_empty() {
                parent.push('/');
            }
            parent.push_str(segment);
            if self.jobs.contains_key(&parent) {
                return Err(RegistryError::ParentNotFolder {
                    path,
                    parent,
                });
            }
        }

        if self.folders.contains(&path) {
            return Err(RegistryError::AlreadyRegistered(path));
        }

        // The entry holds the shard lock, so only `folders` may be touched
        // until it is released.
        match self.jobs.entry(path.clone()) {
            Entry::Occupied(_) => Err(RegistryError::AlreadyRegistered(path)),
            Entry::Vacant(slot) => {
                let mut folder = String::new();
                for segment in &segments[..segments.len() - 1] {
                    if !folder.is_empty() {
                        folder.push('/');
                    }
                    folder.push_str(segment);
                    self.folders.insert(folder.clone());
                }
                slot.insert(job);
                debug!("Registered job {}", path);
                Ok(())
            }
        }
    }

    /// Whether a folder exists at `path`.
    pub fn is_folder(&self, path: &str) -> bool {
        self.folders.contains(path)
    }

    /// All job paths, sorted. Ignores permissions.
    pub fn job_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.jobs.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemLookup for JobRegistry {
    fn item_by_full_name(&self, full_name: &str) -> Option<Arc<dyn Job>> {
        let normalized = full_name.trim_matches('/');
        let job = self.jobs.get(normalized).map(|e| e.value().clone())?;
        let identity = current_identity();
        if job.can_read(&identity) {
            Some(job)
        } else {
            debug!("{:?} may not read {}", identity, normalized);
            None
        }
    }
}

fn split_path(path: &str) -> Result<Vec<&str>, RegistryError> {
    let segments: Vec<&str> = path.split('/').collect();
    if path.is_empty() || segments.iter().any(|s| s.is_empty()) {
        return Err(RegistryError::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
