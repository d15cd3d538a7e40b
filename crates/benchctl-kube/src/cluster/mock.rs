//! In-memory cluster for testing
//!
//! Objects are stored per (kind, namespace, name). Every call is recorded in
//! order so tests can assert on the exact request sequence, and behavior can
//! be steered per object:
//! - conflicts injected into the next N replaces
//! - hard failures for a given verb
//! - scripted `status` values returned by successive gets
//! - deleted objects that stay visible for N further gets

use async_trait::async_trait;
use kube::api::DynamicObject;
use kube::discovery::ApiResource;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::ClusterApi;
use crate::error::{KubeError, Result};

/// API verbs, for call recording and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    List,
    Get,
    Create,
    Replace,
    Delete,
}

/// One recorded call against the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterCall {
    pub verb: Verb,
    pub kind: String,
    pub namespace: Option<String>,
    /// Empty for list calls
    pub name: String,
}

type ObjectKey = (String, Option<String>, String);
type HookKey = (String, String);

#[derive(Default)]
struct MockState {
    objects: BTreeMap<ObjectKey, DynamicObject>,
    /// Deleted objects still visible to `get` for the given number of calls
    terminating: HashMap<ObjectKey, (DynamicObject, u32)>,
    calls: Vec<ClusterCall>,
    conflicts: HashMap<HookKey, u32>,
    failures: HashMap<(Verb, String, String), String>,
    statuses: HashMap<HookKey, VecDeque<serde_json::Value>>,
    linger: HashMap<HookKey, u32>,
    next_version: u64,
}

/// In-memory `ClusterApi` implementation
#[derive(Clone, Default)]
pub struct MockCluster {
    state: Arc<Mutex<MockState>>,
}

impl MockCluster {
    /// Create a new empty mock cluster
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<ClusterCall> {
        self.state().calls.clone()
    }

    /// Calls with the given verb, in order
    pub fn calls_with(&self, verb: Verb) -> Vec<ClusterCall> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.verb == verb)
            .cloned()
            .collect()
    }

    /// Forget recorded calls
    pub fn reset_calls(&self) {
        self.state().calls.clear();
    }

    /// Current stored object, if any
    pub fn object(&self, kind: &str, namespace: Option<&str>, name: &str) -> Option<DynamicObject> {
        self.state().objects.get(&key(kind, namespace, name)).cloned()
    }

    /// Number of stored objects
    pub fn object_count(&self) -> usize {
        self.state().objects.len()
    }

    /// Make the next `count` replaces of this object fail with 409
    pub fn inject_conflicts(&self, kind: &str, name: &str, count: u32) {
        self.state()
            .conflicts
            .insert(hook(kind, name), count);
    }

    /// Make every `verb` call on this object fail with a 500
    pub fn inject_failure(&self, verb: Verb, kind: &str, name: &str, message: &str) {
        self.state()
            .failures
            .insert((verb, kind.to_string(), name.to_string()), message.to_string());
    }

    /// Status reported by successive gets of this object
    ///
    /// Each get consumes one entry; the last entry keeps being reported.
    pub fn script_status(&self, kind: &str, name: &str, statuses: Vec<serde_json::Value>) {
        self.state()
            .statuses
            .insert(hook(kind, name), statuses.into());
    }

    /// Status reported by every get of this object
    pub fn set_status(&self, kind: &str, name: &str, status: serde_json::Value) {
        self.script_status(kind, name, vec![status]);
    }

    /// Keep this object visible for `gets` further gets after it is deleted
    pub fn linger_after_delete(&self, kind: &str, name: &str, gets: u32) {
        self.state().linger.insert(hook(kind, name), gets);
    }
}

fn key(kind: &str, namespace: Option<&str>, name: &str) -> ObjectKey {
    (
        kind.to_string(),
        namespace.map(str::to_string),
        name.to_string(),
    )
}

fn hook(kind: &str, name: &str) -> HookKey {
    (kind.to_string(), name.to_string())
}

impl MockState {
    fn record(&mut self, verb: Verb, kind: &str, namespace: Option<&str>, name: &str) -> Result<()> {
        self.calls.push(ClusterCall {
            verb,
            kind: kind.to_string(),
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
        });

        match self
            .failures
            .get(&(verb, kind.to_string(), name.to_string()))
        {
            Some(message) => Err(KubeError::api_status(500, "InternalError", message.clone())),
            None => Ok(()),
        }
    }

    fn stamp(&mut self, object: &mut DynamicObject, namespace: Option<&str>) {
        self.next_version += 1;
        object.metadata.resource_version = Some(self.next_version.to_string());
        object.metadata.namespace = namespace.map(str::to_string);
    }

    fn apply_scripted_status(&mut self, object_key: &ObjectKey) {
        let hook_key = (object_key.0.clone(), object_key.2.clone());
        let Some(queue) = self.statuses.get_mut(&hook_key) else {
            return;
        };

        let status = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        if let Some(status) = status
            && let Some(object) = self.objects.get_mut(object_key)
        {
            if !object.data.is_object() {
                object.data = serde_json::json!({});
            }
            object.data["status"] = status;
        }
    }
}

#[async_trait]
impl ClusterApi for MockCluster {
    async fn list(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
    ) -> Result<Vec<DynamicObject>> {
        let mut state = self.state();
        state.record(Verb::List, &resource.kind, namespace, "")?;

        Ok(state
            .objects
            .iter()
            .filter(|((kind, ns, _), _)| *kind == resource.kind && ns.as_deref() == namespace)
            .map(|(_, object)| object.clone())
            .collect())
    }

    async fn get(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<DynamicObject> {
        let mut state = self.state();
        state.record(Verb::Get, &resource.kind, namespace, name)?;

        let object_key = key(&resource.kind, namespace, name);
        if let Some((object, remaining)) = state.terminating.get_mut(&object_key) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(object.clone());
            }
            state.terminating.remove(&object_key);
        }

        state.apply_scripted_status(&object_key);
        state
            .objects
            .get(&object_key)
            .cloned()
            .ok_or_else(|| KubeError::not_found(&resource.kind, name))
    }

    async fn create(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        object: &DynamicObject,
    ) -> Result<DynamicObject> {
        let name = object.metadata.name.clone().unwrap_or_default();
        let mut state = self.state();
        state.record(Verb::Create, &resource.kind, namespace, &name)?;

        let object_key = key(&resource.kind, namespace, &name);
        if state.objects.contains_key(&object_key) {
            return Err(KubeError::api_status(
                409,
                "AlreadyExists",
                format!("{} \"{}\" already exists", resource.kind.to_lowercase(), name),
            ));
        }

        let mut stored = object.clone();
        state.stamp(&mut stored, namespace);
        state.objects.insert(object_key, stored.clone());
        Ok(stored)
    }

    async fn replace(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
        object: &DynamicObject,
    ) -> Result<DynamicObject> {
        let mut state = self.state();
        state.record(Verb::Replace, &resource.kind, namespace, name)?;

        if let Some(remaining) = state.conflicts.get_mut(&hook(&resource.kind, name))
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(KubeError::conflict(&resource.kind, name));
        }

        let object_key = key(&resource.kind, namespace, name);
        if !state.objects.contains_key(&object_key) {
            return Err(KubeError::not_found(&resource.kind, name));
        }

        let mut stored = object.clone();
        state.stamp(&mut stored, namespace);
        state.objects.insert(object_key, stored.clone());
        Ok(stored)
    }

    async fn delete(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<()> {
        let mut state = self.state();
        state.record(Verb::Delete, &resource.kind, namespace, name)?;

        let object_key = key(&resource.kind, namespace, name);
        let object = state
            .objects
            .remove(&object_key)
            .ok_or_else(|| KubeError::not_found(&resource.kind, name))?;

        if let Some(&gets) = state.linger.get(&hook(&resource.kind, name))
            && gets > 0
        {
            state.terminating.insert(object_key, (object, gets));
        }

        Ok(())
    }
}
