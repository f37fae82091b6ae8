//! Typed access to the `communities` collection
//!
//! Mutations go through [`CommunityPatch`] so every update names its fields
//! explicitly; nothing merges dynamically shaped maps into the store.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use warden_core::{CommunityId, CommunityRecord, MemberRecord, ProvisionedResources};

use crate::error::StoreResult;
use crate::json_store::JsonStore;

const COLLECTION: &str = "communities";

/// Explicit field list for a community document update
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommunityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ProvisionedResources>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<MemberRecord>>,
}

impl CommunityPatch {
    /// Patch that replaces the member sequence
    pub fn members(members: Vec<MemberRecord>) -> Self {
        Self {
            members: Some(members),
            ..Self::default()
        }
    }
}

/// Typed repository over the `communities` collection
#[derive(Clone)]
pub struct CommunityStore {
    store: Arc<JsonStore>,
}

impl CommunityStore {
    /// Create a community store over a shared document store
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    /// Fetch a community record by id
    pub async fn get(&self, id: &CommunityId) -> StoreResult<Option<CommunityRecord>> {
        let Some(doc) = self.store.get(COLLECTION, id.as_str()).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(doc)?))
    }

    /// Create or merge the full community record
    pub async fn upsert(&self, record: &CommunityRecord) -> StoreResult<()> {
        let fields = serde_json::to_value(record)?;
        self.store
            .save(COLLECTION, record.id.as_str(), fields)
            .await
    }

    /// Merge an explicit field patch onto an existing record
    ///
    /// Returns false (and writes nothing) when the community is unknown.
    pub async fn patch(&self, id: &CommunityId, patch: CommunityPatch) -> StoreResult<bool> {
        let fields: Value = serde_json::to_value(&patch)?;
        self.store.update(COLLECTION, id.as_str(), fields).await
    }
}
