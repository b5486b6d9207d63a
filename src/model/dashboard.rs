use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A dashboard record as stored in dashboards.json.
///
/// Either `id` is set directly, or the id sits under `base._id` (the shape
/// exported by the BI server).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardRecord {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<DashboardBase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardBase {
    #[serde(rename = "_id")]
    pub id: String,
}

impl DashboardRecord {
    pub fn dashboard_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or_else(|| self.base.as_ref().map(|b| b.id.as_str()))
            .filter(|id| !id.is_empty())
    }
}

/// Dashboard title → opaque id, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DashboardRegistry {
    pub dashboards: IndexMap<String, String>,
}

impl DashboardRegistry {
    /// Parse the registry from dashboards.json.
    ///
    /// Returns the registry and the titles of records that had no id. When a
    /// title repeats, the first record wins.
    pub fn from_json(text: &str) -> Result<(Self, Vec<String>), serde_json::Error> {
        let records: Vec<DashboardRecord> = serde_json::from_str(text)?;
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<DashboardRecord>) -> (Self, Vec<String>) {
        let mut dashboards = IndexMap::new();
        let mut skipped = Vec::new();
        for record in records {
            match record.dashboard_id() {
                Some(id) => {
                    let id = id.to_string();
                    dashboards.entry(record.title).or_insert(id);
                }
                None => skipped.push(record.title),
            }
        }
        (DashboardRegistry { dashboards }, skipped)
    }

    pub fn insert(&mut self, title: impl Into<String>, id: impl Into<String>) {
        self.dashboards.insert(title.into(), id.into());
    }

    pub fn get(&self, title: &str) -> Option<&str> {
        self.dashboards.get(title).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.dashboards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dashboards.is_empty()
    }
}
