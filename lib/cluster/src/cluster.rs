use crate::centroid::Centroid;
use serde::Serialize;
use tabula_core::{DataObject, ObjectId};

/// Algorithm-specific state carried by a cluster
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClusterPayload {
    /// DBSCAN clusters and the noise cluster carry nothing extra
    #[default]
    None,
    /// Current centroid of a KMeans cluster
    KMeans { centroid: Centroid },
    /// Representative object of an agglomerative cluster; `merged` is set
    /// once the cluster has absorbed at least one other cluster
    Agglomerative { representative: Centroid, merged: bool },
}

/// A named group of objects
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Cluster {
    pub name: String,
    pub members: Vec<DataObject>,
    pub payload: ClusterPayload,
}

impl Cluster {
    pub fn new(name: impl Into<String>, members: Vec<DataObject>) -> Self {
        Self {
            name: name.into(),
            members,
            payload: ClusterPayload::None,
        }
    }

    pub fn with_payload(mut self, payload: ClusterPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn member_ids(&self) -> Vec<ObjectId> {
        self.members.iter().map(|m| m.id).collect()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Centroid of a KMeans cluster, or representative of an agglomerative one
    pub fn centroid(&self) -> Option<&Centroid> {
        match &self.payload {
            ClusterPayload::KMeans { centroid } => Some(centroid),
            ClusterPayload::Agglomerative { representative, .. } => Some(representative),
            ClusterPayload::None => None,
        }
    }

    pub fn is_merged(&self) -> bool {
        matches!(self.payload, ClusterPayload::Agglomerative { merged: true, .. })
    }

    /// Drop member values, keeping only object identity
    pub fn strip_values(&mut self) {
        for member in &mut self.members {
            member.values.clear();
        }
        match &mut self.payload {
            ClusterPayload::KMeans { centroid } => *centroid = Centroid::from_values(Vec::new()),
            ClusterPayload::Agglomerative { representative, .. } => {
                *representative = Centroid::from_values(Vec::new())
            }
            ClusterPayload::None => {}
        }
    }
}

/// Name of the `index`-th (zero-based) cluster of a result
pub(crate) fn cluster_name(index: usize) -> String {
    format!("Cluster {}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::ParameterValue;

    #[test]
    fn test_member_ids_and_flags() {
        let a = DataObject::new(1, "a", vec![ParameterValue::numeric(1, 0.1)]);
        let b = DataObject::new(2, "b", vec![ParameterValue::numeric(1, 0.2)]);
        let cluster = Cluster::new("Cluster 1", vec![a.clone(), b]).with_payload(
            ClusterPayload::Agglomerative {
                representative: Centroid::from_object(&a),
                merged: true,
            },
        );
        assert_eq!(cluster.member_ids(), vec![1, 2]);
        assert!(cluster.contains(2));
        assert!(cluster.is_merged());
        assert!(cluster.centroid().is_some());
        assert!(Cluster::new("Noise", vec![]).centroid().is_none());
    }

    #[test]
    fn test_strip_values() {
        let a = DataObject::new(1, "a", vec![ParameterValue::numeric(1, 0.1)]);
        let mut cluster = Cluster::new("Cluster 1", vec![a.clone()])
            .with_payload(ClusterPayload::KMeans { centroid: Centroid::from_object(&a) });
        cluster.strip_values();
        assert!(cluster.members[0].values.is_empty());
        assert!(cluster.centroid().unwrap().values().is_empty());
        assert_eq!(cluster.member_ids(), vec![1]);
    }
}
