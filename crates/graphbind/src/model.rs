// Dweve Graphbind - Typed Object-Graph Mapper
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Declarative model traits and typed edge containers.
//!
//! A node model is a plain serde struct that describes a graph node; a
//! relationship model describes an edge's properties. Each declares its
//! schema once through [`NodeModel::node_schema`] /
//! [`RelationshipModel::relationship_schema`]; the registry caches the
//! result per type for the process lifetime.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::convert;
use crate::error::{SchemaError, SerializationError};
use crate::schema::node::NodeSchema;
use crate::schema::registry;
use crate::schema::relationship::RelationshipSchema;
use crate::value::PropertyMap;

/// A declarative node model type.
///
/// Relationship fields must be [`EdgeList`] values and must be declared
/// in the schema; models that have relationship fields also override
/// [`NodeModel::relationship_mut`] to hand out the matching container so
/// that [`crate::ops::refresh_relationship`] can replace its contents in
/// place.
pub trait NodeModel: Serialize + DeserializeOwned + 'static {
    /// The model type name; used as the default label and as the key
    /// for by-name reference resolution.
    fn type_name() -> &'static str;

    /// Derive this type's schema. Called once per process by the
    /// registry.
    fn node_schema() -> Result<NodeSchema, SchemaError>;

    /// Borrow the edge container backing a declared relationship field.
    ///
    /// The default implementation knows no relationship fields.
    fn relationship_mut(&mut self, field: &str) -> Option<&mut dyn EdgeContainer> {
        let _ = field;
        None
    }
}

/// A declarative relationship (edge properties) model type.
pub trait RelationshipModel: Serialize + DeserializeOwned + 'static {
    /// The model type name; used as the default rel_type and as the key
    /// for by-name reference resolution.
    fn type_name() -> &'static str;

    /// Derive this type's schema. Called once per process by the
    /// registry.
    fn relationship_schema() -> Result<RelationshipSchema, SchemaError>;
}

/// One traversed edge: the far endpoint node paired with the edge's
/// properties.
///
/// Edges are materialized views produced fresh by each traversal; they
/// carry no identity across calls and are not persisted as entities.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<N, P> {
    /// The node at the far end of the edge.
    pub node: N,
    /// The edge's properties.
    pub properties: P,
}

#[derive(Debug, Clone, PartialEq)]
enum LoadState<N, P> {
    NotLoaded,
    Loaded(Vec<Edge<N, P>>),
}

/// The value of a declared relationship field.
///
/// The load state is explicit: `NotLoaded` (never fetched, the declared
/// default) is distinct from `Loaded` with zero edges. Reading the field
/// never triggers a fetch; only
/// [`crate::ops::refresh_relationship`] replaces its contents.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeList<N, P> {
    state: LoadState<N, P>,
}

impl<N, P> EdgeList<N, P> {
    /// Create an empty, not-yet-loaded edge list.
    pub fn new() -> Self {
        Self {
            state: LoadState::NotLoaded,
        }
    }

    /// Create an edge list in the loaded state.
    pub fn loaded(edges: Vec<Edge<N, P>>) -> Self {
        Self {
            state: LoadState::Loaded(edges),
        }
    }

    /// Check whether this field has been loaded by a traversal.
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, LoadState::Loaded(_))
    }

    /// The loaded edges, or `None` if the field was never loaded.
    pub fn edges(&self) -> Option<&[Edge<N, P>]> {
        match &self.state {
            LoadState::NotLoaded => None,
            LoadState::Loaded(edges) => Some(edges),
        }
    }

    /// Iterate over the loaded edges; yields nothing when not loaded.
    pub fn iter(&self) -> std::slice::Iter<'_, Edge<N, P>> {
        self.edges().unwrap_or_default().iter()
    }

    /// The number of loaded edges; zero when not loaded.
    pub fn len(&self) -> usize {
        self.edges().map_or(0, <[_]>::len)
    }

    /// Check whether no edges are loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the contents with freshly traversed edges.
    pub fn replace(&mut self, edges: Vec<Edge<N, P>>) {
        self.state = LoadState::Loaded(edges);
    }
}

impl<N, P> Default for EdgeList<N, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, N, P> IntoIterator for &'a EdgeList<N, P> {
    type Item = &'a Edge<N, P>;
    type IntoIter = std::slice::Iter<'a, Edge<N, P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Relationship fields are never persisted: they serialize to null and
// are filtered out of property maps by schema. Deserialization accepts
// and ignores any value, always yielding the not-loaded state, so that
// records hydrate without implicitly carrying relationships.
impl<N, P> Serialize for EdgeList<N, P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_none()
    }
}

impl<'de, N, P> Deserialize<'de> for EdgeList<N, P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let _ = IgnoredAny::deserialize(deserializer)?;
        Ok(Self::new())
    }
}

/// Type-erased access to an [`EdgeList`], used by
/// [`crate::ops::refresh_relationship`] to replace a relationship field
/// without knowing its edge types.
pub trait EdgeContainer {
    /// Derive and register the schemas of the edge's node and properties
    /// types. This is the first-use point at which by-name references
    /// become resolvable.
    fn ensure_schemas(&self) -> Result<(), SchemaError>;

    /// Convert raw (node record, relationship record) pairs into typed
    /// edges and replace the container's contents with them.
    fn replace_from_records(
        &mut self,
        pairs: Vec<(PropertyMap, PropertyMap)>,
    ) -> Result<(), SerializationError>;
}

impl<N: NodeModel, P: RelationshipModel> EdgeContainer for EdgeList<N, P> {
    fn ensure_schemas(&self) -> Result<(), SchemaError> {
        registry::node_schema::<N>()?;
        registry::relationship_schema::<P>()?;
        Ok(())
    }

    fn replace_from_records(
        &mut self,
        pairs: Vec<(PropertyMap, PropertyMap)>,
    ) -> Result<(), SerializationError> {
        let edges = pairs
            .into_iter()
            .map(|(node, properties)| {
                Ok(Edge {
                    node: convert::record_to_model::<N>(&node)?,
                    properties: convert::record_to_model::<P>(&properties)?,
                })
            })
            .collect::<Result<Vec<_>, SerializationError>>()?;
        self.replace(edges);
        Ok(())
    }
}
