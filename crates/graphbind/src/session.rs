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

//! The graph-store session boundary.
//!
//! graphbind owns no connections, pools, or retry logic; every
//! operation is a single request/response call delegated to an injected
//! [`GraphSession`]. Suspension and cancellation semantics are inherited
//! from the implementation unchanged.

use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::value::{PropertyMap, Value};

/// An opaque node handle returned by the store: its labels plus the
/// persisted properties. Store-internal identity is deliberately not
/// surfaced; matching is always done through declared unique fields.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    /// The node's labels.
    pub labels: Vec<String>,
    /// The node's persisted properties.
    pub properties: PropertyMap,
}

impl GraphNode {
    /// Create a node handle with the given labels.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            properties: PropertyMap::new(),
        }
    }

    /// Add a property to the handle.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// An opaque relationship handle returned by the store: its type plus
/// the persisted properties.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphRelationship {
    /// The relationship type.
    pub rel_type: String,
    /// The relationship's persisted properties.
    pub properties: PropertyMap,
}

impl GraphRelationship {
    /// Create a relationship handle with the given type.
    pub fn new(rel_type: impl Into<String>) -> Self {
        Self {
            rel_type: rel_type.into(),
            properties: PropertyMap::new(),
        }
    }

    /// Add a property to the handle.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// One field of a returned record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A plain value: scalar or homogeneous array of scalars.
    Value(Value),
    /// A node handle.
    Node(GraphNode),
    /// A relationship handle.
    Relationship(GraphRelationship),
}

impl RecordValue {
    /// Try to view this field as a node handle.
    pub fn as_node(&self) -> Option<&GraphNode> {
        match self {
            RecordValue::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Try to view this field as a relationship handle.
    pub fn as_relationship(&self) -> Option<&GraphRelationship> {
        match self {
            RecordValue::Relationship(rel) => Some(rel),
            _ => None,
        }
    }
}

/// A record returned by the store: field name to value.
pub type Record = BTreeMap<String, RecordValue>;

/// Failure surfaced by a session implementation. Both variants pass
/// through to callers unmodified in kind; graphbind performs no
/// recovery or retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A unique constraint was breached by a write.
    #[error("unique constraint violated: {0}")]
    ConstraintViolation(String),

    /// The store could not be reached or the request failed in transit.
    #[error("connectivity error: {0}")]
    Connectivity(String),
}

/// A graph-store session capable of running one parameterized query and
/// returning its records.
///
/// Implementations wrap a driver session or transaction; graphbind
/// issues single request/response calls and never holds a session
/// across await points longer than one query. Independent sessions may
/// be used concurrently without coordination.
#[async_trait]
pub trait GraphSession: Send + Sync {
    /// Run one parameterized query and collect its records in
    /// store-native order.
    async fn run(&self, query: &str, parameters: PropertyMap) -> Result<Vec<Record>, SessionError>;
}
