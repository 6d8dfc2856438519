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

//! Process-wide schema registry.
//!
//! Schemas are computed lazily on the first use of a model type and
//! cached for the process lifetime; model type definitions are assumed
//! static, so entries are never invalidated. Under a racing first use
//! the schema may be computed twice; the first inserted copy wins and
//! the duplicate is discarded, so a partially-built schema is never
//! observable.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::SchemaError;
use crate::model::{NodeModel, RelationshipModel};
use crate::schema::node::{NodeSchema, RelationshipDeclaration};
use crate::schema::relationship::RelationshipSchema;

#[derive(Default)]
struct Registry {
    nodes: HashMap<TypeId, Arc<NodeSchema>>,
    nodes_by_name: HashMap<String, Arc<NodeSchema>>,
    relationships: HashMap<TypeId, Arc<RelationshipSchema>>,
    relationships_by_name: HashMap<String, Arc<RelationshipSchema>>,
    constrained: HashSet<TypeId>,
}

static REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::default()));

/// Get the cached node schema for a model type, deriving and caching it
/// on first use.
pub fn node_schema<M: NodeModel>() -> Result<Arc<NodeSchema>, SchemaError> {
    let key = TypeId::of::<M>();
    if let Some(schema) = REGISTRY.read().nodes.get(&key) {
        return Ok(schema.clone());
    }

    // Derive outside the lock; a racing caller may do the same and the
    // first insert wins.
    let schema = Arc::new(M::node_schema()?);
    let mut registry = REGISTRY.write();
    let entry = registry.nodes.entry(key).or_insert_with(|| schema).clone();
    registry
        .nodes_by_name
        .entry(entry.type_name().to_string())
        .or_insert_with(|| entry.clone());
    Ok(entry)
}

/// Get the cached relationship schema for a model type, deriving and
/// caching it on first use.
pub fn relationship_schema<P: RelationshipModel>() -> Result<Arc<RelationshipSchema>, SchemaError> {
    let key = TypeId::of::<P>();
    if let Some(schema) = REGISTRY.read().relationships.get(&key) {
        return Ok(schema.clone());
    }

    let schema = Arc::new(P::relationship_schema()?);
    let mut registry = REGISTRY.write();
    let entry = registry
        .relationships
        .entry(key)
        .or_insert_with(|| schema)
        .clone();
    registry
        .relationships_by_name
        .entry(entry.type_name().to_string())
        .or_insert_with(|| entry.clone());
    Ok(entry)
}

/// Resolve a node schema by model type name.
///
/// Only types whose schemas have already been derived are visible;
/// an unknown name is an unresolved forward reference.
pub fn node_schema_by_name(name: &str) -> Result<Arc<NodeSchema>, SchemaError> {
    REGISTRY
        .read()
        .nodes_by_name
        .get(name)
        .cloned()
        .ok_or_else(|| SchemaError::UnresolvedReference(name.to_string()))
}

/// Resolve a relationship schema by model type name.
pub fn relationship_schema_by_name(name: &str) -> Result<Arc<RelationshipSchema>, SchemaError> {
    REGISTRY
        .read()
        .relationships_by_name
        .get(name)
        .cloned()
        .ok_or_else(|| SchemaError::UnresolvedReference(name.to_string()))
}

/// Check that the model types named by a relationship declaration have
/// been registered. Declarations record their references by name; this
/// is the lazy, first-use resolution point.
pub fn resolve_declaration(declaration: &RelationshipDeclaration) -> Result<(), SchemaError> {
    node_schema_by_name(declaration.node_type())?;
    relationship_schema_by_name(declaration.properties_type())?;
    Ok(())
}

/// Check whether constraint statements still need to be applied for a
/// model type in this process.
pub fn needs_constraints<M: NodeModel>() -> bool {
    !REGISTRY.read().constrained.contains(&TypeId::of::<M>())
}

/// Record that constraint statements have been applied for a model type.
pub fn mark_constrained<M: NodeModel>() {
    REGISTRY.write().constrained.insert(TypeId::of::<M>());
}
