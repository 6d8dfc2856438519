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

//! Node schemas and relationship declarations.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::SchemaError;
use crate::schema::Direction;

/// A declared relationship field on a node model.
///
/// The target node type and the edge properties type are recorded by
/// name and resolved against the registry lazily on first use, so two
/// models may reference each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipDeclaration {
    rel_type: String,
    direction: Direction,
    node_type: String,
    properties_type: String,
}

impl RelationshipDeclaration {
    /// Declare a relationship with its type, direction, and the names of
    /// the target node and edge properties model types.
    pub fn new(
        rel_type: impl Into<String>,
        direction: Direction,
        node_type: impl Into<String>,
        properties_type: impl Into<String>,
    ) -> Self {
        Self {
            rel_type: rel_type.into(),
            direction,
            node_type: node_type.into(),
            properties_type: properties_type.into(),
        }
    }

    /// The relationship type, matched exactly and case-sensitively.
    pub fn rel_type(&self) -> &str {
        &self.rel_type
    }

    /// The direction of the edge relative to the declaring model.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The name of the target node model type.
    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    /// The name of the edge properties model type.
    pub fn properties_type(&self) -> &str {
        &self.properties_type
    }
}

/// The derived schema of a node model type.
///
/// Built once per type via [`NodeSchema::builder`] and immutable
/// thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSchema {
    type_name: String,
    labels: Vec<String>,
    scalar_fields: Vec<String>,
    unique_fields: BTreeSet<String>,
    relationships: BTreeMap<String, RelationshipDeclaration>,
}

impl NodeSchema {
    /// Start building a schema for the named model type.
    pub fn builder(type_name: impl Into<String>) -> NodeSchemaBuilder {
        NodeSchemaBuilder {
            type_name: type_name.into(),
            labels: None,
            scalar_fields: Vec::new(),
            unique_fields: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// The model type name this schema was derived from.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The node labels, in declaration order. Defaults to the type name.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Scalar (persisted) field names in declaration order.
    pub fn scalar_fields(&self) -> &[String] {
        &self.scalar_fields
    }

    /// The set of fields carrying a unique constraint.
    pub fn unique_fields(&self) -> &BTreeSet<String> {
        &self.unique_fields
    }

    /// All declared relationship fields.
    pub fn relationships(&self) -> &BTreeMap<String, RelationshipDeclaration> {
        &self.relationships
    }

    /// Look up the relationship declaration for a field, if any.
    pub fn relationship(&self, field: &str) -> Option<&RelationshipDeclaration> {
        self.relationships.get(field)
    }

    /// Check whether a field is declared as a relationship.
    pub fn is_relationship_field(&self, field: &str) -> bool {
        self.relationships.contains_key(field)
    }
}

/// Builder for [`NodeSchema`]; fields are recorded in declaration order.
#[derive(Debug)]
pub struct NodeSchemaBuilder {
    type_name: String,
    labels: Option<Vec<String>>,
    scalar_fields: Vec<String>,
    unique_fields: Vec<String>,
    relationships: Vec<(String, RelationshipDeclaration)>,
}

impl NodeSchemaBuilder {
    /// Override the default label set (which is the type name alone).
    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Declare a scalar field.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.scalar_fields.push(name.into());
        self
    }

    /// Declare a scalar field carrying a unique constraint.
    pub fn unique(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.scalar_fields.push(name.clone());
        self.unique_fields.push(name);
        self
    }

    /// Declare a relationship field.
    pub fn relationship(
        mut self,
        field: impl Into<String>,
        declaration: RelationshipDeclaration,
    ) -> Self {
        self.relationships.push((field.into(), declaration));
        self
    }

    /// Validate and build the schema.
    pub fn build(self) -> Result<NodeSchema, SchemaError> {
        let labels = self
            .labels
            .unwrap_or_else(|| vec![self.type_name.clone()]);
        if labels.is_empty() || labels.iter().any(|label| label.trim().is_empty()) {
            return Err(SchemaError::EmptyLabels(self.type_name));
        }

        let mut seen = BTreeSet::new();
        for name in self
            .scalar_fields
            .iter()
            .chain(self.relationships.iter().map(|(name, _)| name))
        {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    type_name: self.type_name,
                    field: name.clone(),
                });
            }
        }

        let mut relationships = BTreeMap::new();
        for (field, declaration) in self.relationships {
            if declaration.rel_type.trim().is_empty() {
                return Err(SchemaError::EmptyDeclarationRelType {
                    type_name: self.type_name,
                    field,
                });
            }
            relationships.insert(field, declaration);
        }

        Ok(NodeSchema {
            type_name: self.type_name,
            labels,
            scalar_fields: self.scalar_fields,
            unique_fields: self.unique_fields.into_iter().collect(),
            relationships,
        })
    }
}
