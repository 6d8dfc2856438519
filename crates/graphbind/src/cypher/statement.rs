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

//! Parameterized Cypher statements.

use serde::{Deserialize, Serialize};

use crate::value::{PropertyMap, Value};

/// The operation shape a statement was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementType {
    /// Idempotent constraint declaration.
    Constraint,
    /// Node creation.
    CreateNode,
    /// Relationship creation between matched endpoints.
    CreateRelationship,
    /// Directed relationship traversal.
    Traverse,
}

/// A single parameterized Cypher statement.
///
/// All runtime values travel in `parameters`; the query text itself only
/// ever interpolates escaped identifiers (labels, relationship types,
/// property names).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CypherStatement {
    /// The Cypher query text.
    pub query: String,
    /// Parameters for the query.
    pub parameters: PropertyMap,
    /// The operation shape of this statement.
    pub statement_type: StatementType,
}

impl CypherStatement {
    /// Create a new statement with no parameters.
    pub fn new(query: impl Into<String>, statement_type: StatementType) -> Self {
        Self {
            query: query.into(),
            parameters: PropertyMap::new(),
            statement_type,
        }
    }

    /// Create a constraint statement.
    pub fn constraint(query: impl Into<String>) -> Self {
        Self::new(query, StatementType::Constraint)
    }

    /// Create a node creation statement.
    pub fn create_node(query: impl Into<String>) -> Self {
        Self::new(query, StatementType::CreateNode)
    }

    /// Create a relationship creation statement.
    pub fn create_relationship(query: impl Into<String>) -> Self {
        Self::new(query, StatementType::CreateRelationship)
    }

    /// Create a traversal statement.
    pub fn traverse(query: impl Into<String>) -> Self {
        Self::new(query, StatementType::Traverse)
    }

    /// Add a parameter to this statement.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Check if this statement has parameters.
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }
}
