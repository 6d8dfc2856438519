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

//! Relationship (edge properties) schemas.

use crate::error::SchemaError;

/// The derived schema of a relationship model type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipSchema {
    type_name: String,
    rel_type: String,
    fields: Vec<String>,
}

impl RelationshipSchema {
    /// Start building a schema for the named model type.
    pub fn builder(type_name: impl Into<String>) -> RelationshipSchemaBuilder {
        RelationshipSchemaBuilder {
            type_name: type_name.into(),
            rel_type: None,
            fields: Vec::new(),
        }
    }

    /// The model type name this schema was derived from.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The relationship type. Defaults to the type name; matched exactly
    /// and case-sensitively.
    pub fn rel_type(&self) -> &str {
        &self.rel_type
    }

    /// Property field names in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

/// Builder for [`RelationshipSchema`].
#[derive(Debug)]
pub struct RelationshipSchemaBuilder {
    type_name: String,
    rel_type: Option<String>,
    fields: Vec<String>,
}

impl RelationshipSchemaBuilder {
    /// Override the relationship type (default: the type name).
    pub fn rel_type(mut self, rel_type: impl Into<String>) -> Self {
        self.rel_type = Some(rel_type.into());
        self
    }

    /// Declare a property field.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    /// Validate and build the schema.
    pub fn build(self) -> Result<RelationshipSchema, SchemaError> {
        let rel_type = self.rel_type.unwrap_or_else(|| self.type_name.clone());
        if rel_type.trim().is_empty() {
            return Err(SchemaError::EmptyRelType(self.type_name));
        }

        let mut seen = std::collections::BTreeSet::new();
        for name in &self.fields {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    type_name: self.type_name,
                    field: name.clone(),
                });
            }
        }

        Ok(RelationshipSchema {
            type_name: self.type_name,
            rel_type,
            fields: self.fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rel_type_defaults_to_type_name() {
        let schema = RelationshipSchema::builder("MovieReview")
            .field("rating")
            .field("summary")
            .build()
            .unwrap();

        assert_eq!(schema.type_name(), "MovieReview");
        assert_eq!(schema.rel_type(), "MovieReview");
        assert_eq!(schema.fields(), ["rating", "summary"]);
    }

    #[test]
    fn test_rel_type_override() {
        let schema = RelationshipSchema::builder("MovieReview")
            .rel_type("REVIEWED")
            .build()
            .unwrap();

        assert_eq!(schema.rel_type(), "REVIEWED");
    }

    #[test]
    fn test_empty_rel_type_rejected() {
        let result = RelationshipSchema::builder("MovieReview").rel_type("").build();
        assert_eq!(
            result,
            Err(SchemaError::EmptyRelType("MovieReview".to_string()))
        );
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let result = RelationshipSchema::builder("Role")
            .field("roles")
            .field("roles")
            .build();
        assert!(matches!(result, Err(SchemaError::DuplicateField { .. })));
    }
}
