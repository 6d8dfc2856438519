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

//! Error types for graphbind operations.

use thiserror::Error;

use crate::session::SessionError;

/// Error produced by a malformed or misused model schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The named field is not declared as a relationship on this model type.
    #[error("type '{type_name}' has no relationship field '{field}'")]
    UnknownRelationship {
        /// The model type name.
        type_name: String,
        /// The field that was requested.
        field: String,
    },

    /// A relationship declaration references a model type that has never
    /// been registered. References are resolved lazily on first use, so
    /// this surfaces at the first traversal, not at declaration time.
    #[error("unresolved model reference '{0}'")]
    UnresolvedReference(String),

    /// The endpoint match for a query cannot identify a unique node.
    #[error("cannot identify a unique '{type_name}' endpoint: {reason}")]
    AmbiguousEndpoint {
        /// The endpoint model type name.
        type_name: String,
        /// Why the match predicate is ambiguous.
        reason: String,
    },

    /// A node schema was built with an empty label set or a blank label.
    #[error("node schema for '{0}' has an empty or blank label")]
    EmptyLabels(String),

    /// A relationship schema declared an empty rel_type.
    #[error("relationship schema for '{0}' has an empty rel_type")]
    EmptyRelType(String),

    /// A relationship declaration on a node field has an empty rel_type.
    #[error("relationship declaration '{type_name}.{field}' has an empty rel_type")]
    EmptyDeclarationRelType {
        /// The declaring model type name.
        type_name: String,
        /// The declaring field name.
        field: String,
    },

    /// The same field name was declared more than once in a schema.
    #[error("duplicate field '{field}' in schema for '{type_name}'")]
    DuplicateField {
        /// The model type name.
        type_name: String,
        /// The duplicated field name.
        field: String,
    },
}

/// Error produced while converting between typed models and graph records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    /// A field value cannot be represented as a store primitive
    /// (scalar or homogeneous list of scalars).
    #[error("field '{field}' is not representable as a graph property: {reason}")]
    Unrepresentable {
        /// The offending field name.
        field: String,
        /// Why the value is not representable.
        reason: String,
    },

    /// A required scalar field was absent from the record.
    #[error("missing required field '{0}'")]
    MissingField(String),

    /// The model did not serialize to a map of named fields.
    #[error("model did not serialize to a map of fields")]
    NotAMap,

    /// The model failed to serialize.
    #[error("failed to serialize model: {0}")]
    Serialize(String),

    /// The record failed to deserialize into the model type.
    #[error("failed to deserialize record: {0}")]
    Deserialize(String),
}

/// Top-level error type for graphbind operations.
///
/// Errors surface to the caller unmodified in kind: schema and
/// serialization failures keep their taxonomy, and store-side failures
/// (constraint violations, connectivity) pass through without local
/// recovery or retry.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Malformed or misused model schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Conversion between a model and a graph record failed.
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// The store rejected a write because a unique constraint was breached.
    #[error("unique constraint violated: {0}")]
    ConstraintViolation(String),

    /// An endpoint match resolved to zero nodes.
    #[error("no matching '{type_name}' node found in the graph")]
    NotFound {
        /// The endpoint model type name.
        type_name: String,
    },

    /// The underlying session failed to reach the store.
    #[error("store connectivity error: {0}")]
    Connectivity(String),

    /// The store returned no record where one was required.
    #[error("store returned no result for {0}")]
    EmptyResult(&'static str),
}

impl From<SessionError> for GraphError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::ConstraintViolation(msg) => GraphError::ConstraintViolation(msg),
            SessionError::Connectivity(msg) => GraphError::Connectivity(msg),
        }
    }
}

/// Result type alias for graphbind operations.
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::UnknownRelationship {
            type_name: "Movie".to_string(),
            field: "reviews".to_string(),
        };
        assert!(err.to_string().contains("Movie"));
        assert!(err.to_string().contains("reviews"));
    }

    #[test]
    fn test_unresolved_reference_display() {
        let err = SchemaError::UnresolvedReference("User".to_string());
        assert!(err.to_string().contains("User"));
    }

    #[test]
    fn test_serialization_error_display() {
        let err = SerializationError::MissingField("title".to_string());
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_graph_error_wraps_schema_error() {
        let err: GraphError = SchemaError::EmptyLabels("Movie".to_string()).into();
        assert!(matches!(err, GraphError::Schema(_)));
        assert!(err.to_string().contains("Movie"));
    }

    #[test]
    fn test_graph_error_from_session_error() {
        let err: GraphError =
            SessionError::ConstraintViolation("title already exists".to_string()).into();
        assert!(matches!(err, GraphError::ConstraintViolation(_)));

        let err: GraphError = SessionError::Connectivity("refused".to_string()).into();
        assert!(matches!(err, GraphError::Connectivity(_)));
    }
}
