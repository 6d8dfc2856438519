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

//! Typed object-graph mapping for Neo4j-compatible property graphs.
//!
//! graphbind translates declarative model definitions into property-graph
//! operations and converts raw graph records back into typed instances:
//!
//! - **Schema derivation**: each model type declares labels, unique
//!   fields, and relationship fields once; the result is cached
//!   process-wide and immutable thereafter.
//! - **Query generation**: parameterized Cypher for four fixed shapes —
//!   node create, relationship create, constraint create, and directed
//!   relationship traversal.
//! - **Conversion**: lossless flattening of scalar fields into property
//!   maps, and hydration of records back into models, with relationship
//!   fields kept in an explicit not-loaded state.
//!
//! Transport is injected: every operation runs through a caller-supplied
//! [`GraphSession`], so connection, transaction, and retry policy stay
//! outside this crate, and no I/O ever happens implicitly.
//!
//! # Example
//!
//! ```rust
//! use graphbind::{
//!     Direction, EdgeContainer, EdgeList, NodeModel, NodeSchema,
//!     RelationshipDeclaration, RelationshipModel, RelationshipSchema, SchemaError,
//! };
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Movie {
//!     title: String,
//!     released: i64,
//!     #[serde(default)]
//!     reviews: EdgeList<User, MovieReview>,
//! }
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct User {
//!     name: String,
//! }
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct MovieReview {
//!     rating: f64,
//!     summary: String,
//! }
//!
//! impl NodeModel for Movie {
//!     fn type_name() -> &'static str {
//!         "Movie"
//!     }
//!
//!     fn node_schema() -> Result<NodeSchema, SchemaError> {
//!         NodeSchema::builder("Movie")
//!             .unique("title")
//!             .field("released")
//!             .relationship(
//!                 "reviews",
//!                 RelationshipDeclaration::new(
//!                     "REVIEWED",
//!                     Direction::Incoming,
//!                     "User",
//!                     "MovieReview",
//!                 ),
//!             )
//!             .build()
//!     }
//!
//!     fn relationship_mut(&mut self, field: &str) -> Option<&mut dyn EdgeContainer> {
//!         match field {
//!             "reviews" => Some(&mut self.reviews),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! impl NodeModel for User {
//!     fn type_name() -> &'static str {
//!         "User"
//!     }
//!
//!     fn node_schema() -> Result<NodeSchema, SchemaError> {
//!         NodeSchema::builder("User").labels(["Person"]).unique("name").build()
//!     }
//! }
//!
//! impl RelationshipModel for MovieReview {
//!     fn type_name() -> &'static str {
//!         "MovieReview"
//!     }
//!
//!     fn relationship_schema() -> Result<RelationshipSchema, SchemaError> {
//!         RelationshipSchema::builder("MovieReview")
//!             .rel_type("REVIEWED")
//!             .field("rating")
//!             .field("summary")
//!             .build()
//!     }
//! }
//!
//! let movie = Movie {
//!     title: "Cloud Atlas".to_string(),
//!     released: 2012,
//!     reviews: EdgeList::new(),
//! };
//!
//! let schema = Movie::node_schema().unwrap();
//! let properties = graphbind::convert::model_to_properties(&movie, &schema).unwrap();
//! let statement = graphbind::query::create_node_statement(&schema, properties);
//! assert_eq!(statement.query, "CREATE (n:Movie $props) RETURN n");
//! ```
//!
//! With a session in hand, the async operations in [`ops`] (re-exported
//! at the crate root) perform the actual reads and writes:
//! [`create_node`], [`create_relationship`], and
//! [`refresh_relationship`], which replaces a relationship field's
//! edges in place.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod convert;
pub mod cypher;
pub mod error;
pub mod model;
pub mod ops;
pub mod query;
pub mod schema;
pub mod session;
pub mod value;

// Re-export main types at crate root for convenience
pub use cypher::{CypherStatement, StatementType};
pub use error::{GraphError, Result, SchemaError, SerializationError};
pub use model::{Edge, EdgeContainer, EdgeList, NodeModel, RelationshipModel};
pub use ops::{
    create_node, create_relationship, create_relationship_typed, ensure_constraints,
    refresh_relationship, retrieve_relationship_edges,
};
pub use schema::{
    Direction, NodeSchema, NodeSchemaBuilder, RelationshipDeclaration, RelationshipSchema,
    RelationshipSchemaBuilder,
};
pub use session::{
    GraphNode, GraphRelationship, GraphSession, Record, RecordValue, SessionError,
};
pub use value::{PropertyMap, Value};
