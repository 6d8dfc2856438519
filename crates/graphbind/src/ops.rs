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

//! Public graph operations.
//!
//! Stateless coordination over the schema registry, the query builder,
//! and the converter, given an injected [`GraphSession`]. All I/O is
//! explicit: nothing here fetches implicitly, and every query is logged
//! at debug level before execution.

use crate::convert;
use crate::cypher::statement::CypherStatement;
use crate::error::{GraphError, Result, SchemaError, SerializationError};
use crate::model::{Edge, NodeModel, RelationshipModel};
use crate::query;
use crate::schema::node::{NodeSchema, RelationshipDeclaration};
use crate::schema::registry;
use crate::session::{GraphNode, GraphRelationship, GraphSession, Record, RecordValue};
use crate::value::PropertyMap;

async fn run_logged(
    session: &impl GraphSession,
    statement: &CypherStatement,
) -> Result<Vec<Record>> {
    log::debug!("executing query: {}", statement.query);
    log::debug!(
        "with parameters: {}",
        serde_json::to_string(&statement.parameters).unwrap_or_default()
    );
    Ok(session
        .run(&statement.query, statement.parameters.clone())
        .await?)
}

/// Apply the derived constraint statements for a model type.
///
/// Statements are idempotent on the store side and tracked per type in
/// the registry, so repeated calls (and the implicit call inside
/// [`create_node`]) are cheap after the first.
pub async fn ensure_constraints<M: NodeModel>(session: &impl GraphSession) -> Result<()> {
    if !registry::needs_constraints::<M>() {
        return Ok(());
    }
    let schema = registry::node_schema::<M>()?;
    for statement in query::constraint_statements(&schema) {
        run_logged(session, &CypherStatement::constraint(statement)).await?;
    }
    registry::mark_constrained::<M>();
    Ok(())
}

/// Create one node from a model instance and return the store's handle
/// for it.
///
/// Unique-field constraints for the type are applied first, once per
/// process. Only non-relationship fields are persisted.
pub async fn create_node<M: NodeModel>(
    session: &impl GraphSession,
    model: &M,
) -> Result<GraphNode> {
    let schema = registry::node_schema::<M>()?;
    ensure_constraints::<M>(session).await?;

    let properties = convert::model_to_properties(model, &schema)?;
    let statement = query::create_node_statement(&schema, properties);
    let records = run_logged(session, &statement).await?;

    let mut record = records
        .into_iter()
        .next()
        .ok_or(GraphError::EmptyResult("create_node"))?;
    match record.remove("n") {
        Some(RecordValue::Node(node)) => Ok(node),
        _ => Err(GraphError::EmptyResult("create_node")),
    }
}

/// Create a relationship between two node instances, typed and
/// propertied by a relationship model instance.
///
/// Each endpoint is matched through its declared unique fields (or the
/// full-property fallback, see [`query::match_properties`]); zero
/// matches fail with [`GraphError::NotFound`], and a match that fans
/// out to multiple endpoint pairs is reported as ambiguous rather than
/// silently accepted.
pub async fn create_relationship<F, T, P>(
    session: &impl GraphSession,
    from: &F,
    to: &T,
    properties: &P,
) -> Result<GraphRelationship>
where
    F: NodeModel,
    T: NodeModel,
    P: RelationshipModel,
{
    let rel_schema = registry::relationship_schema::<P>()?;
    let rel_properties = convert::relationship_to_properties(properties)?;
    create_relationship_inner::<F, T>(session, from, to, rel_schema.rel_type(), rel_properties)
        .await
}

/// Create a property-less relationship with an explicit type between
/// two node instances.
pub async fn create_relationship_typed<F, T>(
    session: &impl GraphSession,
    from: &F,
    to: &T,
    rel_type: &str,
) -> Result<GraphRelationship>
where
    F: NodeModel,
    T: NodeModel,
{
    create_relationship_inner::<F, T>(session, from, to, rel_type, PropertyMap::new()).await
}

async fn create_relationship_inner<F: NodeModel, T: NodeModel>(
    session: &impl GraphSession,
    from: &F,
    to: &T,
    rel_type: &str,
    rel_properties: PropertyMap,
) -> Result<GraphRelationship> {
    let from_schema = registry::node_schema::<F>()?;
    let to_schema = registry::node_schema::<T>()?;
    let from_properties = convert::model_to_properties(from, &from_schema)?;
    let to_properties = convert::model_to_properties(to, &to_schema)?;

    let statement = query::create_relationship_statement(
        &from_schema,
        &from_properties,
        &to_schema,
        &to_properties,
        rel_type,
        rel_properties,
    )?;
    let mut records = run_logged(session, &statement).await?;

    match records.len() {
        0 => Err(GraphError::NotFound {
            type_name: format!("{} or {}", from_schema.type_name(), to_schema.type_name()),
        }),
        1 => {
            let mut record = records.remove(0);
            match record.remove("r") {
                Some(RecordValue::Relationship(rel)) => Ok(rel),
                _ => Err(GraphError::EmptyResult("create_relationship")),
            }
        }
        _ => Err(SchemaError::AmbiguousEndpoint {
            type_name: format!("{} or {}", from_schema.type_name(), to_schema.type_name()),
            reason: "endpoint match resolved to multiple node pairs".to_string(),
        }
        .into()),
    }
}

fn relationship_declaration(
    schema: &NodeSchema,
    field: &str,
) -> std::result::Result<RelationshipDeclaration, SchemaError> {
    schema
        .relationship(field)
        .cloned()
        .ok_or_else(|| SchemaError::UnknownRelationship {
            type_name: schema.type_name().to_string(),
            field: field.to_string(),
        })
}

fn edge_records(records: Vec<Record>) -> Result<Vec<(PropertyMap, PropertyMap)>> {
    records
        .into_iter()
        .map(|mut record| {
            let relationship = match record.remove("r") {
                Some(RecordValue::Relationship(rel)) => rel.properties,
                _ => return Err(SerializationError::MissingField("r".to_string()).into()),
            };
            let node = match record.remove("b") {
                Some(RecordValue::Node(node)) => node.properties,
                _ => return Err(SerializationError::MissingField("b".to_string()).into()),
            };
            Ok((node, relationship))
        })
        .collect()
}

/// Traverse a declared relationship field and return its edges, in
/// store-native order.
///
/// The anchor instance is matched through its unique fields. The edge's
/// node and properties types are registered here, on first use, which
/// is also when the declaration's by-name references must resolve.
pub async fn retrieve_relationship_edges<M, N, P>(
    session: &impl GraphSession,
    model: &M,
    field: &str,
) -> Result<Vec<Edge<N, P>>>
where
    M: NodeModel,
    N: NodeModel,
    P: RelationshipModel,
{
    let schema = registry::node_schema::<M>()?;
    let declaration = relationship_declaration(&schema, field)?;

    registry::node_schema::<N>()?;
    registry::relationship_schema::<P>()?;
    registry::resolve_declaration(&declaration)?;

    let anchor = convert::model_to_properties(model, &schema)?;
    let statement = query::traverse_statement(&schema, &anchor, &declaration)?;
    let records = run_logged(session, &statement).await?;

    edge_records(records)?
        .into_iter()
        .map(|(node, properties)| {
            Ok(Edge {
                node: convert::record_to_model::<N>(&node)?,
                properties: convert::record_to_model::<P>(&properties)?,
            })
        })
        .collect()
}

/// Traverse a declared relationship field and replace the instance's
/// field value with the fresh edges.
///
/// Only the named field is mutated; every other field of the instance
/// is left untouched. This is the sole way a relationship field moves
/// from not-loaded to loaded, keeping all I/O visible at call sites.
pub async fn refresh_relationship<M: NodeModel>(
    session: &impl GraphSession,
    model: &mut M,
    field: &str,
) -> Result<()> {
    let schema = registry::node_schema::<M>()?;
    let declaration = relationship_declaration(&schema, field)?;

    let anchor = convert::model_to_properties(model, &schema)?;
    let statement = query::traverse_statement(&schema, &anchor, &declaration)?;
    let records = run_logged(session, &statement).await?;
    let pairs = edge_records(records)?;

    let container =
        model
            .relationship_mut(field)
            .ok_or_else(|| SchemaError::UnknownRelationship {
                type_name: M::type_name().to_string(),
                field: field.to_string(),
            })?;
    container.ensure_schemas()?;
    registry::resolve_declaration(&declaration)?;
    container.replace_from_records(pairs)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Direction;

    #[test]
    fn test_relationship_declaration_lookup() {
        let schema = NodeSchema::builder("Post")
            .unique("slug")
            .relationship(
                "comments",
                RelationshipDeclaration::new(
                    "COMMENTED",
                    Direction::Incoming,
                    "Commenter",
                    "Comment",
                ),
            )
            .build()
            .unwrap();

        let declaration = relationship_declaration(&schema, "comments").unwrap();
        assert_eq!(declaration.rel_type(), "COMMENTED");

        let err = relationship_declaration(&schema, "tags").unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownRelationship {
                type_name: "Post".to_string(),
                field: "tags".to_string(),
            }
        );
    }
}
