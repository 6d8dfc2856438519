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

//! Parameterized query generation for the four fixed operation shapes:
//! node create, relationship create, constraint create, and relationship
//! traversal.
//!
//! Labels and relationship types are interpolated statically (dynamic
//! labels are poorly optimized by Cypher planners); every runtime value
//! travels as a parameter.

use std::collections::BTreeSet;

use crate::cypher::escape::{escape_identifier, to_identifier};
use crate::cypher::statement::CypherStatement;
use crate::error::SchemaError;
use crate::schema::node::{NodeSchema, RelationshipDeclaration};
use crate::schema::Direction;
use crate::value::{PropertyMap, Value};

fn label_pattern(schema: &NodeSchema) -> String {
    schema
        .labels()
        .iter()
        .map(|label| format!(":{}", escape_identifier(label)))
        .collect()
}

// The parameter dereference goes through the same escaping as the
// predicate key; a backticked path (`$p.`odd name``) addresses the raw
// key in the parameter map.
fn match_clause(parameter: &str, properties: &PropertyMap) -> String {
    let pairs: Vec<String> = properties
        .keys()
        .map(|field| {
            let escaped = escape_identifier(field);
            format!("{}: ${}.{}", escaped, parameter, escaped)
        })
        .collect();
    format!("{{{}}}", pairs.join(", "))
}

/// Select the property values that identify one node of this schema.
///
/// Unique fields are used when declared; a schema without unique fields
/// falls back to its full non-null scalar-property set. An empty match
/// predicate cannot identify an endpoint and fails with
/// [`SchemaError::AmbiguousEndpoint`] instead of silently matching an
/// arbitrary node.
pub fn match_properties(
    schema: &NodeSchema,
    properties: &PropertyMap,
) -> Result<PropertyMap, SchemaError> {
    if !schema.unique_fields().is_empty() {
        let mut matched = PropertyMap::new();
        for field in schema.unique_fields() {
            match properties.get(field) {
                Some(value) if !value.is_null() => {
                    matched.insert(field.clone(), value.clone());
                }
                _ => {
                    return Err(SchemaError::AmbiguousEndpoint {
                        type_name: schema.type_name().to_string(),
                        reason: format!("unique field '{}' has no value", field),
                    });
                }
            }
        }
        return Ok(matched);
    }

    let matched: PropertyMap = properties
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect();
    if matched.is_empty() {
        return Err(SchemaError::AmbiguousEndpoint {
            type_name: schema.type_name().to_string(),
            reason: "no unique fields declared and no non-null properties to match on".to_string(),
        });
    }
    Ok(matched)
}

/// Derive the idempotent constraint statements for a node schema: one
/// per (label, unique field) pair.
///
/// The result is a set; derivation order carries no meaning and
/// re-deriving from the same schema yields an identical set.
pub fn constraint_statements(schema: &NodeSchema) -> BTreeSet<String> {
    let mut statements = BTreeSet::new();
    for label in schema.labels() {
        for field in schema.unique_fields() {
            let name = to_identifier(&format!("{}_{}_unique", label, field));
            statements.insert(format!(
                "CREATE CONSTRAINT {} IF NOT EXISTS FOR (n:{}) REQUIRE n.{} IS UNIQUE",
                name,
                escape_identifier(label),
                escape_identifier(field)
            ));
        }
    }
    statements
}

/// Build the node creation statement: create one node carrying all
/// declared labels and the flattened scalar properties, returning it.
pub fn create_node_statement(schema: &NodeSchema, properties: PropertyMap) -> CypherStatement {
    CypherStatement::create_node(format!(
        "CREATE (n{} $props) RETURN n",
        label_pattern(schema)
    ))
    .with_param("props", Value::Map(properties))
}

/// Build the relationship creation statement: match both endpoints by
/// their identifying properties, then create the typed edge between
/// them.
pub fn create_relationship_statement(
    from_schema: &NodeSchema,
    from_properties: &PropertyMap,
    to_schema: &NodeSchema,
    to_properties: &PropertyMap,
    rel_type: &str,
    rel_properties: PropertyMap,
) -> Result<CypherStatement, SchemaError> {
    let from_match = match_properties(from_schema, from_properties)?;
    let to_match = match_properties(to_schema, to_properties)?;

    let query = format!(
        "MATCH (a{} {}) WITH a MATCH (b{} {}) CREATE (a)-[r:{} $rel_props]->(b) RETURN r",
        label_pattern(from_schema),
        match_clause("from_props", &from_match),
        label_pattern(to_schema),
        match_clause("to_props", &to_match),
        escape_identifier(rel_type),
    );

    Ok(CypherStatement::create_relationship(query)
        .with_param("from_props", Value::Map(from_match))
        .with_param("to_props", Value::Map(to_match))
        .with_param("rel_props", Value::Map(rel_properties)))
}

/// Build the traversal statement for a relationship declaration anchored
/// at one node.
///
/// `Outgoing` places the anchor at the pattern's source (the arrow
/// leaves it); `Incoming` places it at the target. The rel_type match is
/// exact and case-sensitive, and result order is whatever the store
/// yields.
pub fn traverse_statement(
    schema: &NodeSchema,
    anchor_properties: &PropertyMap,
    declaration: &RelationshipDeclaration,
) -> Result<CypherStatement, SchemaError> {
    let anchor = match_properties(schema, anchor_properties)?;
    let labels = label_pattern(schema);
    let clause = match_clause("anchor", &anchor);
    let rel_type = escape_identifier(declaration.rel_type());

    let query = match declaration.direction() {
        Direction::Outgoing => {
            format!("MATCH (a{} {})-[r:{}]->(b) RETURN r, b", labels, clause, rel_type)
        }
        Direction::Incoming => {
            format!("MATCH (b)-[r:{}]->(a{} {}) RETURN r, b", rel_type, labels, clause)
        }
    };

    Ok(CypherStatement::traverse(query).with_param("anchor", Value::Map(anchor)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher::statement::StatementType;

    fn movie_schema() -> NodeSchema {
        NodeSchema::builder("Movie")
            .unique("title")
            .unique("released")
            .field("tagline")
            .build()
            .unwrap()
    }

    fn user_schema() -> NodeSchema {
        NodeSchema::builder("User")
            .labels(["Person"])
            .unique("name")
            .build()
            .unwrap()
    }

    fn movie_properties() -> PropertyMap {
        let mut properties = PropertyMap::new();
        properties.insert("title".to_string(), Value::from("Cloud Atlas"));
        properties.insert("released".to_string(), Value::Int(2012));
        properties.insert("tagline".to_string(), Value::Null);
        properties
    }

    #[test]
    fn test_constraint_statements_per_label_field_pair() {
        let statements = constraint_statements(&movie_schema());

        assert_eq!(statements.len(), 2);
        assert!(statements.contains(
            "CREATE CONSTRAINT Movie_title_unique IF NOT EXISTS \
             FOR (n:Movie) REQUIRE n.title IS UNIQUE"
        ));
        assert!(statements.contains(
            "CREATE CONSTRAINT Movie_released_unique IF NOT EXISTS \
             FOR (n:Movie) REQUIRE n.released IS UNIQUE"
        ));
    }

    #[test]
    fn test_constraint_statements_idempotent() {
        let schema = movie_schema();
        assert_eq!(constraint_statements(&schema), constraint_statements(&schema));
    }

    #[test]
    fn test_create_node_statement() {
        let stmt = create_node_statement(&movie_schema(), movie_properties());

        assert_eq!(stmt.query, "CREATE (n:Movie $props) RETURN n");
        assert_eq!(stmt.statement_type, StatementType::CreateNode);
        let props = stmt.parameters.get("props").and_then(Value::as_map).unwrap();
        assert_eq!(props.get("title"), Some(&Value::from("Cloud Atlas")));
    }

    #[test]
    fn test_create_node_statement_multiple_labels() {
        let schema = NodeSchema::builder("User")
            .labels(["Person", "User"])
            .unique("name")
            .build()
            .unwrap();

        let stmt = create_node_statement(&schema, PropertyMap::new());
        assert_eq!(stmt.query, "CREATE (n:Person:User $props) RETURN n");
    }

    #[test]
    fn test_match_properties_uses_unique_fields() {
        let matched = match_properties(&movie_schema(), &movie_properties()).unwrap();

        assert_eq!(matched.len(), 2);
        assert!(matched.contains_key("title"));
        assert!(matched.contains_key("released"));
        assert!(!matched.contains_key("tagline"));
    }

    #[test]
    fn test_match_properties_requires_unique_values() {
        let mut properties = movie_properties();
        properties.insert("title".to_string(), Value::Null);

        let err = match_properties(&movie_schema(), &properties).unwrap_err();
        assert!(matches!(err, SchemaError::AmbiguousEndpoint { .. }));
    }

    #[test]
    fn test_match_properties_falls_back_to_full_scalar_set() {
        let schema = NodeSchema::builder("Note").field("text").build().unwrap();
        let mut properties = PropertyMap::new();
        properties.insert("text".to_string(), Value::from("hello"));

        let matched = match_properties(&schema, &properties).unwrap();
        assert_eq!(matched.len(), 1);
    }

    #[test]
    fn test_match_properties_rejects_empty_predicate() {
        let schema = NodeSchema::builder("Note").field("text").build().unwrap();
        let mut properties = PropertyMap::new();
        properties.insert("text".to_string(), Value::Null);

        let err = match_properties(&schema, &properties).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::AmbiguousEndpoint { ref type_name, .. } if type_name == "Note"
        ));
    }

    #[test]
    fn test_create_relationship_statement() {
        let mut user_properties = PropertyMap::new();
        user_properties.insert("name".to_string(), Value::from("Ana"));
        let mut rel_properties = PropertyMap::new();
        rel_properties.insert("rating".to_string(), Value::Int(5));

        let stmt = create_relationship_statement(
            &user_schema(),
            &user_properties,
            &movie_schema(),
            &movie_properties(),
            "REVIEWED",
            rel_properties,
        )
        .unwrap();

        assert_eq!(
            stmt.query,
            "MATCH (a:Person {name: $from_props.name}) WITH a \
             MATCH (b:Movie {released: $to_props.released, title: $to_props.title}) \
             CREATE (a)-[r:REVIEWED $rel_props]->(b) RETURN r"
        );
        assert_eq!(stmt.statement_type, StatementType::CreateRelationship);
        assert!(stmt.parameters.contains_key("from_props"));
        assert!(stmt.parameters.contains_key("to_props"));
        assert!(stmt.parameters.contains_key("rel_props"));
    }

    #[test]
    fn test_traverse_statement_directions() {
        let schema = movie_schema();
        let properties = movie_properties();
        let outgoing = RelationshipDeclaration::new(
            "REVIEWED",
            Direction::Outgoing,
            "User",
            "MovieReview",
        );
        let incoming = RelationshipDeclaration::new(
            "REVIEWED",
            Direction::Incoming,
            "User",
            "MovieReview",
        );

        let stmt = traverse_statement(&schema, &properties, &outgoing).unwrap();
        assert_eq!(
            stmt.query,
            "MATCH (a:Movie {released: $anchor.released, title: $anchor.title})\
             -[r:REVIEWED]->(b) RETURN r, b"
        );
        assert_eq!(stmt.statement_type, StatementType::Traverse);

        let stmt = traverse_statement(&schema, &properties, &incoming).unwrap();
        assert_eq!(
            stmt.query,
            "MATCH (b)-[r:REVIEWED]->\
             (a:Movie {released: $anchor.released, title: $anchor.title}) RETURN r, b"
        );
    }

    #[test]
    fn test_labels_and_rel_types_are_escaped() {
        let schema = NodeSchema::builder("Odd Type")
            .labels(["My Label"])
            .unique("id")
            .build()
            .unwrap();
        let mut properties = PropertyMap::new();
        properties.insert("id".to_string(), Value::Int(1));

        let stmt = create_node_statement(&schema, properties);
        assert!(stmt.query.contains("`My Label`"));
    }

    #[test]
    fn test_field_names_are_escaped_in_match_clauses() {
        let schema = NodeSchema::builder("Odd")
            .unique("my field")
            .build()
            .unwrap();
        let mut properties = PropertyMap::new();
        properties.insert("my field".to_string(), Value::from("x"));
        let declaration =
            RelationshipDeclaration::new("REL", Direction::Outgoing, "User", "MovieReview");

        let stmt = traverse_statement(&schema, &properties, &declaration).unwrap();
        assert!(stmt.query.contains("`my field`: $anchor.`my field`"));

        let stmt = create_relationship_statement(
            &schema,
            &properties,
            &user_schema(),
            &{
                let mut props = PropertyMap::new();
                props.insert("name".to_string(), Value::from("Ana"));
                props
            },
            "REL",
            PropertyMap::new(),
        )
        .unwrap();
        assert!(stmt.query.contains("`my field`: $from_props.`my field`"));
    }
}
