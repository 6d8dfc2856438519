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

//! Conversion between typed model instances and flat graph records.
//!
//! Writes flatten a model's non-relationship fields into a
//! [`PropertyMap`]; reads rebuild a typed instance from a record's
//! properties, leaving relationship fields at their not-loaded default
//! so hydration cost stays independent of relationship fan-out.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SerializationError;
use crate::model::{NodeModel, RelationshipModel};
use crate::schema::node::NodeSchema;
use crate::value::{PropertyMap, Value};

fn serialize_fields<T: Serialize>(
    value: &T,
) -> Result<serde_json::Map<String, serde_json::Value>, SerializationError> {
    let json =
        serde_json::to_value(value).map_err(|e| SerializationError::Serialize(e.to_string()))?;
    match json {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(SerializationError::NotAMap),
    }
}

fn reject_unrepresentable(field: &str, value: &Value) -> Result<(), SerializationError> {
    if value.is_property_value() {
        return Ok(());
    }
    let reason = match value {
        Value::Map(_) => "nested object-valued fields cannot be persisted".to_string(),
        Value::List(_) => "lists must contain scalars of a single type".to_string(),
        other => format!("unsupported value {:?}", other),
    };
    Err(SerializationError::Unrepresentable {
        field: field.to_string(),
        reason,
    })
}

/// Flatten a node model's non-relationship fields into a property map.
///
/// Relationship fields declared in the schema are dropped; every
/// remaining field must be a scalar or a homogeneous list of scalars.
pub fn model_to_properties<M: NodeModel>(
    model: &M,
    schema: &NodeSchema,
) -> Result<PropertyMap, SerializationError> {
    let mut properties = PropertyMap::new();
    for (name, json) in serialize_fields(model)? {
        if schema.is_relationship_field(&name) {
            continue;
        }
        let value = Value::from_json(json);
        reject_unrepresentable(&name, &value)?;
        properties.insert(name, value);
    }
    Ok(properties)
}

/// Flatten a relationship model's fields into a property map.
pub fn relationship_to_properties<P: RelationshipModel>(
    model: &P,
) -> Result<PropertyMap, SerializationError> {
    let mut properties = PropertyMap::new();
    for (name, json) in serialize_fields(model)? {
        let value = Value::from_json(json);
        reject_unrepresentable(&name, &value)?;
        properties.insert(name, value);
    }
    Ok(properties)
}

/// Rebuild a typed instance from a record's properties.
///
/// Relationship fields are not present in node records and deserialize
/// to their declared not-loaded default. A required scalar field absent
/// from the record fails with [`SerializationError::MissingField`].
pub fn record_to_model<T: DeserializeOwned>(
    properties: &PropertyMap,
) -> Result<T, SerializationError> {
    let json = serde_json::Value::Object(
        properties
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect(),
    );
    serde_json::from_value(json).map_err(|e| {
        let message = e.to_string();
        match message
            .strip_prefix("missing field `")
            .and_then(|rest| rest.split('`').next())
        {
            Some(field) => SerializationError::MissingField(field.to_string()),
            None => SerializationError::Deserialize(message),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::model::EdgeList;
    use crate::schema::node::RelationshipDeclaration;
    use crate::schema::relationship::RelationshipSchema;
    use crate::schema::Direction;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Movie {
        title: String,
        released: i64,
        tagline: Option<String>,
        genres: Vec<String>,
        #[serde(default)]
        reviews: EdgeList<Reviewer, Review>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Reviewer {
        name: String,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Review {
        rating: f64,
    }

    impl NodeModel for Movie {
        fn type_name() -> &'static str {
            "ConvertMovie"
        }

        fn node_schema() -> Result<NodeSchema, SchemaError> {
            NodeSchema::builder("ConvertMovie")
                .unique("title")
                .field("released")
                .field("tagline")
                .field("genres")
                .relationship(
                    "reviews",
                    RelationshipDeclaration::new(
                        "REVIEWED",
                        Direction::Incoming,
                        "ConvertReviewer",
                        "ConvertReview",
                    ),
                )
                .build()
        }
    }

    impl NodeModel for Reviewer {
        fn type_name() -> &'static str {
            "ConvertReviewer"
        }

        fn node_schema() -> Result<NodeSchema, SchemaError> {
            NodeSchema::builder("ConvertReviewer").unique("name").build()
        }
    }

    impl RelationshipModel for Review {
        fn relationship_schema() -> Result<RelationshipSchema, SchemaError> {
            RelationshipSchema::builder("ConvertReview")
                .rel_type("REVIEWED")
                .field("rating")
                .build()
        }

        fn type_name() -> &'static str {
            "ConvertReview"
        }
    }

    fn movie() -> Movie {
        Movie {
            title: "Cloud Atlas".to_string(),
            released: 2012,
            tagline: Some("Everything is connected".to_string()),
            genres: vec!["drama".to_string(), "sci-fi".to_string()],
            reviews: EdgeList::new(),
        }
    }

    #[test]
    fn test_relationship_fields_are_dropped() {
        let schema = Movie::node_schema().unwrap();
        let properties = model_to_properties(&movie(), &schema).unwrap();

        assert!(!properties.contains_key("reviews"));
        assert_eq!(properties.get("title"), Some(&Value::from("Cloud Atlas")));
        assert_eq!(properties.get("released"), Some(&Value::Int(2012)));
        assert_eq!(
            properties.get("genres"),
            Some(&Value::from(vec!["drama", "sci-fi"]))
        );
    }

    #[test]
    fn test_round_trip_preserves_scalar_fields() {
        let schema = Movie::node_schema().unwrap();
        let original = movie();

        let properties = model_to_properties(&original, &schema).unwrap();
        let restored: Movie = record_to_model(&properties).unwrap();

        assert_eq!(restored, original);
    }

    #[test]
    fn test_missing_required_field() {
        let schema = Movie::node_schema().unwrap();
        let mut properties = model_to_properties(&movie(), &schema).unwrap();
        properties.remove("title");

        let err = record_to_model::<Movie>(&properties).unwrap_err();
        assert_eq!(err, SerializationError::MissingField("title".to_string()));
    }

    #[test]
    fn test_absent_optional_field_is_none() {
        let schema = Movie::node_schema().unwrap();
        let mut properties = model_to_properties(&movie(), &schema).unwrap();
        properties.remove("tagline");

        let restored: Movie = record_to_model(&properties).unwrap();
        assert_eq!(restored.tagline, None);
    }

    #[test]
    fn test_nested_object_rejected() {
        #[derive(Debug, Serialize, Deserialize)]
        struct Nested {
            name: String,
            address: std::collections::BTreeMap<String, String>,
        }

        impl NodeModel for Nested {
            fn type_name() -> &'static str {
                "ConvertNested"
            }

            fn node_schema() -> Result<NodeSchema, SchemaError> {
                NodeSchema::builder("ConvertNested")
                    .unique("name")
                    .field("address")
                    .build()
            }
        }

        let mut address = std::collections::BTreeMap::new();
        address.insert("city".to_string(), "Utrecht".to_string());
        let model = Nested {
            name: "n".to_string(),
            address,
        };
        let schema = Nested::node_schema().unwrap();

        let err = model_to_properties(&model, &schema).unwrap_err();
        assert!(matches!(
            err,
            SerializationError::Unrepresentable { ref field, .. } if field == "address"
        ));
    }

    #[test]
    fn test_mixed_list_rejected() {
        #[derive(Debug, Serialize, Deserialize)]
        struct Mixed {
            values: Vec<serde_json::Value>,
        }

        impl NodeModel for Mixed {
            fn type_name() -> &'static str {
                "ConvertMixed"
            }

            fn node_schema() -> Result<NodeSchema, SchemaError> {
                NodeSchema::builder("ConvertMixed").field("values").build()
            }
        }

        let model = Mixed {
            values: vec![serde_json::json!("a"), serde_json::json!(1)],
        };
        let schema = Mixed::node_schema().unwrap();

        let err = model_to_properties(&model, &schema).unwrap_err();
        assert!(matches!(err, SerializationError::Unrepresentable { .. }));
    }

    #[test]
    fn test_relationship_to_properties() {
        let review = Review { rating: 5.0 };
        let properties = relationship_to_properties(&review).unwrap();
        assert_eq!(properties.get("rating"), Some(&Value::Float(5.0)));
    }

    #[test]
    fn test_non_map_model_rejected() {
        let err = serialize_fields(&42i64).unwrap_err();
        assert_eq!(err, SerializationError::NotAMap);
    }
}
