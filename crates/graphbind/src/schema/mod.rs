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

//! Schema derivation from declarative model definitions.
//!
//! Schemas are built once per model type through the builders in this
//! module, cached process-wide by [`registry`], and treated as immutable
//! thereafter.

pub mod node;
pub mod registry;
pub mod relationship;

pub use node::{NodeSchema, NodeSchemaBuilder, RelationshipDeclaration};
pub use relationship::{RelationshipSchema, RelationshipSchemaBuilder};

use serde::{Deserialize, Serialize};

/// The direction of a declared relationship, relative to the declaring
/// model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// The declaring model is the edge's source; the arrow leaves it.
    Outgoing,
    /// The declaring model is the edge's target; the arrow enters it.
    Incoming,
}
