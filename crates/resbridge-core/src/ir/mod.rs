pub mod naming;
pub mod resource;

pub use resource::{
    Attribute, Cardinality, Relationship, ResourceDefinition, ResourceSchema, SemanticType,
};
