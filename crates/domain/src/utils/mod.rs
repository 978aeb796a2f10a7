//! Pure helpers shared by the entity types

pub mod text;
