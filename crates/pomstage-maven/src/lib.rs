//! Maven descriptor handling: POM parsing and parent merging, the effective
//! project model consumed by the resolver, `settings.xml` parsing, and the
//! remote repository list handed to artifact fetchers.

pub mod model;
pub mod pom;
pub mod repository;
pub mod settings;
