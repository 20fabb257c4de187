pub mod terrain;

pub use terrain::{RepositoryError, TerrainRepository};
