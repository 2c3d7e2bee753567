//! Board geometry, the tile catalog and the feature graph.

pub mod feature;
pub mod graph;
pub mod position;
pub mod tile;

pub use feature::{Feature, FeatureId, FeatureKind, FeaturePlace};
pub use graph::{Board, PlacementError};
pub use position::{HalfEdge, Position, Quadrant, Rotation, Side};
pub use tile::{Goods, PlacedTile, Rose, SegmentDef, Terrain, TileDef, TileKind, TileSet};
