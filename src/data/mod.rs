/// Data layer: grid model and the SEG-Y codec.
///
/// Architecture:
/// ```text
///   .sgy / .segy
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  headers + IBM samples → SeismicGrid
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  SeismicGrid  │  flat [trace][sample] f32 buffer
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  donor headers + IEEE → IBM samples → .sgy
///   └──────────┘
/// ```

pub mod header;
pub mod ibm;
pub mod loader;
pub mod model;
pub mod writer;

pub use loader::{open_segy, SegyReader};
pub use model::{BlendGrid, BooleanMask, Bounds, Grid, Point, SeismicGrid, Shape};
pub use writer::{write_segy, SegyTemplate, SegyWriter};
