pub mod lighting;
pub mod shadowcast;

pub use lighting::{illuminate, Falloff, LightField, LightSource, LitTile};
pub use shadowcast::field_of_view;
