//! XML Import/Export für Feature-Layer.
//!
//! Format: `<layer name=".."><feature id=".." locked=".."><ring closed="..">`
//! mit einem `<v x=".." y=".." [z=".."] [kind="curve"]/>` pro Vertex.
//! Feature-IDs müssen eindeutig sein, Koordinaten endlich.

pub mod parser;
pub mod writer;

pub use parser::parse_layer;
pub use writer::write_layer;
