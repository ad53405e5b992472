//! Bidirectional mapping between a raw-JSON editor cursor and structural
//! schema coordinates, built on an incremental scanner rather than a full
//! parse so it keeps working while the user is mid-edit with invalid JSON.

pub mod resolver;
pub mod scanner;

pub use resolver::{CursorInfo, CursorKind, locate_line, resolve_cursor};
pub use scanner::{Frame, FrameKind, JsonScanner, ScanEvent};
