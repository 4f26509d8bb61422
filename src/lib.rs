// Growth Points - Core Library
// Turns a caregiver's spoken or typed sentence into a point adjustment for a child.
// Exposes all modules for use in CLI, API server, and tests

pub mod text;
pub mod config;
pub mod entities;
pub mod resolver;   // Stage 1: who
pub mod action;     // Stage 2: how many points
pub mod reason;     // Stage 3: why
pub mod parser;
pub mod response;

// Re-export commonly used types
pub use config::ParserConfig;
pub use entities::{Child, ChildRegistry};
pub use resolver::{EntityMatch, EntityResolver, MatchStrategy};
pub use action::{extract_action, ActionKind, ActionMatch};
pub use reason::{synthesize_reason, ConsumedSpans};
pub use parser::{
    parse_command, CommandParser, FailureKind, ParseFailure, PointCommand,
};
pub use response::ParseResponse;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
