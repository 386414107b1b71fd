mod cache;
mod catalog;
mod config;
mod error;
mod geometry;
mod matcher;
mod motif;
mod params;
mod rules;
mod trace;

pub use cache::{STACK_SITES, StackParameters, StackSite};
pub use catalog::register_pam5_patterns;
pub use config::{Minimizer, PatternConfig};
pub use error::Error;
pub use geometry::is_expected_twist;
pub use matcher::{
    PatternAtom, PatternCatalog, PatternDefinition, PatternMatch, PatternRegistry, Traversal,
};
pub use motif::Motif;
pub use params::{
    AtomTypeParams, ParameterStore, StretchParams, get_default_parameters, load_parameters,
};
pub use rules::Pam5Rules;
pub use trace::{AtomRef, MemorySink, TraceRecord, TraceSink, TracingSink};
