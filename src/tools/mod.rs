//! Tool abstractions and the built-in lookup tools

pub mod arxiv;
pub mod function_factory;
pub mod lookup;
pub mod tool;
pub mod web_search;
pub mod wikipedia;

pub use arxiv::ArxivTool;
pub use function_factory::FunctionFactory;
pub use lookup::{LookupConfig, LookupParams};
pub use tool::{Tool, ToolFuture, ToolRegistry};
pub use web_search::WebSearchTool;
pub use wikipedia::WikipediaTool;
