mod engine;

pub use engine::{PipelineOutcome, SalesPipeline};
