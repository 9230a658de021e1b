pub mod defaults;
pub mod plan;
pub mod staging;
pub mod tags;

pub use plan::{render, BuildPlan};
pub use staging::{stage_build_plan, StagedBuild};
pub use tags::{base_latest_tag, image_labels, image_tag, latest_tag};
