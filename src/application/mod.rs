//! Application layer - Use cases and orchestration

pub mod build_site;
pub mod init;
pub mod render_page;

pub use build_site::{BuildReport, BuildSiteService};
pub use init::init;
pub use render_page::{RenderPageService, RenderedPage};
