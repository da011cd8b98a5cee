pub mod analysis;
pub mod fetchers;
pub mod hashtag_page;
pub mod pipeline;
pub mod ranking;
pub mod renderer;
pub mod report;
pub mod social;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
