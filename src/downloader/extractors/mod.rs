// Metadata extractors - everything that turns a URL into a MediaInfo
//
// Chain order (see `orchestrator::default_extractors`):
// platform-api → cobalt → oembed → noembed → proxy-scrape → url-heuristic

mod cobalt;
pub mod fallback;
mod heuristic;
mod oembed;
mod orchestrator;
mod platform_api;
mod proxy;
mod traits;

pub use cobalt::CobaltExtractor;
pub use fallback::{normalize, synthesize, ProviderFields};
pub use heuristic::{fields_from_url, UrlHeuristicExtractor};
pub use oembed::{NoEmbedExtractor, OEmbedExtractor};
pub use orchestrator::{default_extractors, MetadataResolver};
pub use platform_api::PlatformApiExtractor;
pub use proxy::ProxyScrapeExtractor;
pub use traits::{ExtractContext, InfoExtractor};
