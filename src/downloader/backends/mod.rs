// Downloader backends, in the order the resolver tries them

pub mod cobalt;
pub mod direct;
pub mod proxy;
pub mod savefrom;
pub mod ytdlp_web;

pub use cobalt::CobaltBackend;
pub use direct::DirectBackend;
pub use proxy::ProxyScrapeBackend;
pub use savefrom::SaveFromBackend;
pub use ytdlp_web::YtdlpWebBackend;

use crate::downloader::traits::DownloaderBackend;

/// Default backend chain
pub fn default_backends() -> Vec<Box<dyn DownloaderBackend>> {
    vec![
        Box::new(CobaltBackend),
        Box::new(YtdlpWebBackend),
        Box::new(SaveFromBackend),
        Box::new(DirectBackend),
        Box::new(ProxyScrapeBackend),
    ]
}
