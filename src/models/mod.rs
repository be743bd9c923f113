pub mod anime;
pub mod session;
pub mod theme;

pub use anime::{CatalogRecord, Genre, ImageSet, Recommendation, WatchlistEntry};
pub use session::SessionRecord;
pub use theme::Theme;
