/// Field resolution module.
///
/// Combines structured triples and scraped fallback data into one
/// `MountainRecord` per URI.
mod resolver;

pub use resolver::{
    resolve_name, slug_name, structured_location, Resolver, ABSTRACT, ELEVATION, LATITUDE,
    LONGITUDE, NAME, WIKIPEDIA_LINK,
};
