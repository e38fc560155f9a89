/// Upstream parsers and HTTP clients.
///
/// `archive`, `cap`, `forecast` and the parsing half of `ign` are pure:
/// bytes or text in, canonical records out. `aemet` and `ign::fetch_feed`
/// do the network I/O.

pub mod aemet;
pub mod archive;
pub mod cap;
pub mod forecast;
pub mod ign;
pub mod xml;
