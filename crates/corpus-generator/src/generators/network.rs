//! IP address and geo point generators.

use rand::Rng;
use std::net::Ipv4Addr;

/// A uniformly random IPv4 address.
pub fn random_ipv4<R: Rng>(rng: &mut R) -> String {
    Ipv4Addr::from(rng.gen::<u32>()).to_string()
}

/// A random `"lat,long"` pair with one fractional digit each.
pub fn random_geo_point<R: Rng>(rng: &mut R) -> String {
    let lat: f64 = rng.gen_range(-90.0..=90.0);
    let lon: f64 = rng.gen_range(-180.0..=180.0);
    format!("{lat:.1},{lon:.1}")
}
