//! Location tokens: region aliases, code lists and coordinates.

use atlas_types::LatLong;

use crate::error::{AtlasError, Result};
use crate::geography::{CoordinateTable, Geography};

/// Named regions that stand for several codes. "world" is handled separately
/// because it depends on the loaded geography.
const REGION_ALIASES: &[(&str, &[&str])] = &[
    ("prussia", &["DEU", "POL"]),
    ("scandinavia", &["FIN", "DNK", "SWE", "NOR"]),
    (
        "south america",
        &[
            "ARG", "BOL", "BRA", "CHL", "COL", "ECU", "GUY", "PRY", "PER", "SUR", "URY", "VEN",
        ],
    ),
    (
        "central america",
        &["BLZ", "CRI", "SLV", "GTM", "HND", "NIC", "PAN"],
    ),
];

const WORLD: &str = "world";

/// Split a `;`-delimited list, trimming pieces and dropping empty ones.
pub fn split_up_locations(locations: &str) -> Vec<String> {
    locations
        .split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Expands location tokens into geography codes.
pub struct LocationResolver<'a> {
    geography: &'a Geography,
}

impl<'a> LocationResolver<'a> {
    pub fn new(geography: &'a Geography) -> Self {
        Self { geography }
    }

    /// Expand each token in order. Aliases become their code lists; any
    /// other token is upper-cased and passed through for validation to judge.
    /// Duplicates are kept.
    pub fn expand<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
        let mut codes = Vec::new();
        for token in tokens {
            let token = token.as_ref().to_lowercase();
            if token == WORLD {
                codes.extend(self.geography.codes().iter().cloned());
            } else if let Some((_, members)) =
                REGION_ALIASES.iter().find(|(name, _)| *name == token)
            {
                codes.extend(members.iter().map(|c| c.to_string()));
            } else {
                codes.push(token.to_uppercase());
            }
        }
        codes
    }

    /// Rewrite a raw `Location`/`Influences` field into canonical form.
    /// Applying it to its own output returns the same string.
    pub fn normalise(&self, raw: &str) -> String {
        let tokens = split_up_locations(&raw.to_lowercase());
        self.expand(&tokens).join(";")
    }
}

/// Resolve one location token to a point.
///
/// A 3-character token is a code looked up in `coords`; anything else is read
/// as a literal "lat,long" pair.
pub fn ensure_lat_long(token: &str, coords: &CoordinateTable) -> Result<LatLong> {
    let token = token.trim();
    if token.chars().count() == 3 {
        return coords
            .lookup(token)
            .ok_or_else(|| AtlasError::UnknownCode(token.to_string()));
    }

    let mut parts = token.split(',').map(|p| p.trim().parse::<f64>());
    match (parts.next(), parts.next()) {
        (Some(Ok(latitude)), Some(Ok(longitude))) => Ok(LatLong {
            latitude,
            longitude,
        }),
        _ => Err(AtlasError::BadCoordinate(token.to_string())),
    }
}
