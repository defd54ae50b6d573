//! Match a fix against saved places.

use geonote_core::SavedPlace;

use crate::types::Coordinate;

/// A saved place whose radius contains the fix
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceMatch {
    pub place: SavedPlace,
    pub distance_meters: f64,
}

/// Places whose radius contains `coordinate`, nearest first.
///
/// Places with a non-positive or non-finite radius never match.
pub fn match_places(coordinate: &Coordinate, places: &[SavedPlace]) -> Vec<PlaceMatch> {
    let mut matches: Vec<PlaceMatch> = places
        .iter()
        .filter(|place| place.has_valid_radius())
        .filter_map(|place| {
            let distance = coordinate.distance_to(place.latitude, place.longitude);
            (distance <= place.radius).then(|| PlaceMatch {
                place: place.clone(),
                distance_meters: distance,
            })
        })
        .collect();

    matches.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    matches
}
