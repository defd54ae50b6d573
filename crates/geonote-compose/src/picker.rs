//! The choice between a matched saved place and the detected location.

use async_trait::async_trait;
use geonote_core::SavedPlace;
use geonote_location::PlaceMatch;

#[derive(Debug, Clone, PartialEq)]
pub enum PlaceChoice {
    Place(SavedPlace),
    /// Ignore saved places and use the fix as-is. Also the answer to a
    /// cancelled prompt.
    DetectedLocation,
}

/// Asks which matched place, if any, to use.
///
/// Only consulted when at least one place matched. Candidates are nearest
/// first.
#[async_trait]
pub trait PlacePicker: Send + Sync {
    async fn choose(&self, candidates: &[PlaceMatch]) -> PlaceChoice;
}

/// Never uses a saved place.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectedLocationPicker;

#[async_trait]
impl PlacePicker for DetectedLocationPicker {
    async fn choose(&self, _candidates: &[PlaceMatch]) -> PlaceChoice {
        PlaceChoice::DetectedLocation
    }
}

/// Takes the nearest match without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestPlacePicker;

#[async_trait]
impl PlacePicker for NearestPlacePicker {
    async fn choose(&self, candidates: &[PlaceMatch]) -> PlaceChoice {
        candidates
            .first()
            .map(|m| PlaceChoice::Place(m.place.clone()))
            .unwrap_or(PlaceChoice::DetectedLocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<PlaceMatch> {
        vec![
            PlaceMatch {
                place: SavedPlace::at("Near", 0.0, 0.0),
                distance_meters: 10.0,
            },
            PlaceMatch {
                place: SavedPlace::at("Far", 0.0, 0.0),
                distance_meters: 150.0,
            },
        ]
    }

    #[tokio::test]
    async fn test_nearest_picker() {
        let candidates = candidates();
        assert_eq!(
            NearestPlacePicker.choose(&candidates).await,
            PlaceChoice::Place(candidates[0].place.clone())
        );
        assert_eq!(NearestPlacePicker.choose(&[]).await, PlaceChoice::DetectedLocation);
    }

    #[tokio::test]
    async fn test_detected_picker() {
        assert_eq!(
            DetectedLocationPicker.choose(&candidates()).await,
            PlaceChoice::DetectedLocation
        );
    }
}
