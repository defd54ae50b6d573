//! Terminal prompt for choosing between nearby saved places.

use async_trait::async_trait;
use geonote_compose::{PlaceChoice, PlacePicker};
use geonote_location::PlaceMatch;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Lists the candidates on stderr and reads the answer from stdin.
///
/// Anything other than a listed number, including EOF, picks the detected
/// location.
pub struct TerminalPicker;

#[async_trait]
impl PlacePicker for TerminalPicker {
    async fn choose(&self, candidates: &[PlaceMatch]) -> PlaceChoice {
        eprintln!("Saved places nearby:");
        for (i, candidate) in candidates.iter().enumerate() {
            eprintln!(
                "  {}) {} ({:.0} m away)",
                i + 1,
                candidate.place.name,
                candidate.distance_meters
            );
        }
        eprint!("Choose a place, or press Enter to use the detected location: ");

        let mut line = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        if let Err(e) = stdin.read_line(&mut line).await {
            tracing::debug!("Place prompt read failed: {}", e);
            return PlaceChoice::DetectedLocation;
        }

        match parse_choice(&line, candidates.len()) {
            Some(index) => PlaceChoice::Place(candidates[index].place.clone()),
            None => PlaceChoice::DetectedLocation,
        }
    }
}

/// 1-based answer to a 0-based index
fn parse_choice(input: &str, count: usize) -> Option<usize> {
    let number: usize = input.trim().parse().ok()?;
    (1..=count).contains(&number).then(|| number - 1)
}
