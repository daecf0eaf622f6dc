//! Fuzzy similarity scoring between a source track and a catalog candidate.
//!
//! Each comparable text attribute present on both tracks is compared with a
//! partial ratio, and the result is the truncated average. Partial matching
//! keeps catalog suffixes like "- 2011 Remastered Version" or
//! "[Remastered]" from dragging the score down.

use super::domain::{Attribute, CandidateTrack, MigrationError, SourceTrack};

/// Score a candidate against its source track, in 0..=100.
///
/// A candidate sharing no comparable attributes scores 0.
pub fn score(source: &SourceTrack, candidate: &CandidateTrack) -> u8 {
    try_score(source, candidate).unwrap_or(0)
}

/// Like [`score`], but reports the no-shared-attributes case as an error
pub fn try_score(source: &SourceTrack, candidate: &CandidateTrack) -> Result<u8, MigrationError> {
    score_attributes(source, candidate, &Attribute::SCORED)
}

/// Average partial ratio over the given attributes.
///
/// Only attributes present on both tracks count towards the average.
pub fn score_attributes(
    source: &SourceTrack,
    candidate: &CandidateTrack,
    attributes: &[Attribute],
) -> Result<u8, MigrationError> {
    let mut total: u32 = 0;
    let mut compared: u32 = 0;

    for &attribute in attributes {
        let (Some(ours), Some(theirs)) = (source.attribute(attribute), candidate.attribute(attribute))
        else {
            continue;
        };

        total += u32::from(partial_ratio(&ours.to_lowercase(), &theirs.to_lowercase()));
        compared += 1;
    }

    if compared == 0 {
        return Err(MigrationError::ScoringIndeterminate);
    }

    Ok((total / compared) as u8)
}

/// Best similarity between the shorter string and any equal-length window
/// of the longer one, in 0..=100.
///
/// Windows are compared with normalized Levenshtein distance, so a string
/// contained in the other scores 100. Empty input scores 0.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let (short, short_len, long) = if a_len <= b_len {
        (a, a_len, b)
    } else {
        (b, b_len, a)
    };

    if short_len == 0 {
        return 0;
    }

    let long_chars: Vec<char> = long.chars().collect();
    let mut best = 0.0_f64;

    for window in long_chars.windows(short_len) {
        let slice: String = window.iter().collect();
        let similarity = strsim::normalized_levenshtein(short, &slice);
        if similarity > best {
            best = similarity;
            if best >= 1.0 {
                break;
            }
        }
    }

    (best * 100.0).round() as u8
}
