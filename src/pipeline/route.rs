//! Size-based routing: pick the pathway for an artifact before anything
//! touches the network.
//!
//! Routing is a pure function of `(family, byte length)`. An artifact above
//! the hard ceiling is rejected here and no request is ever built for it.
//! Both thresholds are strict: a file of exactly 5 MiB stays on the standard
//! pathway and a file of exactly 25 MiB is accepted.

use crate::operation::Operation;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// One mebibyte, the unit all thresholds are expressed in.
pub const MIB: u64 = 1_048_576;

/// No artifact of any family may exceed this.
pub const HARD_CEILING_BYTES: u64 = 25 * MIB;

/// Text extraction above this size goes to the large-document pathway.
pub const LARGE_DOCUMENT_THRESHOLD_BYTES: u64 = 5 * MIB;

/// User-visible rejection for oversized artifacts.
pub const OVERSIZE_MESSAGE: &str = "Arquivo muito grande! Máximo 25MB";

/// Operation families that take artifacts and are therefore routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArtifactFamily {
    /// Size-tiered: standard or large-document endpoint.
    ExtractText,
    Merge,
    /// Split intent is the user's choice, never inferred from size.
    Split(SplitIntent),
    Watermark,
    Compress,
    DeckExtractText,
    DeckAddSlide,
}

/// Which split the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SplitIntent {
    /// Explicit page list, single PDF back.
    Pages,
    /// Fixed-size page chunks, zip archive back.
    Chunked,
}

/// The outcome of a successful routing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathwaySelection {
    pub operation: Operation,
    pub ceiling_bytes: u64,
    pub rejection_message: &'static str,
}

impl PathwaySelection {
    pub fn endpoint(&self) -> &'static str {
        self.operation.endpoint()
    }
}

/// An artifact that must not be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub family: ArtifactFamily,
    /// The pathway the artifact would have taken.
    pub operation: Operation,
    pub byte_len: u64,
    pub ceiling_bytes: u64,
    pub message: &'static str,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

impl std::error::Error for Rejection {}

/// Select the pathway for one artifact.
pub fn route(family: ArtifactFamily, byte_len: u64) -> Result<PathwaySelection, Rejection> {
    let operation = match family {
        ArtifactFamily::ExtractText if byte_len > LARGE_DOCUMENT_THRESHOLD_BYTES => {
            Operation::ExtractTextLarge
        }
        ArtifactFamily::ExtractText => Operation::ExtractText,
        ArtifactFamily::Merge => Operation::Merge,
        ArtifactFamily::Split(SplitIntent::Pages) => Operation::Split,
        ArtifactFamily::Split(SplitIntent::Chunked) => Operation::SplitLarge,
        ArtifactFamily::Watermark => Operation::Watermark,
        ArtifactFamily::Compress => Operation::Compress,
        ArtifactFamily::DeckExtractText => Operation::DeckExtractText,
        ArtifactFamily::DeckAddSlide => Operation::DeckAddSlide,
    };

    if byte_len > HARD_CEILING_BYTES {
        debug!(
            "Rejecting {:?}: {} bytes exceeds {} byte ceiling",
            family, byte_len, HARD_CEILING_BYTES
        );
        return Err(Rejection {
            family,
            operation,
            byte_len,
            ceiling_bytes: HARD_CEILING_BYTES,
            message: OVERSIZE_MESSAGE,
        });
    }

    debug!("Routed {:?} ({} bytes) to {}", family, byte_len, operation.endpoint());
    Ok(PathwaySelection {
        operation,
        ceiling_bytes: HARD_CEILING_BYTES,
        rejection_message: OVERSIZE_MESSAGE,
    })
}

/// Route a batch of artifacts that travel in one request (merge).
///
/// Every member is checked against the ceiling; the pathway is chosen from
/// the largest member so a tiered family would pick the tier the biggest
/// file needs.
pub fn route_all(
    family: ArtifactFamily,
    byte_lens: impl IntoIterator<Item = u64>,
) -> Result<PathwaySelection, Rejection> {
    let mut largest = 0u64;
    for len in byte_lens {
        if len > HARD_CEILING_BYTES {
            return route(family, len);
        }
        largest = largest.max(len);
    }
    route(family, largest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_FAMILIES: [ArtifactFamily; 8] = [
        ArtifactFamily::ExtractText,
        ArtifactFamily::Merge,
        ArtifactFamily::Split(SplitIntent::Pages),
        ArtifactFamily::Split(SplitIntent::Chunked),
        ArtifactFamily::Watermark,
        ArtifactFamily::Compress,
        ArtifactFamily::DeckExtractText,
        ArtifactFamily::DeckAddSlide,
    ];

    #[test]
    fn over_ceiling_rejected_for_every_family() {
        for family in ALL_FAMILIES {
            let err = route(family, HARD_CEILING_BYTES + 1).unwrap_err();
            assert_eq!(err.message, "Arquivo muito grande! Máximo 25MB");
            assert_eq!(err.family, family);
        }
    }

    #[test]
    fn rejection_names_the_pathway() {
        let err = route(ArtifactFamily::ExtractText, 30 * MIB).unwrap_err();
        assert_eq!(err.operation, Operation::ExtractTextLarge);
        let err = route(ArtifactFamily::Split(SplitIntent::Chunked), 30 * MIB).unwrap_err();
        assert_eq!(err.operation, Operation::SplitLarge);
        let err = route_all(ArtifactFamily::Merge, [MIB, 26 * MIB]).unwrap_err();
        assert_eq!(err.operation, Operation::Merge);
    }

    #[test]
    fn exactly_at_ceiling_is_allowed() {
        for family in ALL_FAMILIES {
            assert!(route(family, HARD_CEILING_BYTES).is_ok(), "{family:?}");
        }
    }

    #[test]
    fn extract_text_tiers() {
        let std_op = |len| route(ArtifactFamily::ExtractText, len).unwrap().operation;
        assert_eq!(std_op(0), Operation::ExtractText);
        assert_eq!(std_op(LARGE_DOCUMENT_THRESHOLD_BYTES), Operation::ExtractText);
        assert_eq!(
            std_op(LARGE_DOCUMENT_THRESHOLD_BYTES + 1),
            Operation::ExtractTextLarge
        );
        assert_eq!(std_op(7 * MIB), Operation::ExtractTextLarge);
        assert_eq!(std_op(HARD_CEILING_BYTES), Operation::ExtractTextLarge);
    }

    #[test]
    fn split_intent_not_size() {
        let small = route(ArtifactFamily::Split(SplitIntent::Chunked), 10).unwrap();
        assert_eq!(small.operation, Operation::SplitLarge);
        let big = route(ArtifactFamily::Split(SplitIntent::Pages), 20 * MIB).unwrap();
        assert_eq!(big.operation, Operation::Split);
    }

    #[test]
    fn routing_is_deterministic() {
        for len in [0, MIB, 5 * MIB, 5 * MIB + 1, 25 * MIB, 30 * MIB] {
            for family in ALL_FAMILIES {
                assert_eq!(route(family, len), route(family, len));
            }
        }
    }

    #[test]
    fn batch_rejects_any_oversized_member() {
        let err = route_all(ArtifactFamily::Merge, [MIB, 26 * MIB, MIB]).unwrap_err();
        assert_eq!(err.byte_len, 26 * MIB);

        let ok = route_all(ArtifactFamily::Merge, [MIB, 2 * MIB]).unwrap();
        assert_eq!(ok.operation, Operation::Merge);
        assert_eq!(ok.ceiling_bytes, HARD_CEILING_BYTES);
    }
}
