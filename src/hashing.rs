//! Hashing - SHA-256 digests of rendered files and render runs
//!
//! A run digest covers what landed on disk, not where the source came from,
//! so two runs over the same artwork compare equal.

use sha2::{Digest, Sha256};

use crate::pipeline::RegionOutcome;

/// SHA-256 of a rendered file, lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Digest over the artwork name and one `sha256sum`-style line per region,
/// in render order. Failed regions hash as `failed` so a run that lost a
/// size never matches a complete one.
pub fn compute_report_hash(artwork: Option<&str>, regions: &[RegionOutcome]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(artwork.unwrap_or_default().as_bytes());
    hasher.update(b"\n");
    for outcome in regions {
        let digest = match outcome {
            RegionOutcome::Rendered { sha256, .. } => sha256.as_str(),
            RegionOutcome::Failed { .. } => "failed",
        };
        hasher.update(format!("{}  {}\n", digest, outcome.target().output_path).as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::IconRegion;
    use crate::targets::RenderTarget;

    fn target(size: f64) -> RenderTarget {
        RenderTarget::for_region(&IconRegion { x: 0.0, y: 0.0, width: size, height: size }, "gear")
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_report_hash_tracks_file_contents() {
        let rendered = |sha: &str| RegionOutcome::Rendered {
            target: target(16.0),
            sha256: sha.to_string(),
        };
        let a = compute_report_hash(Some("gear"), &[rendered("aa")]);
        assert_eq!(a, compute_report_hash(Some("gear"), &[rendered("aa")]));
        assert_ne!(a, compute_report_hash(Some("gear"), &[rendered("bb")]));
    }

    #[test]
    fn test_failed_region_changes_report_hash() {
        let ok = RegionOutcome::Rendered { target: target(16.0), sha256: "aa".to_string() };
        let failed = RegionOutcome::Failed { target: target(16.0), error: "boom".to_string() };
        assert_ne!(
            compute_report_hash(Some("gear"), &[ok]),
            compute_report_hash(Some("gear"), &[failed])
        );
    }

    #[test]
    fn test_no_artwork_hash_is_stable() {
        assert_eq!(compute_report_hash(None, &[]), compute_report_hash(None, &[]));
        assert_eq!(compute_report_hash(None, &[]).len(), 64);
    }
}
