//! Post-processing of converged clusters into a palette

use crate::{distance, Cluster, Config, Hsv};
use std::cmp::Reverse;
use tracing::debug;

/// Drop clusters within `threshold` of pure black or pure white
pub(crate) fn suppress_black_white(clusters: &mut Vec<Cluster>, threshold: f32) {
	clusters.retain(|cluster| {
		let centroid = cluster.centroid();
		distance(centroid, Hsv::WHITE) >= threshold && distance(centroid, Hsv::BLACK) >= threshold
	});
}

/// Greedily drop near-duplicate clusters.
///
/// Clusters are scanned in order, and a cluster is kept
/// only if it is at least `threshold` away from every cluster kept before it.
pub(crate) fn deduplicate(clusters: &mut Vec<Cluster>, threshold: f32) {
	let mut kept: Vec<Cluster> = Vec::with_capacity(clusters.len());
	for &cluster in &*clusters {
		if kept.iter().all(|other| distance(other.centroid(), cluster.centroid()) >= threshold) {
			kept.push(cluster);
		}
	}
	*clusters = kept;
}

/// Sort by descending count. Clusters with equal counts keep their relative order.
pub(crate) fn rank(clusters: &mut [Cluster]) {
	clusters.sort_by_key(|cluster| Reverse(cluster.count()));
}

/// Apply black/white suppression, de-duplication, and ranking in that order
pub(crate) fn apply(mut clusters: Vec<Cluster>, config: &Config) -> Vec<Cluster> {
	let converged = clusters.len();
	suppress_black_white(&mut clusters, config.bw_threshold);
	deduplicate(&mut clusters, config.similarity_threshold);
	rank(&mut clusters);
	debug!(converged, survivors = clusters.len(), "filtered clusters");
	clusters
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cluster;
	use std::f32::consts::PI;

	/// Build clusters by running one round over pixels that sit exactly on their centroids
	fn clusters(centroids: &[(Hsv, u32)]) -> Vec<Cluster> {
		let mut pixels = Vec::new();
		for &(centroid, count) in centroids {
			pixels.extend(std::iter::repeat(centroid).take(count as usize));
		}
		let config = Config::default().with_max_cluster_iterations(1);
		cluster::run(&pixels, centroids.iter().map(|&(c, _)| c).collect(), &config).clusters
	}

	fn labels(clusters: &[Cluster]) -> Vec<u8> {
		clusters.iter().map(Cluster::label).collect()
	}

	#[test]
	fn black_and_white_are_suppressed() {
		let mut clusters = clusters(&[
			(Hsv::BLACK, 1),
			(Hsv::new(0.0, 1.0, 1.0), 1),
			(Hsv::new(1.0, 0.02, 0.97), 1),
			(Hsv::new(4.0, 0.8, 0.06), 1),
			(Hsv::WHITE, 1),
			(Hsv::new(2.0, 0.0, 0.5), 1),
		]);

		suppress_black_white(&mut clusters, Config::default().bw_threshold);

		assert_eq!(labels(&clusters), vec![1, 5]);
	}

	#[test]
	fn deduplication_is_greedy_in_order() {
		// 0 and 1 are close, 1 and 2 are close, but 0 and 2 are not
		let mut clusters = clusters(&[
			(Hsv::new(0.0, 1.0, 1.0), 1),
			(Hsv::new(0.12, 1.0, 1.0), 1),
			(Hsv::new(0.24, 1.0, 1.0), 1),
			(Hsv::new(PI, 1.0, 1.0), 1),
		]);
		let threshold = 0.02;
		assert!(distance(clusters[0].centroid(), clusters[1].centroid()) < threshold);
		assert!(distance(clusters[1].centroid(), clusters[2].centroid()) < threshold);
		assert!(distance(clusters[0].centroid(), clusters[2].centroid()) >= threshold);

		deduplicate(&mut clusters, threshold);

		assert_eq!(labels(&clusters), vec![0, 2, 3]);
	}

	#[test]
	fn survivors_are_pairwise_dissimilar() {
		let mut clusters = clusters(
			&(0..24)
				.map(|i| {
					#[allow(clippy::cast_precision_loss)]
					let i = i as f32;
					(Hsv::new(i * 0.3, 0.5 + (i * 0.7).sin() / 2.0, 0.6), 1)
				})
				.collect::<Vec<_>>(),
		);

		deduplicate(&mut clusters, 0.05);

		for x in &clusters {
			for y in &clusters {
				if x.label() != y.label() {
					assert!(distance(x.centroid(), y.centroid()) >= 0.05);
				}
			}
		}
	}

	#[test]
	fn ranking_is_descending_and_stable() {
		let mut clusters = clusters(&[
			(Hsv::new(0.0, 1.0, 1.0), 2),
			(Hsv::new(2.0, 1.0, 1.0), 5),
			(Hsv::new(4.0, 1.0, 1.0), 2),
			(Hsv::new(1.0, 1.0, 0.5), 7),
		]);

		rank(&mut clusters);

		assert_eq!(labels(&clusters), vec![3, 1, 0, 2]);
	}

	#[test]
	fn apply_runs_every_pass() {
		let clusters = clusters(&[
			(Hsv::WHITE, 9),
			(Hsv::new(0.0, 1.0, 1.0), 2),
			(Hsv::new(0.01, 1.0, 1.0), 6),
			(Hsv::new(3.0, 1.0, 1.0), 4),
		]);

		let survivors = apply(clusters, &Config::default());

		assert_eq!(labels(&survivors), vec![3, 1]);
	}
}
