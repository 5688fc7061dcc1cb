//! Tunable parameters for a single palette run

/// Parameters for one clustering run.
///
/// [`Config::default`] gives the values that work well for album art and similar images.
/// Each field can be overridden per call with the `with_*` methods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
	/// The number of clusters to seed.
	///
	/// Fewer clusters may be produced if the image has fewer distinct colors.
	pub k: u8,
	/// Clustering stops once no centroid moves more than this (in [`distance`](crate::distance) units)
	pub cluster_threshold: f32,
	/// Upper bound on the number of assignment/recentering rounds
	pub max_cluster_iterations: u32,
	/// Images with both sides larger than this are downscaled to `maxedge × maxedge` before clustering
	pub maxedge: u32,
	/// Clusters closer than this to pure black or pure white are dropped
	pub bw_threshold: f32,
	/// A cluster closer than this to an earlier surviving cluster is dropped
	pub similarity_threshold: f32,
	/// Reserved bound for the seeding loop.
	///
	/// Seeding is already bounded by `k` and the number of pixels, so this is currently not consulted.
	pub max_init_iterations: u32,
	/// Record the centroid colors at the start of each round, see [`ClusteringResult::history`](crate::ClusteringResult::history)
	pub record_history: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			k: 5,
			cluster_threshold: 0.005,
			max_cluster_iterations: 50,
			maxedge: 180,
			bw_threshold: 0.0105,
			similarity_threshold: 0.05,
			max_init_iterations: 50,
			record_history: false,
		}
	}
}

impl Config {
	/// Set the number of clusters
	#[must_use]
	pub const fn with_k(self, k: u8) -> Self {
		Self { k, ..self }
	}

	/// Set the convergence threshold
	#[must_use]
	pub const fn with_cluster_threshold(self, cluster_threshold: f32) -> Self {
		Self { cluster_threshold, ..self }
	}

	/// Set the maximum number of clustering rounds
	#[must_use]
	pub const fn with_max_cluster_iterations(self, max_cluster_iterations: u32) -> Self {
		Self { max_cluster_iterations, ..self }
	}

	/// Set the downscale bound
	#[must_use]
	pub const fn with_maxedge(self, maxedge: u32) -> Self {
		Self { maxedge, ..self }
	}

	/// Set the black/white suppression threshold
	#[must_use]
	pub const fn with_bw_threshold(self, bw_threshold: f32) -> Self {
		Self { bw_threshold, ..self }
	}

	/// Set the de-duplication threshold
	#[must_use]
	pub const fn with_similarity_threshold(self, similarity_threshold: f32) -> Self {
		Self { similarity_threshold, ..self }
	}

	/// Set the (currently unused) seeding bound
	#[must_use]
	pub const fn with_max_init_iterations(self, max_init_iterations: u32) -> Self {
		Self { max_init_iterations, ..self }
	}

	/// Enable or disable recording per-round centroid snapshots
	#[must_use]
	pub const fn with_history(self, record_history: bool) -> Self {
		Self { record_history, ..self }
	}
}
