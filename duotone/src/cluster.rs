//! The assignment/recentering loop (Lloyd's algorithm) over HSV pixels

use crate::{distance, Color, Config, Hsv};
use tracing::{debug, trace};

/// A group of pixels with similar colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cluster {
	/// The index of this cluster when it was seeded
	label: u8,
	/// The average color of the cluster's pixels
	centroid: Hsv,
	/// The number of pixels assigned to this cluster in the last round
	count: u32,
}

impl Cluster {
	/// The index this cluster was seeded with
	#[must_use]
	pub const fn label(&self) -> u8 {
		self.label
	}

	/// The centroid in HSV
	#[must_use]
	pub const fn centroid(&self) -> Hsv {
		self.centroid
	}

	/// The centroid as a [`Color`]
	#[must_use]
	pub fn color(&self) -> Color {
		Color::from_hsv(self.centroid)
	}

	/// The number of pixels in this cluster
	#[must_use]
	pub const fn count(&self) -> u32 {
		self.count
	}
}

/// Data for each center/centroid
struct CenterData {
	/// The centroid point
	centroid: Vec<Hsv>,
	/// Per-component sum of the pixels assigned this round
	sum: Vec<[f64; 3]>,
	/// Number of pixels assigned this round
	count: Vec<u32>,
	/// Number of pixels assigned in the last completed round
	members: Vec<u32>,
}

impl CenterData {
	/// Create a [`CenterData`] starting at the given centroids
	fn new(centroid: Vec<Hsv>) -> Self {
		let k = centroid.len();
		Self {
			centroid,
			sum: vec![[0.0; 3]; k],
			count: vec![0; k],
			members: vec![0; k],
		}
	}

	/// Convert into the final clusters, labeled in seeding order
	// labels are < k <= u8::MAX
	#[allow(clippy::cast_possible_truncation)]
	fn into_clusters(self) -> Vec<Cluster> {
		self.centroid
			.into_iter()
			.zip(self.members)
			.enumerate()
			.map(|(i, (centroid, count))| Cluster { label: i as u8, centroid, count })
			.collect()
	}
}

/// The outcome of the clustering loop
#[derive(Debug, Clone)]
pub(crate) struct ClusterRun {
	/// Clusters in seeding order
	pub clusters: Vec<Cluster>,
	/// Centroid colors at the start of each round, if requested
	pub history: Vec<Vec<Color>>,
	/// Number of completed rounds
	pub iterations: u32,
	/// Largest centroid movement in the last round
	pub movement: f32,
}

/// Assign each pixel to its closest centroid, accumulating the per-center sums.
///
/// Ties go to the center with the lowest index.
fn update_assignments(pixels: &[Hsv], centers: &mut CenterData) {
	for &color in pixels {
		let mut min_dist = f32::INFINITY;
		let mut min_center = 0;
		for (i, &centroid) in centers.centroid.iter().enumerate() {
			let dist = distance(color, centroid);
			if dist < min_dist {
				min_dist = dist;
				min_center = i;
			}
		}

		let sum = &mut centers.sum[min_center];
		sum[0] += f64::from(color.hue());
		sum[1] += f64::from(color.saturation());
		sum[2] += f64::from(color.value());
		centers.count[min_center] += 1;
	}
}

/// Move each centroid to the mean of its assigned pixels, returning the largest movement.
///
/// Each component is averaged on its own, hue included.
/// A center with no pixels this round keeps its centroid.
fn update_centroids(centers: &mut CenterData) -> f32 {
	let mut max_delta = 0.0;
	for (((centroid, sum), count), members) in centers
		.centroid
		.iter_mut()
		.zip(&mut centers.sum)
		.zip(&mut centers.count)
		.zip(&mut centers.members)
	{
		if *count > 0 {
			let n = f64::from(*count);
			// Sums need the extra precision, the averages do not
			#[allow(clippy::cast_possible_truncation)]
			let new_centroid = Hsv::new((sum[0] / n) as f32, (sum[1] / n) as f32, (sum[2] / n) as f32);

			max_delta = f32::max(max_delta, distance(*centroid, new_centroid));
			*centroid = new_centroid;
		}

		*members = *count;
		*sum = [0.0; 3];
		*count = 0;
	}

	max_delta
}

/// Cluster `pixels` starting from the given centroids.
///
/// Rounds continue until no centroid moves by `config.cluster_threshold` or more,
/// or until `config.max_cluster_iterations` rounds have run.
/// With fewer than two centroids, no rounds are run and every pixel belongs to the single centroid (if any).
/// If no rounds run at all, the counts come from a single assignment to the starting centroids.
pub(crate) fn run(pixels: &[Hsv], centroids: Vec<Hsv>, config: &Config) -> ClusterRun {
	let mut centers = CenterData::new(centroids);
	let mut history = Vec::new();

	if centers.centroid.len() < 2 {
		if let Some(members) = centers.members.first_mut() {
			*members = u32::try_from(pixels.len()).unwrap_or(u32::MAX);
		}

		debug!("skipping clustering with fewer than two centroids");
		return ClusterRun { clusters: centers.into_clusters(), history, iterations: 0, movement: 0.0 };
	}

	let mut iterations = 0;
	let mut movement = f32::INFINITY;
	while iterations < config.max_cluster_iterations && movement >= config.cluster_threshold {
		if config.record_history {
			history.push(centers.centroid.iter().map(|&centroid| Color::from_hsv(centroid)).collect());
		}

		update_assignments(pixels, &mut centers);
		movement = update_centroids(&mut centers);
		iterations += 1;
		trace!(iteration = iterations, movement, "finished clustering round");
	}

	if iterations == 0 {
		// No rounds ran: the seeds stay put, but their counts still cover every pixel
		update_assignments(pixels, &mut centers);
		centers.members = std::mem::take(&mut centers.count);
		movement = 0.0;
	}

	debug!(
		iterations,
		movement,
		converged = movement < config.cluster_threshold,
		"clustering finished"
	);

	ClusterRun { clusters: centers.into_clusters(), history, iterations, movement }
}
