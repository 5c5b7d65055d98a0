#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::path::{Path, PathBuf};
use waitcast::config::AppConfig;
use waitcast::estimator::{ARCHITECTURE, LABEL_COUNT};
use waitcast::ml::{Activation, DenseLayer, DenseNetwork};

/// Scratch directory removed on drop.
pub struct ArtifactDir {
    pub path: PathBuf,
}

impl ArtifactDir {
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("waitcast-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).expect("failed to create artifact dir");
        Self { path }
    }

    pub fn config(&self) -> AppConfig {
        AppConfig::with_artifact_dir(&self.path)
    }

    pub fn write(&self, file: &str, contents: &str) {
        std::fs::write(self.path.join(file), contents).expect("failed to write artifact");
    }
}

impl Drop for ArtifactDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Seeded network with the declared architecture and small random weights.
pub fn random_network(seed: u64, dims: &[usize]) -> DenseNetwork {
    let mut rng = StdRng::seed_from_u64(seed);
    let n_layers = dims.len() - 1;
    let layers = (0..n_layers)
        .map(|l| {
            let (in_dim, out_dim) = (dims[l], dims[l + 1]);
            DenseLayer {
                weights: (0..out_dim)
                    .map(|_| (0..in_dim).map(|_| rng.gen_range(-0.5..0.5)).collect())
                    .collect(),
                bias: (0..out_dim).map(|_| rng.gen_range(-0.1..0.1)).collect(),
                activation: if l + 1 == n_layers {
                    Activation::Softmax
                } else {
                    Activation::Relu
                },
            }
        })
        .collect();

    DenseNetwork {
        input_dim: dims[0],
        layers,
        metadata: json!({ "seed": seed }),
    }
}

/// Write a complete, valid artifact set and return the directory.
pub fn write_valid_artifacts(name: &str, seed: u64) -> ArtifactDir {
    let dir = ArtifactDir::new(name);
    write_network(&dir.path, &random_network(seed, &ARCHITECTURE));
    dir.write(
        "scaler.json",
        &json!({
            "mean_": [6.0, 3.0, 0.5, 1.0, 2.0, 1.5, 1.0],
            "scale_": [4.0, 1.2, 0.7, 1.0, 1.5, 1.2, 1.0]
        })
        .to_string(),
    );
    // Buckets in minutes, ascending like a np.unique export.
    let labels: Vec<i64> = (0..LABEL_COUNT as i64).map(|i| i * 2).collect();
    dir.write("labels.json", &serde_json::to_string(&labels).unwrap());
    dir
}

pub fn write_network(dir: &Path, network: &DenseNetwork) {
    std::fs::write(
        dir.join("wait_time_model.json"),
        serde_json::to_string(network).expect("failed to encode network"),
    )
    .expect("failed to write network");
}
