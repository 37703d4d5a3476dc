//! Small fully connected feed-forward network
//!
//! Parameters are stored as JSON. Saving goes through a temporary file that
//! is renamed over the target, so an interrupted save never leaves a
//! truncated model behind.

use std::fs;
use std::path::{Path, PathBuf};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{Predictor, PredictorError};

/// Where the model is saved when no path was given
pub const DEFAULT_MODEL_PATH: &str = "exit_finder_model.json";

/// Activation applied after every layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Activation {
    #[default]
    Tanh,
    Sigmoid,
    Relu,
    Identity,
}

impl Activation {
    #[inline]
    pub fn apply(self, value: f32) -> f32 {
        match self {
            Activation::Tanh => value.tanh(),
            Activation::Sigmoid => 1.0 / (1.0 + (-value).exp()),
            Activation::Relu => value.max(0.0),
            Activation::Identity => value,
        }
    }
}

/// Construction parameters
///
/// `learning_rate` is carried along with the parameters for whatever trains
/// the network offline; inference never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetConfig {
    pub inputs: usize,
    pub outputs: usize,
    pub hidden_layers: usize,
    /// Nodes in each hidden layer
    pub width: usize,
    pub learning_rate: f32,
    pub activation: Activation,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            inputs: 2,
            outputs: 1,
            hidden_layers: 3,
            width: 5,
            learning_rate: 0.15,
            activation: Activation::Tanh,
        }
    }
}

impl NetConfig {
    /// Node count of every layer, input layer included
    fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers + 2);
        sizes.push(self.inputs);
        sizes.extend(std::iter::repeat_n(self.width, self.hidden_layers));
        sizes.push(self.outputs);
        sizes
    }

    fn validate(&self) -> Result<(), PredictorError> {
        if self.inputs == 0 || self.outputs == 0 {
            return Err(PredictorError::Layout(
                "inputs and outputs must be non-empty".to_string(),
            ));
        }
        if self.hidden_layers > 0 && self.width == 0 {
            return Err(PredictorError::Layout(
                "hidden layers need at least one node".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Layer {
    /// `weights[node][input]`
    weights: Vec<Vec<f32>>,
    biases: Vec<f32>,
}

impl Layer {
    fn random(inputs: usize, nodes: usize, rng: &mut Pcg32) -> Self {
        let weights = (0..nodes)
            .map(|_| (0..inputs).map(|_| rng.random_range(-1.0f32..1.0)).collect())
            .collect();
        let biases = (0..nodes).map(|_| rng.random_range(-1.0f32..1.0)).collect();
        Self { weights, biases }
    }

    fn forward(&self, inputs: &[f32], activation: Activation) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(row, bias)| {
                let sum: f32 = row.iter().zip(inputs).map(|(w, x)| w * x).sum();
                activation.apply(sum + bias)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedForwardNet {
    config: NetConfig,
    layers: Vec<Layer>,
    /// Save target, set from wherever the network was loaded
    #[serde(skip)]
    path: PathBuf,
}

impl FeedForwardNet {
    /// Randomly initialised network, saved to [`DEFAULT_MODEL_PATH`]
    pub fn new(config: NetConfig, seed: u64) -> Result<Self, PredictorError> {
        config.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let sizes = config.layer_sizes();
        let layers = sizes
            .windows(2)
            .map(|pair| Layer::random(pair[0], pair[1], &mut rng))
            .collect();
        Ok(Self {
            config,
            layers,
            path: PathBuf::from(DEFAULT_MODEL_PATH),
        })
    }

    /// Load parameters previously written by [`Predictor::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PredictorError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let mut net: FeedForwardNet = serde_json::from_str(&json)?;
        net.check_layout()?;
        net.path = path.to_path_buf();
        Ok(net)
    }

    /// Load from `path` if it exists, otherwise start a fresh network saved there
    pub fn load_or_new(
        path: impl AsRef<Path>,
        config: NetConfig,
        seed: u64,
    ) -> Result<Self, PredictorError> {
        let path = path.as_ref();
        if path.exists() {
            let net = Self::load(path)?;
            log::info!("Loaded predictor from {}", path.display());
            Ok(net)
        } else {
            log::info!(
                "No predictor at {}, starting a fresh {}x{} network",
                path.display(),
                config.hidden_layers,
                config.width
            );
            Ok(Self::new(config, seed)?.with_path(path))
        }
    }

    /// Change where [`Predictor::save`] writes
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    fn check_layout(&self) -> Result<(), PredictorError> {
        self.config.validate()?;
        let sizes = self.config.layer_sizes();
        if self.layers.len() != sizes.len() - 1 {
            return Err(PredictorError::Layout(format!(
                "expected {} layers, found {}",
                sizes.len() - 1,
                self.layers.len()
            )));
        }
        for (i, (layer, pair)) in self.layers.iter().zip(sizes.windows(2)).enumerate() {
            let shape_ok = layer.weights.len() == pair[1]
                && layer.biases.len() == pair[1]
                && layer.weights.iter().all(|row| row.len() == pair[0]);
            if !shape_ok {
                return Err(PredictorError::Layout(format!(
                    "layer {i} is not {}x{}",
                    pair[1], pair[0]
                )));
            }
        }
        Ok(())
    }
}

impl Predictor for FeedForwardNet {
    fn predict(&self, inputs: &[f32]) -> Result<Vec<f32>, PredictorError> {
        if inputs.len() != self.config.inputs {
            return Err(PredictorError::InputShape {
                expected: self.config.inputs,
                got: inputs.len(),
            });
        }
        let activation = self.config.activation;
        let mut values = inputs.to_vec();
        for layer in &self.layers {
            values = layer.forward(&values, activation);
        }
        Ok(values)
    }

    fn save(&self) -> Result<(), PredictorError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::info!("Predictor saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let net = FeedForwardNet::new(NetConfig::default(), 1).unwrap();
        assert_eq!(net.layers.len(), 4);
        assert_eq!(net.layers[0].weights[0].len(), 2);
        assert_eq!(net.layers[3].biases.len(), 1);
        assert_eq!(net.path(), Path::new(DEFAULT_MODEL_PATH));
    }

    #[test]
    fn test_predict_shape_and_range() {
        let net = FeedForwardNet::new(NetConfig::default(), 2).unwrap();
        let out = net.predict(&[0.4, 0.6]).unwrap();
        assert_eq!(out.len(), 1);
        assert!((-1.0..=1.0).contains(&out[0]));

        assert!(matches!(
            net.predict(&[0.4]),
            Err(PredictorError::InputShape { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_same_seed_same_network() {
        let a = FeedForwardNet::new(NetConfig::default(), 9).unwrap();
        let b = FeedForwardNet::new(NetConfig::default(), 9).unwrap();
        assert_eq!(a.predict(&[0.1, 0.9]).unwrap(), b.predict(&[0.1, 0.9]).unwrap());
    }

    #[test]
    fn test_identity_network_without_hidden_layers() {
        let config = NetConfig {
            hidden_layers: 0,
            activation: Activation::Identity,
            ..NetConfig::default()
        };
        let mut net = FeedForwardNet::new(config, 0).unwrap();
        net.layers[0].weights = vec![vec![1.0, -1.0]];
        net.layers[0].biases = vec![0.5];
        assert_eq!(net.predict(&[2.0, 0.5]).unwrap(), vec![2.0]);
    }

    #[test]
    fn test_rejects_empty_config() {
        let config = NetConfig {
            outputs: 0,
            ..NetConfig::default()
        };
        assert!(matches!(
            FeedForwardNet::new(config, 0),
            Err(PredictorError::Layout(_))
        ));
    }

    #[test]
    fn test_save_then_load_keeps_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("net.json");
        let net = FeedForwardNet::new(NetConfig::default(), 5)
            .unwrap()
            .with_path(&path);
        net.save().unwrap();

        let loaded = FeedForwardNet::load(&path).unwrap();
        assert_eq!(loaded.path(), path.as_path());
        assert_eq!(loaded.config(), net.config());
        assert_eq!(
            loaded.predict(&[0.25, 0.75]).unwrap(),
            net.predict(&[0.25, 0.75]).unwrap()
        );
        assert!(!dir.path().join("models").join("net.json.tmp").exists());
    }

    #[test]
    fn test_load_or_new_falls_back_to_fresh_network() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let net = FeedForwardNet::load_or_new(&path, NetConfig::default(), 3).unwrap();
        assert_eq!(net.path(), path.as_path());
        assert!(!path.exists());
    }

    #[test]
    fn test_load_rejects_corrupt_and_mismatched_files() {
        let dir = tempfile::tempdir().unwrap();

        let corrupt = dir.path().join("corrupt.json");
        fs::write(&corrupt, "{ not json").unwrap();
        assert!(matches!(
            FeedForwardNet::load(&corrupt),
            Err(PredictorError::Format(_))
        ));

        let mut net = FeedForwardNet::new(NetConfig::default(), 4).unwrap();
        net.layers.pop();
        let truncated = dir.path().join("truncated.json");
        fs::write(&truncated, serde_json::to_string(&net).unwrap()).unwrap();
        assert!(matches!(
            FeedForwardNet::load(&truncated),
            Err(PredictorError::Layout(_))
        ));
    }
}
