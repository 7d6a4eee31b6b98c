use burn::{
    nn::{
        loss::{MseLoss, Reduction},
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{relu, sigmoid},
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct AutoencoderConfig {
    /// Flattened image size (28 * 28 for MNIST)
    #[config(default = 784)]
    pub input_dim:  usize,
    #[config(default = 128)]
    pub hidden_dim: usize,
    /// Size of the compressed representation
    #[config(default = 64)]
    pub code_dim:   usize,
}

impl AutoencoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Autoencoder<B> {
        let encoder = Encoder {
            hidden: LinearConfig::new(self.input_dim, self.hidden_dim).init(device),
            code:   LinearConfig::new(self.hidden_dim, self.code_dim).init(device),
        };
        let decoder = Decoder {
            hidden: LinearConfig::new(self.code_dim, self.hidden_dim).init(device),
            output: LinearConfig::new(self.hidden_dim, self.input_dim).init(device),
        };
        Autoencoder { encoder, decoder }
    }
}

/// input → ReLU(hidden) → sigmoid(code)
#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    pub hidden: Linear<B>,
    pub code:   Linear<B>,
}

impl<B: Backend> Encoder<B> {
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.hidden.forward(x));
        sigmoid(self.code.forward(x))
    }
}

/// code → ReLU(hidden) → sigmoid(output)
#[derive(Module, Debug)]
pub struct Decoder<B: Backend> {
    pub hidden: Linear<B>,
    pub output: Linear<B>,
}

impl<B: Backend> Decoder<B> {
    pub fn forward(&self, code: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.hidden.forward(code));
        // Sigmoid keeps reconstructions in the same [0, 1] range as the inputs.
        sigmoid(self.output.forward(x))
    }
}

#[derive(Module, Debug)]
pub struct Autoencoder<B: Backend> {
    pub encoder: Encoder<B>,
    pub decoder: Decoder<B>,
}

impl<B: Backend> Autoencoder<B> {
    /// images: [batch, input_dim] → codes: [batch, code_dim]
    pub fn encode(&self, images: Tensor<B, 2>) -> Tensor<B, 2> {
        self.encoder.forward(images)
    }

    /// codes: [batch, code_dim] → reconstructions: [batch, input_dim]
    pub fn decode(&self, codes: Tensor<B, 2>) -> Tensor<B, 2> {
        self.decoder.forward(codes)
    }

    pub fn forward(&self, images: Tensor<B, 2>) -> Tensor<B, 2> {
        self.decode(self.encode(images))
    }

    /// Mean of (reconstruction - input)^2 over every element of the batch.
    pub fn forward_loss(&self, images: Tensor<B, 2>) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let reconstruction = self.forward(images.clone());
        let loss = MseLoss::new().forward(reconstruction.clone(), images, Reduction::Mean);
        (loss, reconstruction)
    }

    /// Per-sample reconstruction error: [batch, input_dim] → [batch]
    pub fn reconstruction_error(&self, images: Tensor<B, 2>) -> Tensor<B, 1> {
        let reconstruction = self.forward(images.clone());
        let diff = reconstruction - images;
        (diff.clone() * diff).mean_dim(1).squeeze::<1>(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn tiny_config() -> AutoencoderConfig {
        AutoencoderConfig::new()
            .with_input_dim(6)
            .with_hidden_dim(4)
            .with_code_dim(2)
    }

    #[test]
    fn test_default_config_matches_mnist() {
        let cfg = AutoencoderConfig::new();
        assert_eq!(cfg.input_dim,  784);
        assert_eq!(cfg.hidden_dim, 128);
        assert_eq!(cfg.code_dim,   64);
    }

    #[test]
    fn test_shapes() {
        let device = Default::default();
        let model: Autoencoder<TestBackend> = tiny_config().init(&device);
        let x = Tensor::<TestBackend, 2>::ones([3, 6], &device);

        assert_eq!(model.encode(x.clone()).dims(), [3, 2]);
        assert_eq!(model.forward(x.clone()).dims(), [3, 6]);
        assert_eq!(model.reconstruction_error(x).dims(), [3]);
    }

    #[test]
    fn test_outputs_are_in_unit_range() {
        let device = Default::default();
        let model: Autoencoder<TestBackend> = tiny_config().init(&device);
        let x = Tensor::<TestBackend, 2>::random(
            [5, 6],
            burn::tensor::Distribution::Uniform(0.0, 1.0),
            &device,
        );

        let out: Vec<f32> = model.forward(x).into_data().to_vec().unwrap();
        assert!(out.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_batch_loss_is_mean_of_sample_errors() {
        let device = Default::default();
        let model: Autoencoder<TestBackend> = tiny_config().init(&device);
        let x = Tensor::<TestBackend, 2>::random(
            [4, 6],
            burn::tensor::Distribution::Uniform(0.0, 1.0),
            &device,
        );

        let (loss, _) = model.forward_loss(x.clone());
        let loss: f32 = loss.into_scalar().elem();
        let per_sample: Vec<f32> = model.reconstruction_error(x).into_data().to_vec().unwrap();
        let mean = per_sample.iter().sum::<f32>() / per_sample.len() as f32;

        assert!(loss >= 0.0);
        assert!((loss - mean).abs() < 1e-5);
    }
}
