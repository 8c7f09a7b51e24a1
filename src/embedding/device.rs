use candle_core::Device;

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::{info, warn};

#[cfg(not(any(feature = "metal", feature = "cuda")))]
use tracing::debug;

/// Picks the device the sentence encoder runs on.
///
/// GPU backends are only tried when their feature is compiled in; a GPU that fails to
/// initialise falls back to the CPU, so this never fails.
#[cfg(any(feature = "metal", feature = "cuda"))]
pub fn select_device() -> Device {
    let mut failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!(device = "metal", "Sentence encoder using GPU");
                return device;
            }
            Err(e) => {
                let msg = e.to_string();
                warn!(device = "metal", error = %msg, "GPU device unavailable");
                failures.push(format!("metal: {msg}"));
            }
        }
    }

    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!(device = "cuda", "Sentence encoder using GPU");
                return device;
            }
            Err(e) => {
                let msg = e.to_string();
                warn!(device = "cuda", error = %msg, "GPU device unavailable");
                failures.push(format!("cuda: {msg}"));
            }
        }
    }

    warn!(reason = %failures.join("; "), "Falling back to CPU device");
    Device::Cpu
}

/// Picks the device the sentence encoder runs on.
#[cfg(not(any(feature = "metal", feature = "cuda")))]
pub fn select_device() -> Device {
    debug!("Built without GPU features, sentence encoder runs on CPU");
    Device::Cpu
}
