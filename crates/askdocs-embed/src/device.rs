use candle_core::Device;

/// Pick the compute device: CPU-resident by default, Metal behind the
/// `metal` feature for local development on Apple hardware.
pub fn select_device() -> Device {
    #[cfg(feature = "metal")]
    {
        if let Ok(dev) = Device::new_metal(0) {
            tracing::debug!("embedding device: metal");
            return dev;
        }
    }
    tracing::debug!("embedding device: cpu");
    Device::Cpu
}
