use candle_core::Device;
use stroke_core::config::DeviceKind;
use tracing::{info, warn};

pub fn select_device(kind: DeviceKind) -> Device {
    match kind {
        DeviceKind::Metal => {
            #[cfg(feature = "metal")]
            {
                if let Ok(dev) = Device::new_metal(0) { info!("device: Metal (MPS)"); return dev; }
            }
            warn!("Metal requested but unavailable, falling back to CPU");
        }
        DeviceKind::Cpu => {}
    }
    info!("device: CPU");
    Device::Cpu
}
