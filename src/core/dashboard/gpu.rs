use crate::error::Result;

/// GPU utilisation at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GpuReading {
    pub utilization_percent: f32,
    pub memory_percent: f32,
}

/// Trait for GPU metrics providers
///
/// Implementations are provided in the platform layer.
pub trait GpuProvider: Send {
    /// Short provider name, used in log lines
    fn name(&self) -> &'static str;

    /// Read current utilisation; fails when the GPU cannot be queried
    fn read(&mut self) -> Result<GpuReading>;
}
