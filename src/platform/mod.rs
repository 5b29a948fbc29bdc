// Platform-specific code module

pub mod gpu;
pub mod opener;

// Re-exports para imports limpios
pub use gpu::get_gpu_provider;
pub use opener::SystemBrowser;
