mod blender;
mod config;

pub(crate) use self::blender::normalize_by_max;
pub use self::{
    blender::HybridBlender,
    config::{Config as HybridConfig, Error as HybridConfigError},
};
