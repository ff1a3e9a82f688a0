pub mod config;
pub mod contact;
pub mod device;
pub mod effects;
pub mod hero;
pub mod host;
pub mod loader;
pub mod logging;
pub mod nav;
pub mod notify;
pub mod particles;
pub mod reveal;
pub mod runtime;
pub mod state;
pub mod storage;
pub mod theme;
pub mod timing;

#[cfg(not(target_arch = "wasm32"))]
pub mod relay;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

#[cfg(test)]
pub(crate) mod testing;

pub trait RandomSource {
    fn next_unit(&self) -> f64;
}
