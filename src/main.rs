#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("portfolio-site runs in the browser. Run `trunk serve` or `trunk build --release`.");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    portfolio_site::frontend::run();
}
