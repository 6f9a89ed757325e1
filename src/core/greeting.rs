/// The package greeting. Constant, never fails, and names the package.
pub const GREETING: &str = "Hello from bioxai!";

pub fn hello() -> &'static str {
    GREETING
}
