// Compiler Adapter: generated LaTeX source → PDF artifact via an external toolchain.

pub mod latex;

pub use latex::LatexCompiler;

/// Photo the résumé template references; copied into every compile workspace.
pub const PROFILE_PHOTO: &str = "profile_photo.png";
